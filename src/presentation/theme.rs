use colored::Colorize;

pub struct Theme {
    pub title: fn(&str) -> String,
    pub label: fn(&str) -> String,
    pub value: fn(&str) -> String,
    pub line: fn(&str) -> String,
    pub idx: fn(&str) -> String,
    pub status: fn(&str) -> String,
    pub muted: fn(&str) -> String,
    pub error: fn(&str) -> String,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "classic" | "" => Self::classic(),
            "vivid" => Self::vivid(),
            "light" => Self::light(),
            _ => {
                eprintln!("{}", format!("✘ Unknown theme: {}", name).red());
                Self::classic() // Fallback to default
            }
        }
    }

    fn classic() -> Self {
        Self {
            title: |s| s.bright_magenta().bold().underline().to_string(),
            label: |s| s.cyan().to_string(),
            value: |s| s.white().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.bright_white().to_string(),
            status: |s| s.yellow().to_string(),
            muted: |s| s.bright_white().dimmed().italic().to_string(),
            error: |s| s.red().bold().to_string(),
        }
    }

    fn vivid() -> Self {
        Self {
            title: |s| s.red().italic().bold().underline().to_string(),
            label: |s| s.green().italic().to_string(),
            value: |s| s.bright_white().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.bright_cyan().to_string(),
            status: |s| s.bright_yellow().to_string(),
            muted: |s| s.bright_yellow().dimmed().italic().to_string(),
            error: |s| s.bright_red().bold().to_string(),
        }
    }

    fn light() -> Self {
        Self {
            title: |s| s.blue().bold().underline().to_string(),
            label: |s| s.magenta().to_string(),
            value: |s| s.black().to_string(),
            line: |s| s.bright_black().dimmed().to_string(),
            idx: |s| s.cyan().to_string(),
            status: |s| s.bright_blue().to_string(),
            muted: |s| s.bright_black().italic().to_string(),
            error: |s| s.red().bold().to_string(),
        }
    }
}
