// Terminal output for loaded resources
use crate::application::dashboard::{Dashboard, Panel};
use crate::application::query::ResourceData;
use crate::domain::error::HrmError;
use crate::domain::model::{DashboardStats, Store, UserProfile};
use crate::infrastructure::storage::CacheStatus;
use crate::presentation::theme::Theme;
use colored::Colorize;
use std::fmt::Write;

pub fn format_resource(data: &ResourceData, theme: &Theme, enable_emoji: bool) -> String {
    let mut output = String::new();
    writeln!(output, "{}", (theme.title)(&heading(data.resource().name()))).ok();
    writeln!(output, "  {}", (theme.line)(&"⸺".repeat(40))).ok();

    match data {
        ResourceData::CurrentUser(user) => write_profile(&mut output, user, theme),
        ResourceData::UserList(users) => write_users(&mut output, users, theme),
        ResourceData::StoreList(stores) => write_stores(&mut output, stores, theme),
        ResourceData::DashboardStats(stats) => write_stats(&mut output, stats, theme, enable_emoji),
        ResourceData::Timesheet(entries) => {
            for (i, entry) in entries.iter().enumerate() {
                let line = format!(
                    "{}  {} → {}  {}",
                    entry.date.as_deref().unwrap_or("-"),
                    entry.check_in.as_deref().unwrap_or("--:--"),
                    entry.check_out.as_deref().unwrap_or("--:--"),
                    entry
                        .hours_worked
                        .map(|h| format!("{:.1}h", h))
                        .unwrap_or_default()
                );
                write_row(&mut output, i, &line, entry.status.as_deref(), theme);
            }
            write_empty(&mut output, entries.is_empty(), theme);
        }
        ResourceData::AttendanceRequests(requests) => {
            for (i, request) in requests.iter().enumerate() {
                let line = format!(
                    "{} {}  {}",
                    request.request_type.as_deref().unwrap_or("request"),
                    request.request_date.as_deref().unwrap_or("-"),
                    request.description.as_deref().unwrap_or("")
                );
                write_row(&mut output, i, line.trim_end(), request.status.as_deref(), theme);
            }
            write_empty(&mut output, requests.is_empty(), theme);
        }
        ResourceData::WorkTasks(tasks) => {
            for (i, task) in tasks.iter().enumerate() {
                let mut line = task.title.as_deref().unwrap_or("(untitled)").to_string();
                if let Some(priority) = &task.priority {
                    line.push_str(&format!(" [{}]", priority));
                }
                if let Some(due) = &task.due {
                    line.push_str(&format!(" due {}", due));
                }
                write_row(&mut output, i, &line, task.status.as_deref(), theme);
            }
            write_empty(&mut output, tasks.is_empty(), theme);
        }
    }

    writeln!(output).ok();
    output
}

pub fn format_dashboard(dashboard: &Dashboard, theme: &Theme, enable_emoji: bool) -> String {
    let mut output = String::new();

    write_panel(&mut output, "current user", &dashboard.user, theme, |out, user| {
        write_profile(out, user, theme)
    });
    write_panel(&mut output, "dashboard stats", &dashboard.stats, theme, |out, stats| {
        write_stats(out, stats, theme, enable_emoji)
    });
    write_panel(&mut output, "store list", &dashboard.stores, theme, |out, stores| {
        write_stores(out, stores, theme)
    });
    write_panel(&mut output, "user list", &dashboard.users, theme, |out, users| {
        writeln!(out, "  {} {}", (theme.label)("employees"), (theme.value)(&users.len().to_string())).ok();
    });

    output
}

pub fn format_status(statuses: &[CacheStatus], theme: &Theme) -> String {
    let mut output = String::new();
    for status in statuses {
        let state = match (status.cached, status.fresh) {
            (true, true) => "fresh".green().to_string(),
            (true, false) => "stale".yellow().to_string(),
            _ => "empty".bright_black().to_string(),
        };
        let age = status
            .age
            .map(|age| format!("{}s ago", age.as_secs()))
            .unwrap_or_default();
        writeln!(
            output,
            "  {:<22}{} {}{}",
            (theme.label)(status.resource.name()),
            state,
            (theme.muted)(&age),
            if status.in_flight > 0 {
                format!(" ({} in flight)", status.in_flight)
            } else {
                String::new()
            }
        )
        .ok();
    }
    output
}

/// One-line failure notice.
pub fn format_error(err: &HrmError, enable_emoji: bool) -> String {
    let prefix = if enable_emoji { "✘" } else { "error:" };
    let mut line = format!("{} {}", prefix, err);
    if err.needs_login() {
        line.push_str(" (log in again to refresh the session file)");
    }
    line.red().to_string()
}

fn heading(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn write_panel<T>(
    output: &mut String,
    name: &str,
    panel: &Panel<T>,
    theme: &Theme,
    write: impl FnOnce(&mut String, &T),
) {
    writeln!(output, "{}", (theme.title)(&heading(name))).ok();
    match panel {
        Panel::Ready { data } => write(output, &**data),
        Panel::Failed { error } => {
            writeln!(output, "  {}", (theme.error)(&error.message)).ok();
            let hint = if error.login_required {
                "log in again, then reload"
            } else {
                "retry with --refresh"
            };
            writeln!(output, "  {}", (theme.muted)(hint)).ok();
        }
    }
    writeln!(output).ok();
}

fn write_profile(output: &mut String, user: &UserProfile, theme: &Theme) {
    let fields = [
        ("employee", Some(user.employee_id.as_str())),
        ("name", user.full_name.as_deref()),
        ("position", user.position.as_deref()),
        ("store", user.store_name.as_deref().or(user.store_id.as_deref())),
        ("email", user.email.as_deref()),
        ("phone", user.phone.as_deref()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            writeln!(output, "  {:<10}{}", (theme.label)(label), (theme.value)(value)).ok();
        }
    }
}

fn write_users(output: &mut String, users: &[UserProfile], theme: &Theme) {
    for (i, user) in users.iter().enumerate() {
        let line = format!(
            "{}  {}",
            user.employee_id,
            user.full_name.as_deref().unwrap_or("")
        );
        write_row(output, i, line.trim_end(), user.position.as_deref(), theme);
    }
    write_empty(output, users.is_empty(), theme);
}

fn write_stores(output: &mut String, stores: &[Store], theme: &Theme) {
    for (i, store) in stores.iter().enumerate() {
        let line = format!(
            "{}  {}",
            store.store_id,
            store.store_name.as_deref().unwrap_or("")
        );
        write_row(output, i, line.trim_end(), store.status.as_deref(), theme);
    }
    write_empty(output, stores.is_empty(), theme);
}

fn write_stats(output: &mut String, stats: &DashboardStats, theme: &Theme, enable_emoji: bool) {
    let rows = [
        ("👥", "employees", stats.total_employees),
        ("📅", "today's shifts", stats.today_schedules),
        ("📝", "pending requests", stats.pending_requests),
        ("💬", "recent messages", stats.recent_messages),
    ];
    for (emoji, label, value) in rows {
        let label = if enable_emoji {
            format!("{} {}", emoji, label)
        } else {
            label.to_string()
        };
        writeln!(
            output,
            "  {:<20}{}",
            (theme.label)(&label),
            (theme.value)(&value.to_string())
        )
        .ok();
    }
}

fn write_row(output: &mut String, i: usize, line: &str, status: Option<&str>, theme: &Theme) {
    let status = status
        .map(|s| format!("  {}", (theme.status)(s)))
        .unwrap_or_default();
    writeln!(
        output,
        "  {}. {}{}",
        (theme.idx)(&(i + 1).to_string()),
        (theme.value)(line),
        status
    )
    .ok();
}

fn write_empty(output: &mut String, empty: bool, theme: &Theme) {
    if empty {
        writeln!(output, "  {}", (theme.muted)("nothing here")).ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard::PanelError;
    use std::sync::Arc;

    #[test]
    fn heading_capitalizes() {
        assert_eq!(heading("store list"), "Store list");
        assert_eq!(heading(""), "");
    }

    #[test]
    fn failed_panel_shows_message_and_hint() {
        colored::control::set_override(false);
        let dashboard = Dashboard {
            user: Panel::Ready {
                data: Arc::new(crate::domain::model::Identity::new("E1").to_profile()),
            },
            stats: Panel::Failed {
                error: PanelError {
                    message: "Failed to fetch dashboard stats: timeout".to_string(),
                    login_required: false,
                },
            },
            stores: Panel::Ready {
                data: Arc::new(Vec::new()),
            },
            users: Panel::Failed {
                error: PanelError {
                    message: "No auth token found".to_string(),
                    login_required: true,
                },
            },
        };

        let output = format_dashboard(&dashboard, &Theme::from_name("classic"), false);
        assert!(output.contains("E1"));
        assert!(output.contains("Failed to fetch dashboard stats: timeout"));
        assert!(output.contains("retry with --refresh"));
        assert!(output.contains("log in again, then reload"));
        assert!(output.contains("nothing here"));
    }
}
