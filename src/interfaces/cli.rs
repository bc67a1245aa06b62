use crate::domain::model::Resource;
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "hrmc")]
#[command(about = "Load HRM dashboard data through the request cache.")]
#[command(version)]
pub struct Cli {
    /// Drop the cached copy of each requested view before loading it
    #[arg(short = 'r', long)]
    pub refresh: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Reload every SECS seconds until interrupted
    #[arg(short = 'w', long, value_name = "SECS")]
    pub watch: Option<u64>,

    /// Choose color theme
    #[arg(short = 'T', long)]
    pub theme: Option<String>,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Edit configuration file
    #[arg(long)]
    pub edit_config: bool,

    /// Show session and cache status
    #[arg(long)]
    pub status: bool,

    /// What to load
    #[arg(value_enum, num_args = 0..)]
    pub views: Vec<View>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    Dashboard,
    User,
    Users,
    Stores,
    Stats,
    Timesheet,
    Attendance,
    Tasks,
}

impl View {
    /// The cached resource behind a single-resource view.
    pub fn resource(self) -> Option<Resource> {
        match self {
            View::Dashboard => None,
            View::User => Some(Resource::CurrentUser),
            View::Users => Some(Resource::UserList),
            View::Stores => Some(Resource::StoreList),
            View::Stats => Some(Resource::DashboardStats),
            View::Timesheet => Some(Resource::Timesheet),
            View::Attendance => Some(Resource::AttendanceRequests),
            View::Tasks => Some(Resource::WorkTasks),
        }
    }
}

impl Cli {
    /// Requested views, the dashboard when none are given.
    pub fn views(&self) -> Vec<View> {
        if self.views.is_empty() {
            vec![View::Dashboard]
        } else {
            self.views.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_dashboard() {
        let cli = Cli::parse_from(["hrmc"]);
        assert_eq!(cli.views(), vec![View::Dashboard]);
        assert!(cli.watch.is_none());
    }

    #[test]
    fn parses_views_and_flags() {
        let cli = Cli::parse_from(["hrmc", "-r", "--watch", "10", "stores", "tasks"]);
        assert!(cli.refresh);
        assert_eq!(cli.watch, Some(10));
        assert_eq!(cli.views(), vec![View::Stores, View::Tasks]);
        assert_eq!(View::Tasks.resource(), Some(Resource::WorkTasks));
    }
}
