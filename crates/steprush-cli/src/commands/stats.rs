use clap::Subcommand;

use crate::common;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Full summary: today, total, weekly window, streak
    Summary,
    /// Current goal streak in days
    Streak,
    /// Recorded daily history, newest first
    History {
        /// How many days to show
        #[arg(long, default_value = "30")]
        days: u32,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = common::open_tracker()?;

    match action {
        StatsAction::Summary => {
            let (summary, _) = tracker.refresh()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Streak => {
            let (summary, _) = tracker.refresh()?;
            println!("{}", summary.streak);
        }
        StatsAction::History { days } => {
            let history = tracker.history(days)?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
    }
    Ok(())
}
