use std::time::Duration;

use clap::Subcommand;
use steprush_core::{Config, Refresher, StepEvent};

use crate::common;

#[derive(Subcommand)]
pub enum StepsAction {
    /// Today's step count
    Today,
    /// Lifetime step total
    Total,
    /// Last seven days, oldest to newest
    Weekly,
    /// Run one reconcile pass and print the summary plus raised events
    Refresh,
    /// Poll on an interval, printing a snapshot per tick
    Watch {
        /// Poll interval in seconds (defaults to refresh.foreground_poll_secs)
        #[arg(long)]
        interval: Option<u64>,
    },
}

pub fn run(action: StepsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        StepsAction::Today => {
            let tracker = common::open_tracker()?;
            let (summary, _) = tracker.refresh()?;
            println!("{}", summary.today_steps);
        }
        StepsAction::Total => {
            let tracker = common::open_tracker()?;
            let (summary, _) = tracker.refresh()?;
            println!("{}", summary.total_steps);
        }
        StepsAction::Weekly => {
            let tracker = common::open_tracker()?;
            let (summary, _) = tracker.refresh()?;
            println!("{}", serde_json::to_string_pretty(&summary.weekly_steps)?);
        }
        StepsAction::Refresh => {
            let tracker = common::open_tracker()?;
            let (summary, events) = tracker.refresh()?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            for event in &events {
                println!("{}", serde_json::to_string(event)?);
            }
        }
        StepsAction::Watch { interval } => {
            let config = Config::load_or_default();
            let secs = interval
                .unwrap_or(config.refresh.foreground_poll_secs)
                .max(1);
            let tracker = common::open_tracker()?;
            let refresher = Refresher::new(tracker, Duration::from_secs(secs));

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(refresher.run(|summary, events| {
                for event in events {
                    if let Ok(json) = serde_json::to_string(event) {
                        println!("{json}");
                    }
                }
                if let Ok(json) = serde_json::to_string(&StepEvent::from(summary)) {
                    println!("{json}");
                }
                true
            }))?;
        }
    }
    Ok(())
}
