use clap::Subcommand;
use steprush_core::Database;

#[derive(Subcommand)]
pub enum DataAction {
    /// Zero the lifetime total and forget the last update date
    Reset,
    /// Print the persisted totals pair (debug view)
    Info,
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        DataAction::Reset => {
            db.reset_totals()?;
            println!("totals reset to 0");
        }
        DataAction::Info => {
            let info = db.totals_info()?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }
    Ok(())
}
