use clap::Subcommand;
use questline_core::Database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Print aggregated completion statistics as JSON
    Show,
    /// Print recent completions, newest first
    History {
        /// Maximum number of entries
        #[arg(long, default_value = "20")]
        limit: u32,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        StatsAction::Show => {
            let stats = db.stats_all()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::History { limit } => {
            let records = db.recent_completions(limit)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}
