use clap::Subcommand;
use questline_core::storage::progress;
use questline_core::{
    Catalog, ChallengeTemplate, Config, Database, Event, PcgSampler, ProgressionEngine,
};

use crate::notify;

/// The in-flight challenge lives under its own kv key so the loop spans
/// CLI invocations. The four progress counters are stored separately,
/// under the keys defined in `questline_core::storage::progress`.
const ACTIVE_CHALLENGE_KEY: &str = "activeChallenge";

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// Draw a random challenge and make it active
    Start,
    /// Discard the active challenge without awarding experience
    Reset,
    /// Complete the active challenge and collect its experience
    Complete,
    /// Print current progression state as JSON
    Status,
}

fn load_catalog(config: &Config) -> Result<Catalog, Box<dyn std::error::Error>> {
    match config.catalog.path.as_deref() {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(Catalog::from_json(&json)?)
        }
        None => Ok(Catalog::builtin()),
    }
}

fn load_engine(
    db: &Database,
    config: &Config,
) -> Result<ProgressionEngine, Box<dyn std::error::Error>> {
    let mut state = progress::load_state(db);
    if let Ok(Some(json)) = db.kv_get(ACTIVE_CHALLENGE_KEY) {
        if let Ok(challenge) = serde_json::from_str::<ChallengeTemplate>(&json) {
            state.active_challenge = Some(challenge);
        }
    }
    Ok(ProgressionEngine::new(
        load_catalog(config)?,
        Box::new(PcgSampler::new(config.sampler_seed)),
        state,
    ))
}

fn save_engine(
    db: &Database,
    engine: &ProgressionEngine,
) -> Result<(), Box<dyn std::error::Error>> {
    progress::save_state(db, engine.state())?;
    match &engine.state().active_challenge {
        Some(challenge) => db.kv_set(ACTIVE_CHALLENGE_KEY, &serde_json::to_string(challenge)?)?,
        None => db.kv_delete(ACTIVE_CHALLENGE_KEY)?,
    }
    Ok(())
}

pub fn run(action: ChallengeAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let mut engine = load_engine(&db, &config)?;

    match action {
        ChallengeAction::Start => {
            let transition = engine.start_new_challenge();
            println!("{}", serde_json::to_string_pretty(&transition.event)?);
            notify::deliver(&transition.effects, &config.notifications);
        }
        ChallengeAction::Reset => {
            let transition = engine.reset_challenge();
            println!("{}", serde_json::to_string_pretty(&transition.event)?);
        }
        ChallengeAction::Complete => {
            let active = engine.state().active_challenge.clone();
            match engine.complete_challenge() {
                Some(transition) => {
                    if let Some(challenge) = active {
                        db.record_completion(&challenge, chrono::Utc::now())?;
                    }
                    println!("{}", serde_json::to_string_pretty(&transition.event)?);
                    if let Event::ChallengeCompleted {
                        leveled_up: true,
                        level,
                        ..
                    } = transition.event
                    {
                        eprintln!("You reached level {level}!");
                    }
                }
                None => {
                    // Nothing active: a tolerated no-op, print the
                    // unchanged state instead.
                    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
                }
            }
        }
        ChallengeAction::Status => {
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
    }

    save_engine(&db, &engine)?;
    Ok(())
}
