use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progression::{ChallengeKind, ChallengeTemplate};

/// Every state change in the engine produces an Event.
/// The front end prints or renders events; they are what the
/// presentation layer reacts to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A challenge was drawn from the catalog and is now active.
    ChallengeStarted {
        kind: ChallengeKind,
        description: String,
        amount: u32,
        at: DateTime<Utc>,
    },
    /// The active challenge was discarded without awarding experience.
    ChallengeReset {
        at: DateTime<Utc>,
    },
    /// The active challenge was completed and experience awarded.
    ChallengeCompleted {
        amount: u32,
        level: u32,
        current_experience: u32,
        /// True when this completion crossed the level threshold.
        leveled_up: bool,
        at: DateTime<Utc>,
    },
    /// The level-up banner was dismissed by the user.
    LevelUpAcknowledged {
        level: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        level: u32,
        current_experience: u32,
        experience_to_next_level: u64,
        challenges_completed: u32,
        total_amount: u64,
        active_challenge: Option<ChallengeTemplate>,
        level_up_pending: bool,
        at: DateTime<Utc>,
    },
}
