//! The progression persistence contract.
//!
//! After every mutating engine operation the four counters are written
//! string-encoded under fixed keys. Rehydration reads the same keys and
//! substitutes the documented default for any key that is absent or fails
//! to parse -- a damaged store is recovered locally, never surfaced as an
//! error.

use crate::error::DatabaseError;
use crate::progression::ProgressionState;

use super::database::Database;

pub const KEY_LEVEL: &str = "level";
pub const KEY_TOTAL_AMOUNT: &str = "totalAmount";
pub const KEY_CURRENT_EXPERIENCE: &str = "currentExperience";
pub const KEY_CHALLENGES_COMPLETED: &str = "challengesCompleted";

fn read_counter<T: std::str::FromStr>(db: &Database, key: &str, default: T) -> T {
    match db.kv_get(key) {
        Ok(Some(raw)) => raw.parse().unwrap_or(default),
        _ => default,
    }
}

/// Rehydrate progression state from the store.
///
/// Missing or unparsable values fall back to defaults (`level` 1, the
/// counters 0). The active challenge is not part of this contract: a
/// rehydrated session always starts with no challenge in flight.
pub fn load_state(db: &Database) -> ProgressionState {
    ProgressionState {
        level: read_counter(db, KEY_LEVEL, 1).max(1),
        current_experience: read_counter(db, KEY_CURRENT_EXPERIENCE, 0),
        challenges_completed: read_counter(db, KEY_CHALLENGES_COMPLETED, 0),
        total_amount: read_counter(db, KEY_TOTAL_AMOUNT, 0),
        active_challenge: None,
    }
}

/// Write all four counters, string-encoded, under their fixed keys.
///
/// # Errors
/// Returns an error if any write fails.
pub fn save_state(db: &Database, state: &ProgressionState) -> Result<(), DatabaseError> {
    db.kv_set(KEY_LEVEL, &state.level.to_string())?;
    db.kv_set(KEY_TOTAL_AMOUNT, &state.total_amount.to_string())?;
    db.kv_set(KEY_CURRENT_EXPERIENCE, &state.current_experience.to_string())?;
    db.kv_set(
        KEY_CHALLENGES_COMPLETED,
        &state.challenges_completed.to_string(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_yields_defaults() {
        let db = Database::open_memory().unwrap();
        let state = load_state(&db);
        assert_eq!(state.level, 1);
        assert_eq!(state.current_experience, 0);
        assert_eq!(state.challenges_completed, 0);
        assert_eq!(state.total_amount, 0);
        assert!(state.active_challenge.is_none());
    }

    #[test]
    fn partial_store_falls_back_per_key() {
        let db = Database::open_memory().unwrap();
        db.kv_set(KEY_LEVEL, "3").unwrap();
        db.kv_set(KEY_TOTAL_AMOUNT, "420").unwrap();

        let state = load_state(&db);
        assert_eq!(state.level, 3);
        assert_eq!(state.total_amount, 420);
        assert_eq!(state.current_experience, 0);
        assert_eq!(state.challenges_completed, 0);
    }

    #[test]
    fn garbled_values_recover_to_defaults() {
        let db = Database::open_memory().unwrap();
        db.kv_set(KEY_LEVEL, "not-a-number").unwrap();
        db.kv_set(KEY_CURRENT_EXPERIENCE, "-5").unwrap();

        let state = load_state(&db);
        assert_eq!(state.level, 1);
        assert_eq!(state.current_experience, 0);
    }

    #[test]
    fn roundtrip_is_lossless() {
        let db = Database::open_memory().unwrap();
        let state = ProgressionState {
            level: 7,
            current_experience: 123,
            challenges_completed: 58,
            total_amount: 4096,
            active_challenge: None,
        };
        save_state(&db, &state).unwrap();

        let loaded = load_state(&db);
        assert_eq!(loaded.level, 7);
        assert_eq!(loaded.current_experience, 123);
        assert_eq!(loaded.challenges_completed, 58);
        assert_eq!(loaded.total_amount, 4096);
    }

    #[test]
    fn values_are_string_encoded() {
        let db = Database::open_memory().unwrap();
        let state = ProgressionState {
            level: 2,
            ..ProgressionState::default()
        };
        save_state(&db, &state).unwrap();
        assert_eq!(db.kv_get(KEY_LEVEL).unwrap().as_deref(), Some("2"));
    }
}
