//! Progression engine implementation.
//!
//! The engine is a synchronous state machine. It has no internal threads
//! and never suspends mid-mutation: each command runs to completion on the
//! calling thread, so readers always see a consistent post-operation state.
//!
//! ## Challenge lifecycle
//!
//! ```text
//! [No Active Challenge] --start_new_challenge--> [Active Challenge]
//! [Active Challenge]    --reset_challenge-----> [No Active Challenge]
//! [Active Challenge]    --complete_challenge--> [No Active Challenge]  (+ XP)
//! ```
//!
//! Commands return a [`Transition`]: the resulting event plus the side
//! effects the caller should deliver. The mutation itself never performs
//! host I/O.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, ChallengeTemplate};
use super::sampler::Sampler;
use crate::effects::SideEffect;
use crate::events::Event;

/// The engine's owned, mutable progression state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionState {
    /// Current level, always >= 1.
    pub level: u32,
    /// Experience toward the next level. Held below
    /// [`experience_to_next_level`] whenever awards are smaller than the
    /// level threshold; an oversized award can leave a backlog that later
    /// completions drain one level at a time.
    pub current_experience: u32,
    /// Lifetime completion counter, never decreases.
    pub challenges_completed: u32,
    /// Lifetime XP earned across all completions. Unlike
    /// `current_experience` this never resets on level-up.
    pub total_amount: u64,
    /// At most one challenge is in flight at a time.
    pub active_challenge: Option<ChallengeTemplate>,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self {
            level: 1,
            current_experience: 0,
            challenges_completed: 0,
            total_amount: 0,
            active_challenge: None,
        }
    }
}

/// XP required to advance past `level`: `((level + 1) * 4)^2`.
///
/// Derived, never stored -- recomputing on access avoids staleness after
/// a level-up.
pub fn experience_to_next_level(level: u32) -> u64 {
    ((u64::from(level) + 1) * 4).pow(2)
}

/// The result of one engine command: the event describing what happened
/// and the side effects the caller should deliver (fire-and-forget).
#[derive(Debug, Clone)]
pub struct Transition {
    pub event: Event,
    pub effects: Vec<SideEffect>,
}

impl Transition {
    fn pure(event: Event) -> Self {
        Self {
            event,
            effects: Vec::new(),
        }
    }
}

/// Core progression engine.
///
/// Owns one [`ProgressionState`] for the lifetime of a session, plus the
/// challenge catalog and a constructor-injected sampler.
pub struct ProgressionEngine {
    catalog: Catalog,
    sampler: Box<dyn Sampler>,
    state: ProgressionState,
    /// Transient "show the level-up banner" flag. Not persisted.
    level_up_pending: bool,
}

impl ProgressionEngine {
    /// Create an engine over `catalog`, seeded with `state` (defaults or
    /// rehydrated from storage).
    pub fn new(catalog: Catalog, sampler: Box<dyn Sampler>, state: ProgressionState) -> Self {
        Self {
            catalog,
            sampler,
            state,
            level_up_pending: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn level_up_pending(&self) -> bool {
        self.level_up_pending
    }

    /// XP threshold for the current level.
    pub fn experience_to_next_level(&self) -> u64 {
        experience_to_next_level(self.state.level)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            level: self.state.level,
            current_experience: self.state.current_experience,
            experience_to_next_level: self.experience_to_next_level(),
            challenges_completed: self.state.challenges_completed,
            total_amount: self.state.total_amount,
            active_challenge: self.state.active_challenge.clone(),
            level_up_pending: self.level_up_pending,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Draw a random challenge from the catalog and make it active.
    ///
    /// There is deliberately no guard against re-rolling while a challenge
    /// is already active: the old challenge is overwritten without award.
    pub fn start_new_challenge(&mut self) -> Transition {
        let index = self.sampler.sample(self.catalog.len());
        // Catalog is non-empty by construction, so the index is valid.
        let challenge = self.catalog.get(index).cloned().unwrap_or_else(|| {
            unreachable!("sampler index {index} out of range for catalog")
        });
        self.state.active_challenge = Some(challenge.clone());
        Transition {
            event: Event::ChallengeStarted {
                kind: challenge.kind,
                description: challenge.description.clone(),
                amount: challenge.amount,
                at: Utc::now(),
            },
            effects: vec![
                SideEffect::PlaySound,
                SideEffect::new_challenge_notification(challenge.amount),
            ],
        }
    }

    /// Discard the active challenge without awarding experience.
    /// Idempotent: resetting with nothing active is still a reset.
    pub fn reset_challenge(&mut self) -> Transition {
        self.state.active_challenge = None;
        Transition::pure(Event::ChallengeReset { at: Utc::now() })
    }

    /// Complete the active challenge and award its experience.
    ///
    /// Returns `None` when no challenge is active -- a tolerated no-op,
    /// not an error.
    pub fn complete_challenge(&mut self) -> Option<Transition> {
        let challenge = self.state.active_challenge.take()?;
        let amount = challenge.amount;

        let mut experience = u64::from(self.state.current_experience) + u64::from(amount);
        let threshold = self.experience_to_next_level();
        let leveled_up = experience >= threshold;
        if leveled_up {
            // Carry-over is computed against the pre-level-up threshold.
            // One completion advances at most one level, even if the award
            // would mathematically justify more.
            experience -= threshold;
            self.state.level += 1;
            self.level_up_pending = true;
        }

        // Bounded by current_experience + amount, a sum of two u32 values;
        // the u64 intermediate only guards that addition against overflow.
        // Saturate on the unreachable path rather than wrap.
        self.state.current_experience = u32::try_from(experience).unwrap_or(u32::MAX);
        self.state.challenges_completed += 1;
        self.state.total_amount += u64::from(amount);

        Some(Transition::pure(Event::ChallengeCompleted {
            amount,
            level: self.state.level,
            current_experience: self.state.current_experience,
            leveled_up,
            at: Utc::now(),
        }))
    }

    /// Dismiss the level-up banner. Pure acknowledgement: `level` and
    /// `current_experience` are untouched.
    pub fn acknowledge_level_up(&mut self) -> Option<Transition> {
        if !self.level_up_pending {
            return None;
        }
        self.level_up_pending = false;
        Some(Transition::pure(Event::LevelUpAcknowledged {
            level: self.state.level,
            at: Utc::now(),
        }))
    }
}
