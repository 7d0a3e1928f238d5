//! # Questline Core Library
//!
//! This library provides the core business logic for Questline, a gamified
//! habit-tracking widget. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with any GUI layer
//! being a thin shell over the same core library.
//!
//! ## Architecture
//!
//! - **Progression Engine**: a synchronous state machine driving the
//!   "pick a random challenge, complete it, gain XP, maybe level up" loop
//! - **Challenge Catalog**: a static, immutable list of challenge templates
//!   the engine samples from
//! - **Storage**: SQLite-based progress persistence and TOML-based
//!   configuration
//!
//! Every command on the engine returns a [`Transition`]: the resulting
//! [`Event`] plus the list of [`SideEffect`]s the caller should deliver
//! (sound, desktop notification). The state mutation itself is pure --
//! side-effect delivery failures never touch progression state.
//!
//! ## Key Components
//!
//! - [`ProgressionEngine`]: core state machine
//! - [`Catalog`]: challenge templates
//! - [`Database`]: key-value progress store and completion log
//! - [`Config`]: application configuration management

pub mod effects;
pub mod error;
pub mod events;
pub mod progression;
pub mod storage;

pub use effects::SideEffect;
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use progression::{
    Catalog, ChallengeKind, ChallengeTemplate, PcgSampler, ProgressionEngine, ProgressionState,
    Sampler, Transition,
};
pub use storage::{Config, Database, Stats};
