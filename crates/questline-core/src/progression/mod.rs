mod catalog;
mod engine;
mod sampler;

pub use catalog::{Catalog, ChallengeKind, ChallengeTemplate};
pub use engine::{experience_to_next_level, ProgressionEngine, ProgressionState, Transition};
pub use sampler::{PcgSampler, Sampler};
