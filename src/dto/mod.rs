pub mod guess;
pub mod notice;
pub mod phase;
pub mod progress;
pub(crate) mod score_map;
pub mod search;
pub mod snapshot;
pub mod stats;
