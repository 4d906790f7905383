//! Contracts of the external services a round depends on.

use futures::future::BoxFuture;

use crate::{
    dto::{
        guess::{GuessRequest, GuessVerdict},
        search::Suggestion,
        stats::CurrentStats,
    },
    error::ServiceResult,
};

/// Song catalog searched while the player types.
pub trait SearchCatalog: Send + Sync {
    /// Matches for `query`, best first. May be empty.
    fn search(&self, query: String) -> BoxFuture<'static, ServiceResult<Vec<Suggestion>>>;
}

/// Server endpoint that scores guesses.
pub trait GuessSubmitter: Send + Sync {
    /// Score one guess made at `request.difficulty_level`.
    fn submit(&self, request: GuessRequest) -> BoxFuture<'static, ServiceResult<GuessVerdict>>;
}

/// Completion status and statistics of the current round for the current identity.
pub trait StatsProvider: Send + Sync {
    /// Whether the current identity already played this round, plus aggregates.
    fn current_stats(&self) -> BoxFuture<'static, ServiceResult<CurrentStats>>;
}
