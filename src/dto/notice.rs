use serde::Serialize;

use crate::{
    dto::{phase::VisiblePhase, stats::CurrentStats},
    state::{
        ladder::Rung,
        round::{Answer, Conclusion},
    },
};

/// Event pushed to the rendering layer whenever the round changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Notice {
    /// The session moved to a new phase.
    PhaseChanged {
        /// Phase entered.
        phase: VisiblePhase,
    },
    /// A new rung became playable; show it after `visible_after_ms`.
    RungRevealed {
        /// Rung now playable.
        rung: Rung,
        /// Its position in the ladder.
        index: usize,
        /// Points now on offer.
        score: u32,
        /// Delay before the rung is shown, for effect.
        visible_after_ms: u64,
    },
    /// Transient "incorrect, try again" banner; it must not block input.
    IncorrectGuess {
        /// Lifetime of the banner.
        dismiss_after_ms: u64,
    },
    /// The round ended.
    Concluded {
        /// How it ended.
        outcome: Conclusion,
        /// Final score.
        score: u32,
        /// Song of the round, when the server disclosed it.
        answer: Option<Answer>,
        /// Server message, if any.
        message: Option<String>,
    },
    /// The guess never reached the server; the player may retry.
    SubmissionFailed {
        /// Error shown to the player.
        message: String,
    },
    /// Fresh round statistics.
    StatsUpdated {
        /// Statistics as returned by the server.
        stats: CurrentStats,
    },
}
