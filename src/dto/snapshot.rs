use serde::Serialize;

use crate::{
    dto::{phase::VisiblePhase, stats::CurrentStats},
    state::{
        ladder::Rung,
        round::{Answer, Conclusion, RoundKey},
    },
};

/// Read-only view of a round, enough to render the whole page section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSnapshot {
    /// Round being played.
    pub round_key: RoundKey,
    /// Phase as shown to the player.
    pub phase: VisiblePhase,
    /// Index of the clearest visible rung.
    pub current_index: usize,
    /// Terminal outcome, if any.
    pub concluded: Conclusion,
    /// Points on offer, or the final score once concluded.
    pub score: u32,
    /// Playable rungs, oldest first.
    pub revealed: Vec<Rung>,
    /// Correct answer, once the server has disclosed it.
    pub answer: Option<Answer>,
    /// Server message shown on the already-played path.
    pub message: Option<String>,
    /// Whether the guess form and skip button are shown at all.
    pub guess_controls_visible: bool,
    /// Whether the guess form currently accepts a submission.
    pub submission_enabled: bool,
    /// Whether another rung can still be revealed.
    pub can_reveal_more: bool,
    /// Latest round statistics, once fetched.
    pub stats: Option<CurrentStats>,
}
