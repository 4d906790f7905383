use serde::Serialize;

use crate::state::state_machine::{ActivePhase, Outcome, SessionPhase};

/// Session phase as exposed to the rendering layer.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisiblePhase {
    /// Saved progress is still loading.
    Loading,
    /// Waiting for a guess.
    Guessing,
    /// A guess is being checked; the form is disabled.
    Submitting,
    /// The player found the song.
    Correct,
    /// All rungs used without a correct guess.
    Incorrect,
    /// The round was already scored for this player.
    AlreadyPlayed,
}

impl From<&SessionPhase> for VisiblePhase {
    fn from(value: &SessionPhase) -> Self {
        match value {
            SessionPhase::Init => VisiblePhase::Loading,
            SessionPhase::Active(ActivePhase::AwaitingGuess) => VisiblePhase::Guessing,
            SessionPhase::Active(ActivePhase::Submitting) => VisiblePhase::Submitting,
            SessionPhase::Concluded(Outcome::Correct) => VisiblePhase::Correct,
            SessionPhase::Concluded(Outcome::Incorrect) => VisiblePhase::Incorrect,
            SessionPhase::Concluded(Outcome::AlreadyPlayed) => VisiblePhase::AlreadyPlayed,
        }
    }
}
