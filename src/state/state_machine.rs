use thiserror::Error;

use crate::state::round::Conclusion;

/// High-level phases a round session can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Prior progress and completion status are still being loaded.
    Init,
    /// The round is playable.
    Active(ActivePhase),
    /// The round is over; no further guesses are accepted.
    Concluded(Outcome),
}

/// Fine-grained phase while the round is playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePhase {
    /// Waiting for the player to guess or skip.
    AwaitingGuess,
    /// A guess is on its way to the server; further submissions are refused.
    Submitting,
}

/// Terminal outcome of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The player found the song.
    Correct,
    /// All rungs were used up without a correct guess.
    Incorrect,
    /// The server already scored this player for the round.
    AlreadyPlayed,
}

impl From<Outcome> for Conclusion {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Correct => Conclusion::Correct,
            Outcome::Incorrect => Conclusion::Incorrect,
            Outcome::AlreadyPlayed => Conclusion::AlreadyPlayed,
        }
    }
}

/// Events that can be applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Persisted progress was reconciled; the round becomes playable.
    Loaded,
    /// A guess (or the skip sentinel) was sent to the server.
    Submit,
    /// The submission failed in transport; nothing was scored.
    SubmitFailed,
    /// The server rejected the guess and another rung is available.
    WrongGuess,
    /// The player asked for the next rung without guessing.
    RevealNext,
    /// The round ended.
    Conclude(Outcome),
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: SessionPhase,
    /// The event that cannot be applied from this phase.
    pub event: SessionEvent,
}

/// State machine implementing the round lifecycle.
#[derive(Debug, Clone)]
pub struct SessionStateMachine {
    phase: SessionPhase,
    version: usize,
}

impl Default for SessionStateMachine {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Init,
            version: 0,
        }
    }
}

impl SessionStateMachine {
    /// Create a new state machine initialised in [`SessionPhase::Init`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Number of transitions applied so far.
    pub fn version(&self) -> usize {
        self.version
    }

    /// True once a terminal outcome has been reached.
    pub fn is_concluded(&self) -> bool {
        matches!(self.phase, SessionPhase::Concluded(_))
    }

    /// Apply `event`, returning the new phase or leaving the machine untouched on error.
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionPhase, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.phase = next;
        self.version += 1;
        Ok(next)
    }

    /// Compute a transition from an event if the transition is valid.
    fn compute_transition(&self, event: SessionEvent) -> Result<SessionPhase, InvalidTransition> {
        use ActivePhase::{AwaitingGuess, Submitting};

        let next = match (self.phase, event) {
            (SessionPhase::Init, SessionEvent::Loaded) => SessionPhase::Active(AwaitingGuess),
            (SessionPhase::Init, SessionEvent::Conclude(Outcome::AlreadyPlayed)) => {
                SessionPhase::Concluded(Outcome::AlreadyPlayed)
            }
            (SessionPhase::Active(AwaitingGuess), SessionEvent::Submit) => {
                SessionPhase::Active(Submitting)
            }
            (SessionPhase::Active(AwaitingGuess), SessionEvent::RevealNext) => {
                SessionPhase::Active(AwaitingGuess)
            }
            (SessionPhase::Active(Submitting), SessionEvent::SubmitFailed)
            | (SessionPhase::Active(Submitting), SessionEvent::WrongGuess) => {
                SessionPhase::Active(AwaitingGuess)
            }
            (SessionPhase::Active(Submitting), SessionEvent::Conclude(outcome)) => {
                SessionPhase::Concluded(outcome)
            }
            // The completion check may land while the player is idle.
            (SessionPhase::Active(AwaitingGuess), SessionEvent::Conclude(Outcome::AlreadyPlayed)) => {
                SessionPhase::Concluded(Outcome::AlreadyPlayed)
            }
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}
