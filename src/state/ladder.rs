//! Ordered ladder of reveal rungs, from the most obfuscated clip to the clearest one.

use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque identifier of one clarity level (for example a frequency cut-off tag).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rung(String);

impl Rung {
    /// Wrap a rung identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Rung {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Rung {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Rung {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Errors raised while building or moving along a ladder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LadderError {
    /// A ladder needs at least one rung.
    #[error("a reveal ladder requires at least one rung")]
    Empty,
    /// The same rung identifier was listed twice.
    #[error("rung `{0}` appears more than once in the ladder")]
    DuplicateRung(Rung),
    /// The requested rung is not part of this ladder.
    #[error("rung `{0}` is not part of the ladder")]
    InvalidRung(Rung),
}

/// Result of trying to reveal one more rung.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The next rung is now visible.
    Revealed(Rung),
    /// Every rung is already visible; nothing changed.
    AtCeiling,
}

/// Tracks which prefix of the rung list is currently visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealLadder {
    rungs: Vec<Rung>,
    current: usize,
}

impl RevealLadder {
    /// Build a ladder positioned on its first (hardest) rung.
    pub fn new(rungs: Vec<Rung>) -> Result<Self, LadderError> {
        if rungs.is_empty() {
            return Err(LadderError::Empty);
        }

        let mut seen = HashSet::with_capacity(rungs.len());
        for rung in &rungs {
            if !seen.insert(rung) {
                return Err(LadderError::DuplicateRung(rung.clone()));
            }
        }

        Ok(Self { rungs, current: 0 })
    }

    /// Rung that is currently the clearest visible one.
    pub fn current_rung(&self) -> &Rung {
        &self.rungs[self.current]
    }

    /// Zero-based position of [`Self::current_rung`].
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Number of rungs in the ladder.
    pub fn len(&self) -> usize {
        self.rungs.len()
    }

    /// Always false; a ladder is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Full ordered rung list.
    pub fn rungs(&self) -> &[Rung] {
        &self.rungs
    }

    /// Visible rungs, oldest first.
    pub fn revealed(&self) -> &[Rung] {
        &self.rungs[..=self.current]
    }

    /// True once the clearest rung is visible.
    pub fn is_at_ceiling(&self) -> bool {
        self.current + 1 == self.rungs.len()
    }

    /// Reveal the next rung, or report that none is left.
    pub fn advance(&mut self) -> Advance {
        if self.is_at_ceiling() {
            return Advance::AtCeiling;
        }
        self.current += 1;
        Advance::Revealed(self.current_rung().clone())
    }

    /// Move straight to `rung`, revealing everything before it.
    pub fn jump_to(&mut self, rung: &Rung) -> Result<(), LadderError> {
        let position = self
            .rungs
            .iter()
            .position(|candidate| candidate == rung)
            .ok_or_else(|| LadderError::InvalidRung(rung.clone()))?;
        self.current = position;
        Ok(())
    }

    /// Make every rung visible.
    pub fn reveal_all(&mut self) {
        self.current = self.rungs.len() - 1;
    }
}
