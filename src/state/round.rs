//! Per-round data: the round key, the scored state and the persisted reveal progress.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::state::ladder::Rung;

/// Identifies one round (one song for one time window).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundKey(String);

impl RoundKey {
    /// Wrap a pre-built key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key for the song of the day, e.g. `42@2026-10-15`.
    pub fn daily(song_id: impl fmt::Display, date: Date) -> Self {
        let format = format_description!("[year]-[month]-[day]");
        let day = date
            .format(&format)
            .unwrap_or_else(|_| date.to_julian_day().to_string());
        Self(format!("{song_id}@{day}"))
    }

    /// Borrow the raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoundKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RoundKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// How a round ended, if it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conclusion {
    /// The round is still being played.
    NotConcluded,
    /// The player found the song.
    Correct,
    /// Every rung was revealed without a correct guess.
    Incorrect,
    /// The server already holds a scored guess for this player and round.
    AlreadyPlayed,
}

/// Scored state of the round owned by the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundState {
    /// Index of the clearest visible rung.
    pub current_index: usize,
    /// Terminal outcome, if any.
    pub concluded: Conclusion,
    /// Points currently on offer, or the final score once concluded.
    pub score: u32,
}

/// Reveal depth saved between visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedProgress {
    /// Round this progress belongs to.
    pub round_key: RoundKey,
    /// Revealed rungs, oldest first.
    pub revealed_rungs: Vec<Rung>,
}

impl PersistedProgress {
    /// Clearest rung the player had reached.
    pub fn last_revealed(&self) -> Option<&Rung> {
        self.revealed_rungs.last()
    }
}

/// Title/artist pair used for the correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// Song title.
    pub title: String,
    /// Performing artist.
    pub artist: String,
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.artist)
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use super::*;

    #[test]
    fn daily_key_includes_song_and_day() {
        let key = RoundKey::daily(42, date!(2026 - 10 - 05));
        assert_eq!(key.as_str(), "42@2026-10-05");

        let other = RoundKey::daily(42, Date::from_calendar_date(2026, Month::October, 6).unwrap());
        assert_ne!(key, other);
    }

    #[test]
    fn answer_display_matches_reveal_text() {
        let answer = Answer {
            title: "Mr Brightside".into(),
            artist: "The Killers".into(),
        };
        assert_eq!(answer.to_string(), "Mr Brightside by The Killers");
    }
}
