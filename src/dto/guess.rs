use serde::{Deserialize, Serialize};

use crate::state::round::Answer;

/// Body of a guess submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuessRequest {
    /// Free text typed or picked by the player, or the skip sentinel.
    #[serde(rename = "song_guess")]
    pub guess: String,
    /// Index of the clearest rung visible when the guess was made.
    pub difficulty_level: usize,
}

/// Server decision for one guess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessVerdict {
    /// The guess matched the song.
    pub correct: bool,
    /// The server had already scored this player for the round.
    pub already_played: bool,
    /// Song of the round, disclosed with every verdict.
    pub correct_answer: Answer,
    /// Authoritative score for a correct guess.
    pub score: Option<u32>,
    /// Optional server message, shown on the already-played path.
    pub message: Option<String>,
}

/// Guess endpoint payload.
#[derive(Debug, Deserialize)]
pub struct GuessResponse {
    #[serde(default)]
    pub correct: bool,
    #[serde(default)]
    pub already_played: bool,
    #[serde(default)]
    pub correct_answer: Option<AnswerDto>,
    #[serde(default)]
    pub song_title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The answer is either structured or a `"<title> by <artist>"` sentence.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AnswerDto {
    Structured { title: String, artist: String },
    Text(String),
}

impl From<AnswerDto> for Answer {
    fn from(dto: AnswerDto) -> Self {
        match dto {
            AnswerDto::Structured { title, artist } => Answer { title, artist },
            AnswerDto::Text(text) => match text.rsplit_once(" by ") {
                Some((title, artist)) => Answer {
                    title: title.to_string(),
                    artist: artist.to_string(),
                },
                None => Answer {
                    title: text,
                    artist: String::new(),
                },
            },
        }
    }
}

impl From<GuessResponse> for GuessVerdict {
    fn from(response: GuessResponse) -> Self {
        let correct_answer = match (response.correct_answer, response.song_title) {
            (Some(answer), _) => answer.into(),
            (None, Some(title)) => Answer {
                title,
                artist: response.artist.unwrap_or_default(),
            },
            (None, None) => Answer {
                title: String::new(),
                artist: response.artist.unwrap_or_default(),
            },
        };

        Self {
            correct: response.correct,
            already_played: response.already_played,
            correct_answer,
            score: response.score,
            message: response.message,
        }
    }
}
