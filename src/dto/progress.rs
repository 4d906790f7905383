use serde::{Deserialize, Serialize};

use crate::state::{ladder::Rung, round::RoundKey};

/// Body of the save-progress call.
#[derive(Debug, Serialize)]
pub struct SavePlayerStateRequest {
    #[serde(rename = "song_id")]
    pub round_key: RoundKey,
    #[serde(rename = "revealed_frequencies")]
    pub revealed_rungs: Vec<Rung>,
}

/// Get-progress endpoint payload.
#[derive(Debug, Deserialize)]
pub struct PlayerStateResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, rename = "revealed_frequencies")]
    pub revealed_rungs: Option<Vec<Rung>>,
}

impl PlayerStateResponse {
    /// Revealed rungs, or `None` when the server has no record.
    pub fn into_revealed(self) -> Option<Vec<Rung>> {
        if !self.success {
            return None;
        }
        self.revealed_rungs.filter(|rungs| !rungs.is_empty())
    }
}
