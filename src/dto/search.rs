use serde::{Deserialize, Serialize};

/// One catalog match offered while the player types a guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Song title.
    pub title: String,
    /// Performing artist.
    pub artist: String,
    /// Album, shown as secondary text.
    pub album: String,
}

impl Suggestion {
    /// Guess text submitted when this suggestion is picked.
    pub fn guess_text(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

/// Search endpoint payload.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub tracks: Vec<TrackDto>,
}

/// Catalog track as returned by the search endpoint.
#[derive(Debug, Deserialize)]
pub struct TrackDto {
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
}

impl From<TrackDto> for Suggestion {
    fn from(track: TrackDto) -> Self {
        Self {
            title: track.name,
            artist: track.artist,
            album: track.album,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guess_text_joins_title_and_artist() {
        let suggestion = Suggestion {
            title: "Ghost Town".into(),
            artist: "Kanye West".into(),
            album: "ye".into(),
        };
        assert_eq!(suggestion.guess_text(), "Ghost Town - Kanye West");
    }

    #[test]
    fn tracks_map_name_to_title() {
        let payload: SearchResponse = serde_json::from_str(
            r#"{"tracks":[{"name":"Milan","artist":"Emile Mosseri","album":"Minari"}]}"#,
        )
        .unwrap();
        let suggestions = payload
            .tracks
            .into_iter()
            .map(Suggestion::from)
            .collect::<Vec<_>>();
        assert_eq!(suggestions[0].title, "Milan");
        assert_eq!(suggestions[0].album, "Minari");
    }
}
