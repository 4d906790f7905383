use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Completion flag and aggregate statistics for the current round.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentStats {
    /// The current identity already has a scored guess for this round.
    #[serde(default)]
    pub has_played_current: bool,
    /// Aggregates over every player.
    #[serde(default)]
    pub song_stats: SongStats,
    /// The player's own history.
    #[serde(default)]
    pub individual_stats: IndividualStats,
}

/// Statistics across every player for the current song.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SongStats {
    /// Mean score of everyone who played.
    #[serde(default)]
    pub average_score: f64,
    /// Number of players who finished the round.
    #[serde(default)]
    pub total_plays: u32,
    /// Number of players who found the song.
    #[serde(default)]
    pub total_correct_guesses: u32,
}

/// The player's own score distribution across past rounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualStats {
    /// Number of correct rounds per score, in server order.
    #[serde(default, with = "crate::dto::score_map")]
    pub points_distribution: IndexMap<u32, u32>,
    /// Largest bucket, used to scale bar charts.
    #[serde(default = "default_max_count")]
    pub max_count: u32,
}

impl Default for IndividualStats {
    fn default() -> Self {
        Self {
            points_distribution: IndexMap::new(),
            max_count: default_max_count(),
        }
    }
}

fn default_max_count() -> u32 {
    1
}

/// Stats endpoint payload; older servers wrap the stats in a success envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StatsResponse {
    Wrapped { success: bool, stats: CurrentStats },
    Bare(CurrentStats),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distribution_keys_are_parsed_as_scores() {
        let stats: CurrentStats = serde_json::from_str(
            r#"{
                "has_played_current": true,
                "song_stats": {"average_score": 4.5, "total_plays": 10, "total_correct_guesses": 6},
                "individual_stats": {"points_distribution": {"7": 2, "3": 1}, "max_count": 2}
            }"#,
        )
        .unwrap();

        assert!(stats.has_played_current);
        assert_eq!(stats.song_stats.total_plays, 10);
        let buckets = stats
            .individual_stats
            .points_distribution
            .iter()
            .map(|(score, count)| (*score, *count))
            .collect::<Vec<_>>();
        assert_eq!(buckets, vec![(7, 2), (3, 1)]);
    }

    #[test]
    fn envelope_and_bare_payloads_both_decode() {
        let wrapped: StatsResponse =
            serde_json::from_str(r#"{"success": true, "stats": {"has_played_current": true}}"#)
                .unwrap();
        assert!(matches!(
            wrapped,
            StatsResponse::Wrapped { success: true, ref stats } if stats.has_played_current
        ));

        let bare: StatsResponse = serde_json::from_str(
            r#"{"has_played_current": false, "song_stats": {"average_score": 0.0}}"#,
        )
        .unwrap();
        match bare {
            StatsResponse::Bare(stats) => {
                assert!(!stats.has_played_current);
                assert_eq!(stats.individual_stats.max_count, 1);
            }
            other => panic!("expected bare stats, got {other:?}"),
        }
    }
}
