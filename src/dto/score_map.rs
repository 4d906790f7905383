//! Serde helpers for score-keyed maps whose JSON keys are strings.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S>(value: &IndexMap<u32, u32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let as_string = value
        .iter()
        .map(|(score, count)| (score.to_string(), *count))
        .collect::<IndexMap<_, _>>();
    as_string.serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<IndexMap<u32, u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, u32>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, count)| {
            key.parse::<u32>()
                .map(|score| (score, count))
                .map_err(serde::de::Error::custom)
        })
        .collect()
}
