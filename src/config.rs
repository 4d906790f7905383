//! Client configuration loading: scoring, timing, storage namespace and the default rung ladder.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use serde_with::{DurationMilliSeconds, serde_as};
use thiserror::Error;
use tracing::{info, warn};
use validator::{Validate, ValidationErrors};

use crate::state::ladder::Rung;

/// Default location on disk where the client looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/client.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "REVEAL_ROUND_CONFIG_PATH";
/// Frequency cut-offs used when a round does not supply its own ladder.
const DEFAULT_RUNGS: [&str; 7] = ["100", "500", "1000", "2000", "3500", "5000", "7500"];

/// Why a configuration document was refused.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for [`ClientConfig`].
    #[error("failed to parse client config")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but holds out-of-range values.
    #[error("invalid client config: {0}")]
    Invalid(#[from] ValidationErrors),
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
#[serde(default)]
/// Immutable runtime configuration shared by every round controller.
pub struct ClientConfig {
    /// Points on offer at the hardest rung.
    #[validate(range(min = 1))]
    pub max_score: u32,
    /// Quiet period before a search is sent.
    #[serde(rename = "debounce_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub debounce: Duration,
    /// Shortest trimmed query that triggers a search.
    #[validate(range(min = 1))]
    pub min_query_chars: usize,
    /// Maximum number of suggestions displayed.
    #[validate(range(min = 1))]
    pub suggestion_limit: usize,
    /// Delay before a newly revealed rung is shown, for effect.
    #[serde(rename = "reveal_delay_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub reveal_delay: Duration,
    /// Lifetime of the transient incorrect-guess banner.
    #[serde(rename = "notice_ttl_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub notice_ttl: Duration,
    /// Prefix of local storage keys.
    #[validate(length(min = 1))]
    pub storage_namespace: String,
    /// Guess text sent to fetch the answer once every rung is revealed.
    #[validate(length(min = 1))]
    pub skip_sentinel: String,
    /// Ladder used when a round does not provide one.
    #[validate(length(min = 1))]
    pub default_rungs: Vec<Rung>,
}

impl ClientConfig {
    /// Load the configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        Self::load_from(&resolve_config_path())
    }

    /// Load the configuration from `path`, falling back to defaults on any problem.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        max_score = config.max_score,
                        rungs = config.default_rungs.len(),
                        "loaded client config"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to load config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse and validate a JSON document. Missing fields take their default value.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config = serde_json::from_str::<Self>(contents)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            max_score: 8,
            debounce: Duration::from_millis(300),
            min_query_chars: 2,
            suggestion_limit: 5,
            reveal_delay: Duration::from_millis(1_000),
            notice_ttl: Duration::from_millis(2_000),
            storage_namespace: "progress".into(),
            skip_sentinel: "skip_all".into(),
            default_rungs: DEFAULT_RUNGS.into_iter().map(Rung::from).collect(),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
