use super::error::{HttpError, HttpResult};

const BASE_URL_ENV: &str = "REVEAL_BACKEND_URL";
const TOKEN_ENV: &str = "REVEAL_BACKEND_TOKEN";

/// Runtime configuration describing how to reach the game backend.
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Backend root, e.g. `https://example.org`.
    pub base_url: String,
    /// Token of the signed-in player, sent as `Authorization: Bearer`.
    pub bearer_token: Option<String>,
}

impl HttpBackendConfig {
    /// Construct a configuration from an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
        }
    }

    /// Attach a bearer token identifying the signed-in player.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> HttpResult<Self> {
        let base_url = std::env::var(BASE_URL_ENV)
            .map_err(|_| HttpError::MissingEnvVar { var: BASE_URL_ENV })?;

        let mut config = Self::new(base_url);
        if let Some(token) = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty()) {
            config = config.with_bearer_token(token);
        }

        Ok(config)
    }
}
