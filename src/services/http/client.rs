use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    dao::{progress_store::ProgressBackend, storage::StorageResult},
    dto::{
        guess::{GuessRequest, GuessResponse, GuessVerdict},
        progress::{PlayerStateResponse, SavePlayerStateRequest},
        search::{SearchResponse, Suggestion},
        stats::{CurrentStats, StatsResponse},
    },
    error::{ServiceError, ServiceResult},
    services::collaborators::{GuessSubmitter, SearchCatalog, StatsProvider},
    state::{ladder::Rung, round::RoundKey},
};

use super::{
    config::HttpBackendConfig,
    error::{HttpError, HttpResult},
};

const SEARCH_PATH: &str = "spotify_search";
const SUBMIT_GUESS_PATH: &str = "submit_guess";
const CURRENT_STATS_PATH: &str = "current_stats";
const GET_PLAYER_STATE_PATH: &str = "api/get_player_state";
const SAVE_PLAYER_STATE_PATH: &str = "api/save_player_state";

/// Game backend reached over HTTP; implements every remote collaborator.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Arc<str>,
    bearer_token: Option<Arc<str>>,
}

impl HttpBackend {
    /// Build a backend client. No request is made until a collaborator is called.
    pub fn new(config: HttpBackendConfig) -> HttpResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| HttpError::ClientBuilder { source })?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse a preconfigured client, e.g. one with custom timeouts or proxy settings.
    pub fn with_client(client: Client, config: HttpBackendConfig) -> Self {
        Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            bearer_token: config.bearer_token.map(Arc::from),
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let builder = self.client.request(method, url);
        if let Some(ref token) = self.bearer_token {
            builder.bearer_auth(token.as_ref())
        } else {
            builder
        }
    }

    async fn send_json<T>(&self, path: &str, builder: reqwest::RequestBuilder) -> HttpResult<T>
    where
        T: DeserializeOwned,
    {
        let response = builder
            .send()
            .await
            .map_err(|source| HttpError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        match response.status() {
            status if status.is_success() => {
                response
                    .json::<T>()
                    .await
                    .map_err(|source| HttpError::DecodeResponse {
                        path: path.to_string(),
                        source,
                    })
            }
            other => Err(HttpError::RequestStatus {
                path: path.to_string(),
                status: other,
            }),
        }
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> HttpResult<T>
    where
        T: DeserializeOwned,
    {
        let builder = self.request(Method::GET, path).query(query);
        self.send_json(path, builder).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> HttpResult<T>
    where
        B: ?Sized + Serialize,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, path).json(body);
        self.send_json(path, builder).await
    }

    async fn post_ignoring_body<B>(&self, path: &str, body: &B) -> HttpResult<()>
    where
        B: ?Sized + Serialize,
    {
        let response = self
            .request(Method::POST, path)
            .json(body)
            .send()
            .await
            .map_err(|source| HttpError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(HttpError::RequestStatus {
                path: path.to_string(),
                status: response.status(),
            })
        }
    }
}

impl SearchCatalog for HttpBackend {
    fn search(&self, query: String) -> BoxFuture<'static, ServiceResult<Vec<Suggestion>>> {
        let backend = self.clone();
        Box::pin(async move {
            let payload = backend
                .get_json::<SearchResponse>(SEARCH_PATH, &[("q", query.as_str())])
                .await
                .map_err(|err| err.into_service_error("search"))?;
            Ok(payload.tracks.into_iter().map(Suggestion::from).collect())
        })
    }
}

impl GuessSubmitter for HttpBackend {
    fn submit(&self, request: GuessRequest) -> BoxFuture<'static, ServiceResult<GuessVerdict>> {
        let backend = self.clone();
        Box::pin(async move {
            let response = backend
                .post_json::<_, GuessResponse>(SUBMIT_GUESS_PATH, &request)
                .await
                .map_err(|err| err.into_service_error("submit guess"))?;
            Ok(response.into())
        })
    }
}

impl StatsProvider for HttpBackend {
    fn current_stats(&self) -> BoxFuture<'static, ServiceResult<CurrentStats>> {
        let backend = self.clone();
        Box::pin(async move {
            let response = backend
                .get_json::<StatsResponse>(CURRENT_STATS_PATH, &[])
                .await
                .map_err(|err| err.into_service_error("current stats"))?;
            match response {
                StatsResponse::Wrapped { success: true, stats } | StatsResponse::Bare(stats) => {
                    Ok(stats)
                }
                StatsResponse::Wrapped { success: false, .. } => Err(ServiceError::rejected(
                    "current stats",
                    "server reported no stats for this round",
                )),
            }
        })
    }
}

impl ProgressBackend for HttpBackend {
    fn get(&self, key: RoundKey) -> BoxFuture<'static, StorageResult<Option<Vec<Rung>>>> {
        let backend = self.clone();
        Box::pin(async move {
            let result = backend
                .get_json::<PlayerStateResponse>(
                    GET_PLAYER_STATE_PATH,
                    &[("song_id", key.as_str())],
                )
                .await;
            match result {
                Ok(response) => Ok(response.into_revealed()),
                Err(HttpError::RequestStatus { status, .. }) if status == StatusCode::NOT_FOUND => {
                    debug!(round_key = %key, "no server-side progress for round");
                    Ok(None)
                }
                Err(err) => Err(err.into()),
            }
        })
    }

    fn put(&self, key: RoundKey, revealed: Vec<Rung>) -> BoxFuture<'static, StorageResult<()>> {
        let backend = self.clone();
        Box::pin(async move {
            let body = SavePlayerStateRequest {
                round_key: key,
                revealed_rungs: revealed,
            };
            backend
                .post_ignoring_body(SAVE_PLAYER_STATE_PATH, &body)
                .await
                .map_err(Into::into)
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    use super::*;

    /// Answer a single request with `status` and a JSON `body`, yielding the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let read = socket.read(&mut chunk).await.unwrap();
                raw.extend_from_slice(&chunk[..read]);
                let text = String::from_utf8_lossy(&raw).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if raw.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
                if read == 0 {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&raw).to_string()
        });

        (base_url, handle)
    }

    fn backend(base_url: &str) -> HttpBackend {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpBackend::with_client(
            client,
            HttpBackendConfig::new(format!("{base_url}/")).with_bearer_token("secret"),
        )
    }

    #[tokio::test]
    async fn search_encodes_query_and_sends_bearer_token() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"tracks": [{"name": "Around the World", "artist": "Daft Punk", "album": "Homework"}]}"#,
        )
        .await;

        let suggestions = backend(&base_url)
            .search("daft punk & co".into())
            .await
            .unwrap();
        assert_eq!(
            suggestions,
            vec![Suggestion {
                title: "Around the World".into(),
                artist: "Daft Punk".into(),
                album: "Homework".into(),
            }]
        );

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert_eq!(
            request_line,
            "GET /spotify_search?q=daft+punk+%26+co HTTP/1.1"
        );
        assert!(
            request
                .to_ascii_lowercase()
                .contains("authorization: bearer secret")
        );
    }

    #[tokio::test]
    async fn guess_is_posted_with_wire_field_names() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"correct": true, "correct_answer": "Heroes by David Bowie", "score": 6}"#,
        )
        .await;

        let verdict = backend(&base_url)
            .submit(GuessRequest {
                guess: "Heroes - David Bowie".into(),
                difficulty_level: 2,
            })
            .await
            .unwrap();
        assert!(verdict.correct);
        assert_eq!(verdict.score, Some(6));
        assert_eq!(verdict.correct_answer.artist, "David Bowie");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /submit_guess HTTP/1.1"));
        let body = request.split("\r\n\r\n").nth(1).unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(body).unwrap(),
            serde_json::json!({"song_guess": "Heroes - David Bowie", "difficulty_level": 2})
        );
    }

    #[tokio::test]
    async fn missing_player_state_is_absent() {
        let (base_url, server) = serve_once("404 Not Found", "{}").await;

        let revealed = ProgressBackend::get(&backend(&base_url), RoundKey::from("4@2026-10-15"))
            .await
            .unwrap();
        assert_eq!(revealed, None);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/get_player_state?song_id=4%402026-10-15 HTTP/1.1"));
    }

    #[tokio::test]
    async fn unsuccessful_stats_envelope_is_rejected() {
        let (base_url, server) = serve_once("200 OK", r#"{"success": false, "stats": {}}"#).await;

        let err = backend(&base_url).current_stats().await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Rejected {
                operation: "current stats",
                ..
            }
        ));
        assert!(server.await.unwrap().starts_with("GET /current_stats HTTP/1.1"));
    }

    #[tokio::test]
    async fn server_errors_are_rejections() {
        let (base_url, _server) = serve_once("500 Internal Server Error", "{}").await;

        let err = backend(&base_url).search("queen".into()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Rejected { operation: "search", .. }));
    }
}
