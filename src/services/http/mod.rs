mod client;
mod config;
mod error;

pub use client::HttpBackend;
pub use config::HttpBackendConfig;
pub use error::{HttpError, HttpResult};
