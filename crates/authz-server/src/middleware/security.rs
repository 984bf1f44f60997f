//! CORS, hardening response headers and the request body limit.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::Method;
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::{Error, Result};

/// Request bodies above this size are refused with `413`; staff CSV uploads
/// are the largest bodies the API accepts.
pub const DEFAULT_MAX_BODY_SIZE: usize = 8 * 1024 * 1024;

/// Frontend dev servers, allowed when no origin is configured.
const LOCAL_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:4200",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:4200",
];

const HARDENING_HEADERS: [(HeaderName, &str); 3] = [
    (header::X_FRAME_OPTIONS, "DENY"),
    (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
    (header::REFERRER_POLICY, "no-referrer"),
];

/// Cross-origin access to the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct CorsConfig {
    /// Origins allowed to call the API; local dev servers when empty.
    #[cfg_attr(
        feature = "config",
        arg(long = "cors-origins", env = "CORS_ORIGINS", value_delimiter = ',')
    )]
    pub allowed_origins: Vec<String>,

    /// Seconds browsers may cache a preflight response.
    #[cfg_attr(feature = "config", arg(long = "cors-max-age", env = "CORS_MAX_AGE", default_value_t = 3600))]
    pub max_age_seconds: u64,

    /// Allows cookies and `Authorization` on cross-origin requests.
    #[cfg_attr(feature = "config", arg(long = "cors-allow-credentials", env = "CORS_ALLOW_CREDENTIALS"))]
    pub allow_credentials: bool,

    /// Largest accepted request body in bytes.
    #[cfg_attr(
        feature = "config",
        arg(long = "max-body-size", env = "MAX_BODY_SIZE", default_value_t = DEFAULT_MAX_BODY_SIZE)
    )]
    pub max_body_size: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
            allow_credentials: false,
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl CorsConfig {
    fn origins(&self) -> Vec<HeaderValue> {
        if self.allowed_origins.is_empty() {
            return LOCAL_ORIGINS
                .iter()
                .copied()
                .map(HeaderValue::from_static)
                .collect();
        }

        self.allowed_origins
            .iter()
            .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
            .collect()
    }

    fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.origins()))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .expose_headers([header::CONTENT_DISPOSITION])
            .allow_credentials(self.allow_credentials)
            .max_age(Duration::from_secs(self.max_age_seconds))
    }

    /// Wildcards are refused since tokens travel in `Authorization`.
    pub fn validate(&self) -> Result<()> {
        if self.max_body_size == 0 {
            return Err(Error::config("max body size must be greater than zero"));
        }

        match self
            .allowed_origins
            .iter()
            .map(|origin| origin.trim())
            .find(|origin| *origin == "*" || HeaderValue::from_str(origin).is_err())
        {
            Some("*") => Err(Error::config("wildcard CORS origin is not allowed")),
            Some(origin) => Err(Error::config(format!("invalid CORS origin: {origin}"))),
            None => Ok(()),
        }
    }
}

/// Adds CORS, hardening headers and the body limit to a [`Router`].
pub trait RouterSecurityExt<S> {
    fn with_security(self, cors: &CorsConfig) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig) -> Self {
        let [frame, sniff, referrer] =
            HARDENING_HEADERS.map(|(name, value)| {
                SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
            });

        self.layer(
            ServiceBuilder::new()
                .layer(frame)
                .layer(sniff)
                .layer(referrer)
                .layer(cors.layer())
                .layer(DefaultBodyLimit::max(cors.max_body_size)),
        )
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum_test::TestServer;

    use super::*;

    fn origins(list: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: list.iter().map(|s| (*s).to_owned()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn local_origins_when_unset() {
        assert_eq!(CorsConfig::default().origins().len(), LOCAL_ORIGINS.len());
    }

    #[test]
    fn origin_validation() {
        assert!(origins(&["https://tolkevarav.eki.ee"]).validate().is_ok());
        assert!(origins(&[" * "]).validate().is_err());
        assert!(origins(&["https://ok.ee", "bad\norigin"]).validate().is_err());
    }

    #[tokio::test]
    async fn sets_hardening_headers() -> anyhow::Result<()> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .with_security(&CorsConfig::default());
        let server = TestServer::new(app)?;

        let response = server.get("/").await;
        assert_eq!(response.header(header::X_FRAME_OPTIONS), "DENY");
        assert_eq!(response.header(header::X_CONTENT_TYPE_OPTIONS), "nosniff");
        assert_eq!(response.header(header::REFERRER_POLICY), "no-referrer");
        Ok(())
    }

    #[tokio::test]
    async fn oversized_bodies_are_refused() -> anyhow::Result<()> {
        let config = CorsConfig {
            max_body_size: 16,
            ..Default::default()
        };
        let app = Router::new()
            .route("/", post(|body: String| async move { body }))
            .with_security(&config);
        let server = TestServer::new(app)?;

        server
            .post("/")
            .text("x".repeat(64))
            .await
            .assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        Ok(())
    }
}
