//! Request timeouts and panic recovery.
//!
//! Both failures are answered with the JSON error body used by the handlers.

use std::any::Any;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::response::{IntoResponse, Response};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower::timeout::error::Elapsed;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::ErrorKind;
use crate::utility::tracing_targets::{
    TRACING_TARGET_RECOVERY_ERROR, TRACING_TARGET_RECOVERY_PANIC,
};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Settings of [`RouterRecoveryExt::with_recovery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct RecoveryConfig {
    /// Seconds after which a request is abandoned with `504 Gateway Timeout`.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "REQUEST_TIMEOUT", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)
    )]
    pub request_timeout: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self::with_timeout_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
    }
}

impl RecoveryConfig {
    pub const fn with_timeout_secs(request_timeout: u64) -> Self {
        Self { request_timeout }
    }

    #[inline]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn validate(&self) -> crate::Result<()> {
        match self.request_timeout {
            0 => Err(crate::Error::config("request timeout must be greater than zero")),
            _ => Ok(()),
        }
    }
}

/// Adds request timeouts and panic recovery to a [`Router`].
pub trait RouterRecoveryExt<S> {
    fn with_recovery(self, config: &RecoveryConfig) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        self.layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(recover))
                .layer(CatchPanicLayer::custom(panic_response))
                .layer(TimeoutLayer::new(config.request_timeout())),
        )
    }
}

async fn recover(error: tower::BoxError) -> Response {
    if error.is::<Elapsed>() {
        tracing::warn!(target: TRACING_TARGET_RECOVERY_ERROR, "request timed out");
        return ErrorKind::GatewayTimeout
            .with_context("The request took too long to process and was terminated")
            .into_response();
    }

    tracing::error!(
        target: TRACING_TARGET_RECOVERY_ERROR,
        error = %error,
        "middleware failed"
    );
    ErrorKind::InternalServerError.into_response()
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&str>()
            .map_or_else(|| "non-string panic payload".to_owned(), |s| (*s).to_owned()),
    };

    tracing::error!(target: TRACING_TARGET_RECOVERY_PANIC, panic = %detail, "handler panicked");
    ErrorKind::InternalServerError.into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum_test::TestServer;

    use super::*;

    async fn panicking() -> &'static str {
        panic!("handler failed")
    }

    fn app(timeout_secs: u64) -> Router {
        Router::new()
            .route("/panic", get(panicking))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .with_recovery(&RecoveryConfig::with_timeout_secs(timeout_secs))
    }

    #[tokio::test]
    async fn panics_become_internal_errors() -> anyhow::Result<()> {
        let server = TestServer::new(app(30))?;

        let response = server.get("/panic").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "internal_server_error");
        Ok(())
    }

    #[tokio::test]
    async fn slow_requests_time_out() -> anyhow::Result<()> {
        let server = TestServer::new(app(1))?;

        server
            .get("/slow")
            .await
            .assert_status(StatusCode::GATEWAY_TIMEOUT);
        Ok(())
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(RecoveryConfig::with_timeout_secs(0).validate().is_err());
        assert!(RecoveryConfig::default().validate().is_ok());
    }
}
