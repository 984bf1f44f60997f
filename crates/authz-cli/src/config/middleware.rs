//! Middleware configuration for the HTTP server.
//!
//! ```bash
//! authz --cors-origins "https://tv.example.ee" --request-timeout 60
//! ```

use authz_server::middleware::{CorsConfig, OpenApiConfig, RecoveryConfig};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// CORS, OpenAPI and recovery settings.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Cross-origin access to the API.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// Paths of the OpenAPI document and the Scalar UI.
    #[clap(flatten)]
    pub openapi: OpenApiConfig,

    /// Request timeout and panic recovery.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Validates every middleware section.
    pub fn validate(&self) -> authz_server::Result<()> {
        self.cors.validate()?;
        self.openapi.validate()?;
        self.recovery.validate()
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            cors_origins = ?self.cors.allowed_origins,
            cors_credentials = self.cors.allow_credentials,
            max_body_size = self.cors.max_body_size,
            openapi = %self.openapi.open_api_json,
            scalar = %self.openapi.scalar_ui,
            request_timeout_secs = self.recovery.request_timeout,
            "middleware configured"
        );
    }
}
