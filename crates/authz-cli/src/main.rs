#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use authz_server::handler::{CustomRoutes, routes};
use authz_server::middleware::{
    RouterObservabilityExt, RouterOpenApiExt, RouterRecoveryExt, RouterSecurityExt,
};
use authz_server::service::{ServiceConfig, ServiceState};
use axum::Router;

use crate::config::{Cli, MiddlewareConfig};

pub const TRACING_TARGET_SERVER_STARTUP: &str = "authz_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "authz_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "authz_cli::config";

#[tokio::main]
async fn main() -> process::ExitCode {
    match run().await {
        Ok(()) => {
            tracing::info!(target: TRACING_TARGET_SERVER_SHUTDOWN, "stopped");
            process::ExitCode::SUCCESS
        }
        Err(error) => {
            // Configuration errors can happen before tracing is installed.
            if tracing::dispatcher::has_been_set() {
                tracing::error!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = format!("{error:#}"),
                    "stopped with an error"
                );
            } else {
                eprintln!("authz: {error:#}");
            }
            process::ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    cli.init_tracing();
    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli.service).await?;
    let app = create_router(state, &cli.middleware);

    server::serve(app, &cli.server).await?;

    Ok(())
}

/// Connects to backing services and runs pending migrations.
async fn create_service_state(config: &ServiceConfig) -> anyhow::Result<ServiceState> {
    ServiceState::from_config(config)
        .await
        .context("could not connect the backing services")
}

/// Layers added last run first: recovery wraps observability, which wraps
/// the security layers around the routes.
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes(CustomRoutes::new())
        .with_open_api(&middleware.openapi)
        .with_state(state)
        .with_security(&middleware.cors)
        .with_observability()
        .with_recovery(&middleware.recovery)
}
