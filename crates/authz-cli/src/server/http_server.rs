use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use super::shutdown::shutdown_signal;
use super::{ServerError, ServerResult};
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Serves `app` on the configured address until SIGINT or SIGTERM.
///
/// After the signal, in-flight requests get `shutdown_timeout` to finish
/// before the server stops regardless.
///
/// # Errors
///
/// [`ServerError::Bind`] when the address is taken or not permitted and
/// [`ServerError::Runtime`] when accepting connections fails.
pub async fn serve(app: Router, config: &ServerConfig) -> ServerResult<()> {
    let address = config.server_addr();
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ServerError::Bind { address, source })?;

    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "listening on every interface, keep the port behind a firewall"
        );
    }
    tracing::info!(target: TRACING_TARGET_SERVER_STARTUP, %address, "listening");

    let (signalled, draining) = oneshot::channel();
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled.send(());
    });

    let started = Instant::now();
    let result = drain_within(config.shutdown_timeout(), server.into_future(), async {
        // A dropped sender means the server stopped on its own.
        if draining.await.is_err() {
            std::future::pending::<()>().await;
        }
    })
    .await;
    report(result, started)
}

/// Runs `server`; once `signal` fires it has `grace` left to finish.
async fn drain_within(
    grace: Duration,
    server: impl Future<Output = io::Result<()>>,
    signal: impl Future<Output = ()>,
) -> ServerResult<()> {
    let deadline = async {
        signal.await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => result.map_err(ServerError::Runtime),
        () = deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                grace_secs = grace.as_secs(),
                "requests still running after the shutdown timeout, stopping anyway"
            );
            Ok(())
        }
    }
}

fn report(result: ServerResult<()>, started: Instant) -> ServerResult<()> {
    let uptime_secs = started.elapsed().as_secs();
    match &result {
        Ok(()) => tracing::info!(target: TRACING_TARGET_SERVER_SHUTDOWN, uptime_secs, "server stopped"),
        Err(error) => tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            %error,
            code = error.error_code(),
            suggestion = error.suggestion(),
            uptime_secs,
            "server failed"
        ),
    }
    result
}

#[cfg(test)]
mod tests {
    use std::future::pending;

    use super::*;

    #[tokio::test]
    async fn clean_stop_is_ok() {
        let result = drain_within(Duration::from_secs(1), async { Ok(()) }, pending()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn io_failure_becomes_runtime_error() {
        let server = async { Err(io::Error::from(io::ErrorKind::PermissionDenied)) };
        let result = drain_within(Duration::from_secs(1), server, pending()).await;

        let Err(ServerError::Runtime(error)) = result else {
            panic!("expected a runtime error");
        };
        assert_eq!(error.kind(), io::ErrorKind::PermissionDenied);
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_requests_are_cut_off() {
        let result = drain_within(Duration::from_secs(5), pending(), async {}).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn taken_port_is_a_bind_error() -> anyhow::Result<()> {
        let taken = TcpListener::bind("127.0.0.1:0").await?;
        let config = ServerConfig {
            port: taken.local_addr()?.port(),
            ..ServerConfig::default()
        };

        let result = serve(Router::new(), &config).await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));
        Ok(())
    }
}
