use std::future::pending;

use tokio::signal::ctrl_c;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Waits for a signal; a handler that cannot be installed never fires.
async fn wait_for(name: &'static str, signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(error) = signal.await {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            signal = name,
            %error,
            "cannot listen for signal"
        );
        pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    signal(SignalKind::terminate())?.recv().await;
    Ok(())
}

#[cfg(not(unix))]
async fn terminate() -> std::io::Result<()> {
    pending().await
}

/// Resolves on the first SIGINT or SIGTERM.
pub(super) async fn shutdown_signal() {
    let received = tokio::select! {
        () = wait_for("SIGINT", ctrl_c()) => "SIGINT",
        () = wait_for("SIGTERM", terminate()) => "SIGTERM",
    };

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        signal = received,
        "draining in-flight requests"
    );
}
