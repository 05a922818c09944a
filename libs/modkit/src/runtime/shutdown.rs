use anyhow::Result;
use tokio_util::sync::CancellationToken;

/// Resolve once the process receives a termination request.
pub async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?; // Ctrl+C
        tokio::select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
        }
        Ok(())
    }

    #[cfg(windows)]
    {
        use tokio::signal::windows::{ctrl_break, ctrl_c, ctrl_close, ctrl_shutdown};
        let mut c = ctrl_c()?;
        let mut br = ctrl_break()?;
        let mut cl = ctrl_close()?;
        let mut sh = ctrl_shutdown()?;
        tokio::select! {
            _ = c.recv()  => {},
            _ = br.recv() => {},
            _ = cl.recv() => {},
            _ = sh.recv() => {},
        }
        Ok(())
    }
}

/// Spawn a task that cancels `token` on the first shutdown signal.
///
/// If signal handlers cannot be installed it falls back to `ctrl_c()`.
pub fn cancel_on_shutdown(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            res = wait_for_shutdown() => {
                match res {
                    Ok(()) => tracing::info!("shutdown: signal received"),
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "shutdown: primary waiter failed; falling back to ctrl_c()"
                        );
                        let _ = tokio::signal::ctrl_c().await;
                    }
                }
                token.cancel();
            }
            _ = token.cancelled() => {}
        }
    })
}
