//! ModKit runtime runner.
//!
//! One stable `ModuleCtx` is built up front and reused across all phases
//! (init → rest → start → wait → stop). Shutdown is driven by OS signals or by
//! an external `CancellationToken`.

use crate::context::{ConfigProvider, ModuleCtxBuilder};
use crate::registry::ModuleRegistry;
use crate::runtime::shutdown;
use std::{path::PathBuf, sync::Arc};
use tokio_util::sync::CancellationToken;

/// How the runtime should decide when to stop.
pub enum ShutdownOptions {
    /// Listen for OS signals (Ctrl+C / SIGTERM).
    Signals,
    /// An external `CancellationToken` controls the lifecycle.
    Token(CancellationToken),
}

pub struct RunOptions {
    /// Provider of module config sections (raw JSON by module name).
    pub modules_cfg: Arc<dyn ConfigProvider>,
    /// Base directory for module-relative paths.
    pub home_dir: PathBuf,
    pub registry: ModuleRegistry,
    pub shutdown: ShutdownOptions,
}

/// Full cycle: init → rest (sync) → start → wait → stop.
pub async fn run(opts: RunOptions) -> anyhow::Result<()> {
    let cancel = match &opts.shutdown {
        ShutdownOptions::Token(t) => t.clone(),
        ShutdownOptions::Signals => CancellationToken::new(),
    };

    match opts.shutdown {
        ShutdownOptions::Signals => {
            let _ = shutdown::cancel_on_shutdown(cancel.clone());
        }
        ShutdownOptions::Token(_) => {
            tracing::info!("shutdown: external token will control lifecycle");
        }
    }

    let registry = opts.registry;
    let base_ctx = ModuleCtxBuilder::new(cancel.clone())
        .with_config_provider(opts.modules_cfg)
        .with_home_dir(opts.home_dir)
        .build();

    tracing::info!("Phase: init");
    registry.run_init_phase(&base_ctx).await?;

    tracing::info!("Phase: rest (sync)");
    let _ = registry.run_rest_phase(&base_ctx, axum::Router::new())?;

    tracing::info!("Phase: start");
    registry.run_start_phase(cancel.clone()).await?;

    cancel.cancelled().await;

    tracing::info!("Phase: stop");
    registry.run_stop_phase(cancel).await?;
    Ok(())
}
