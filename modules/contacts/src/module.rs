use std::sync::Arc;

use anyhow::Context;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use modkit::api::OpenApiRegistry;
use modkit::{Module, ModuleCtx, RestfulModule};
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::{ContactsConfig, StorageKind};
use crate::contract::client::ContactsApi;
use crate::domain::repo::ContactsRepository;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::ContactsLocalClient;
use crate::infra::seed::seed_if_empty;
use crate::infra::storage::file::FileContactsRepository;
use crate::infra::storage::memory::InMemoryContactsRepository;

pub const MODULE_NAME: &str = "contacts";

/// Contacts module: owns the store and serves the contact routes
#[derive(Default)]
pub struct Contacts {
    // Keep the domain service behind ArcSwap for cheap read-mostly access.
    service: ArcSwapOption<Service>,
}

impl Contacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// In-process client, available once `init` has run.
    pub fn client(&self) -> Option<Arc<dyn ContactsApi>> {
        self.service
            .load_full()
            .map(|svc| Arc::new(ContactsLocalClient::new(svc)) as Arc<dyn ContactsApi>)
    }

    fn open_repository(
        ctx: &ModuleCtx,
        cfg: &ContactsConfig,
    ) -> anyhow::Result<Arc<dyn ContactsRepository>> {
        Ok(match cfg.storage {
            StorageKind::Memory => {
                info!("Using in-memory contact store");
                Arc::new(InMemoryContactsRepository::new())
            }
            StorageKind::File => {
                let path = ctx.resolve_path(&cfg.data_file);
                info!(path = %path.display(), "Using file contact store");
                let repo = FileContactsRepository::open(&path)
                    .with_context(|| format!("open contact store {}", path.display()))?;
                Arc::new(repo)
            }
        })
    }
}

#[async_trait]
impl Module for Contacts {
    async fn init(&self, ctx: &ModuleCtx) -> anyhow::Result<()> {
        info!("Initializing contacts module");

        let cfg: ContactsConfig = ctx.module_config()?;
        debug!(
            "Loaded contacts config: storage={:?}, data_file={}, seed_sample_data={}",
            cfg.storage, cfg.data_file, cfg.seed_sample_data
        );

        // Wire repository (infra) to domain service (port)
        let repo = Self::open_repository(ctx, &cfg)?;
        let service = Service::new(repo, ServiceConfig::default());

        if cfg.seed_sample_data {
            seed_if_empty(&service)
                .await
                .context("seed sample contacts")?;
        }

        self.service.store(Some(Arc::new(service)));
        info!("Contacts module initialized");
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

impl RestfulModule for Contacts {
    fn register_rest(
        &self,
        _ctx: &ModuleCtx,
        router: axum::Router,
        openapi: &dyn OpenApiRegistry,
    ) -> anyhow::Result<axum::Router> {
        info!("Registering contacts REST routes");

        let service = self
            .service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))?;

        let router = routes::register_routes(router, openapi, service)?;
        info!("Contacts REST routes registered successfully");
        Ok(router)
    }
}
