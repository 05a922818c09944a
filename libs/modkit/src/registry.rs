use axum::Router;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use thiserror::Error;

use crate::context;
use crate::contracts;

pub struct ModuleEntry {
    pub name: &'static str,
    pub core: Arc<dyn contracts::Module>,
    pub rest: Option<Arc<dyn contracts::RestfulModule>>,
    pub rest_host: Option<Arc<dyn contracts::RestHostModule>>,
    pub stateful: Option<Arc<dyn contracts::StatefulModule>>,
}

impl std::fmt::Debug for ModuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleEntry")
            .field("name", &self.name)
            .field("has_rest", &self.rest.is_some())
            .field("is_rest_host", &self.rest_host.is_some())
            .field("has_stateful", &self.stateful.is_some())
            .finish()
    }
}

/// Modules in registration order; phases run in that order (stop in reverse).
pub struct ModuleRegistry {
    modules: Vec<ModuleEntry>,
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&'static str> = self.modules.iter().map(|m| m.name).collect();
        f.debug_struct("ModuleRegistry")
            .field("modules", &names)
            .finish()
    }
}

impl ModuleRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn modules(&self) -> &[ModuleEntry] {
        &self.modules
    }

    // ---- Ordered phases: init → REST (sync) → start → stop ----

    pub async fn run_init_phase(&self, base_ctx: &context::ModuleCtx) -> Result<(), RegistryError> {
        for e in &self.modules {
            let ctx = base_ctx.clone().for_module(e.name);
            e.core
                .init(&ctx)
                .await
                .map_err(|source| RegistryError::Init {
                    module: e.name,
                    source,
                })?;
        }
        Ok(())
    }

    pub fn run_rest_phase(
        &self,
        base_ctx: &context::ModuleCtx,
        mut router: Router,
    ) -> Result<Router, RegistryError> {
        let mut hosts = self.modules.iter().filter(|e| e.rest_host.is_some());
        let (host_entry, host) = match (hosts.next(), hosts.next()) {
            (None, _) => {
                return if self.modules.iter().any(|e| e.rest.is_some()) {
                    Err(RegistryError::RestRequiresHost)
                } else {
                    Ok(router)
                };
            }
            (Some(_), Some(_)) => return Err(RegistryError::MultipleRestHosts),
            (Some(entry), None) => match &entry.rest_host {
                Some(host) => (entry, host),
                None => return Err(RegistryError::RestHostMissingFromEntry),
            },
        };
        let host_ctx = base_ctx.clone().for_module(host_entry.name);
        let registry: &dyn contracts::OpenApiRegistry = host.as_registry();

        // 1) Host prepare: base Router
        router =
            host.rest_prepare(&host_ctx, router)
                .map_err(|source| RegistryError::RestPrepare {
                    module: host_entry.name,
                    source,
                })?;

        // 2) Register all REST providers
        for e in &self.modules {
            if let Some(rest) = &e.rest {
                let ctx = base_ctx.clone().for_module(e.name);
                router = rest
                    .register_rest(&ctx, router, registry)
                    .map_err(|source| RegistryError::RestRegister {
                        module: e.name,
                        source,
                    })?;
            }
        }

        // 3) Host finalize: /openapi.json, middleware, keep the router for serving
        router = host.rest_finalize(&host_ctx, router).map_err(|source| {
            RegistryError::RestFinalize {
                module: host_entry.name,
                source,
            }
        })?;

        Ok(router)
    }

    pub async fn run_start_phase(&self, cancel: CancellationToken) -> Result<(), RegistryError> {
        for e in &self.modules {
            if let Some(s) = &e.stateful {
                s.start(cancel.clone())
                    .await
                    .map_err(|source| RegistryError::Start {
                        module: e.name,
                        source,
                    })?;
            }
        }
        Ok(())
    }

    pub async fn run_stop_phase(&self, cancel: CancellationToken) -> Result<(), RegistryError> {
        for e in self.modules.iter().rev() {
            if let Some(s) = &e.stateful {
                if let Err(err) = s.stop(cancel.clone()).await {
                    tracing::warn!(module = e.name, error = %err, "Failed to stop module");
                }
            }
        }
        Ok(())
    }

    pub fn get_module(&self, name: &str) -> Option<Arc<dyn contracts::Module>> {
        self.modules
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.core.clone())
    }
}

/// Collects modules and their capabilities. Capabilities are attached to a
/// core registered under the same name.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<ModuleEntry>,
    errors: Vec<String>,
}

impl RegistryBuilder {
    pub fn register_core(mut self, name: &'static str, m: Arc<dyn contracts::Module>) -> Self {
        if self.entries.iter().any(|e| e.name == name) {
            self.errors.push(format!("module '{name}' is already registered"));
            return self;
        }
        self.entries.push(ModuleEntry {
            name,
            core: m,
            rest: None,
            rest_host: None,
            stateful: None,
        });
        self
    }

    pub fn register_rest(self, name: &'static str, m: Arc<dyn contracts::RestfulModule>) -> Self {
        self.attach(name, "rest", |e| e.rest = Some(m))
    }

    pub fn register_rest_host(
        self,
        name: &'static str,
        m: Arc<dyn contracts::RestHostModule>,
    ) -> Self {
        self.attach(name, "rest_host", |e| e.rest_host = Some(m))
    }

    pub fn register_stateful(
        self,
        name: &'static str,
        m: Arc<dyn contracts::StatefulModule>,
    ) -> Self {
        self.attach(name, "stateful", |e| e.stateful = Some(m))
    }

    fn attach(
        mut self,
        name: &'static str,
        capability: &str,
        set: impl FnOnce(&mut ModuleEntry),
    ) -> Self {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => set(entry),
            None => self.errors.push(format!(
                "{capability} capability for '{name}' registered without a core"
            )),
        }
        self
    }

    pub fn build(self) -> Result<ModuleRegistry, RegistryError> {
        if !self.errors.is_empty() {
            return Err(RegistryError::InvalidRegistryConfiguration {
                errors: self.errors,
            });
        }
        Ok(ModuleRegistry {
            modules: self.entries,
        })
    }
}

/// Structured errors for the module registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("initialization failed for module '{module}'")]
    Init {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("start failed for '{module}'")]
    Start {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("REST prepare failed for host module '{module}'")]
    RestPrepare {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("REST registration failed for module '{module}'")]
    RestRegister {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("REST finalize failed for host module '{module}'")]
    RestFinalize {
        module: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("REST phase requires an ingress host: modules with capability 'rest' found, but no module with capability 'rest_host'")]
    RestRequiresHost,
    #[error("multiple 'rest_host' modules detected; exactly one is allowed")]
    MultipleRestHosts,
    #[error("REST host missing from entry")]
    RestHostMissingFromEntry,
    #[error("invalid registry configuration:\n{errors:#?}")]
    InvalidRegistryConfiguration { errors: Vec<String> },
}
