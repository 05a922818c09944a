use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Provider of module-specific configuration (raw JSON sections only).
pub trait ConfigProvider: Send + Sync {
    /// Returns raw JSON section for the module, if any.
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

#[derive(Clone)]
pub struct ModuleCtx {
    pub(crate) config_provider: Option<Arc<dyn ConfigProvider>>,
    pub(crate) cancellation_token: CancellationToken,
    pub(crate) module_name: Option<Arc<str>>,
    pub(crate) home_dir: Arc<Path>,
}

pub struct ModuleCtxBuilder {
    inner: ModuleCtx,
}

impl ModuleCtxBuilder {
    pub fn new(token: CancellationToken) -> Self {
        Self {
            inner: ModuleCtx {
                config_provider: None,
                cancellation_token: token,
                module_name: None,
                home_dir: Arc::from(Path::new(".")),
            },
        }
    }

    pub fn with_config_provider(mut self, p: Arc<dyn ConfigProvider>) -> Self {
        self.inner.config_provider = Some(p);
        self
    }

    /// Base directory that relative module paths (data files etc.) resolve against.
    pub fn with_home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.inner.home_dir = Arc::from(dir.into());
        self
    }

    pub fn build(self) -> ModuleCtx {
        self.inner
    }
}

impl ModuleCtx {
    /// Scope context to a specific module name (used by the registry).
    pub fn for_module(mut self, name: &str) -> Self {
        self.module_name = Some(Arc::<str>::from(name));
        self
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    pub fn current_module(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    /// Resolve `p` against the home dir unless it is already absolute.
    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.home_dir.join(p)
        }
    }

    /// Deserialize the module's config into `T`.
    ///
    /// A missing section yields `T::default()`; a present but invalid section is
    /// an error naming the module.
    pub fn module_config<T: DeserializeOwned + Default>(&self) -> anyhow::Result<T> {
        let (Some(name), Some(p)) = (&self.module_name, &self.config_provider) else {
            return Ok(T::default());
        };
        match p.get_module_config(name) {
            Some(v) => serde_json::from_value::<T>(v.clone())
                .map_err(|e| anyhow::anyhow!("invalid {name} config: {e}")),
            None => Ok(T::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(deny_unknown_fields)]
    struct DemoCfg {
        #[serde(default)]
        flag: bool,
    }

    struct MapProvider(HashMap<String, serde_json::Value>);

    impl ConfigProvider for MapProvider {
        fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
            self.0.get(module_name)
        }
    }

    fn ctx_with(name: &str, value: serde_json::Value) -> ModuleCtx {
        let provider = MapProvider(HashMap::from([(name.to_string(), value)]));
        ModuleCtxBuilder::new(CancellationToken::new())
            .with_config_provider(Arc::new(provider))
            .build()
    }

    #[test]
    fn module_config_defaults_when_missing() {
        let ctx = ctx_with("other", serde_json::json!({})).for_module("demo");
        assert_eq!(ctx.module_config::<DemoCfg>().unwrap(), DemoCfg::default());
    }

    #[test]
    fn module_config_reads_section() {
        let ctx = ctx_with("demo", serde_json::json!({ "flag": true })).for_module("demo");
        assert!(ctx.module_config::<DemoCfg>().unwrap().flag);
    }

    #[test]
    fn module_config_rejects_invalid_section() {
        let ctx = ctx_with("demo", serde_json::json!({ "bogus": 1 })).for_module("demo");
        let err = ctx.module_config::<DemoCfg>().unwrap_err();
        assert!(err.to_string().contains("invalid demo config"));
    }

    #[test]
    fn unscoped_context_uses_defaults() {
        let ctx = ctx_with("demo", serde_json::json!({ "flag": true }));
        assert_eq!(ctx.current_module(), None);
        assert!(!ctx.module_config::<DemoCfg>().unwrap().flag);
    }

    #[test]
    fn paths_resolve_against_home_dir() {
        let ctx = ModuleCtxBuilder::new(CancellationToken::new())
            .with_home_dir("/srv/contacts")
            .build();
        assert_eq!(
            ctx.resolve_path("data/contacts.json"),
            PathBuf::from("/srv/contacts/data/contacts.json")
        );
        assert_eq!(ctx.resolve_path("/tmp/x.json"), PathBuf::from("/tmp/x.json"));
    }
}
