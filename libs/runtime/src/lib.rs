pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    default_logging_config, AppConfig, CliArgs, LoggingConfig, Section, ServerConfig,
};

/// Read-only access to per-module configuration values.
pub trait ConfigProvider: Send + Sync {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value>;
}

/// `ConfigProvider` backed by the `modules` bag of an [`AppConfig`].
pub struct AppConfigProvider(AppConfig);

impl AppConfigProvider {
    pub fn new(config: AppConfig) -> Self {
        Self(config)
    }

    pub fn app_config(&self) -> &AppConfig {
        &self.0
    }
}

impl ConfigProvider for AppConfigProvider {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.modules.get(module_name)
    }
}
