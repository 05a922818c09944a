use serde::{Deserialize, Serialize};

/// API ingress configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Serve `/openapi.json`.
    #[serde(default = "default_true")]
    pub enable_docs: bool,
    #[serde(default)]
    pub cors_enabled: bool,
    #[serde(default = "default_request_timeout_sec")]
    pub request_timeout_sec: u64,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            enable_docs: true,
            cors_enabled: false,
            request_timeout_sec: default_request_timeout_sec(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8087".to_string()
}

fn default_true() -> bool {
    true
}

fn default_request_timeout_sec() -> u64 {
    30
}

fn default_body_limit_bytes() -> usize {
    16 * 1024 * 1024
}
