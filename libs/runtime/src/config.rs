use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::paths::home_dir::resolve_home_dir;

/// Main application configuration with strongly-typed global sections
/// and a flexible per-module configuration bag.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Core server configuration.
    pub server: ServerConfig,
    /// Logging configuration (optional, uses defaults if None).
    pub logging: Option<LoggingConfig>,
    /// Directory containing per-module YAML files (optional).
    #[serde(default)]
    pub modules_dir: Option<String>,
    /// Per-module configuration bag: module_name → arbitrary JSON/YAML value.
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub home_dir: String, // will be normalized to absolute path
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub timeout_sec: u64,
}

/// Logging configuration - maps subsystem names to their logging settings.
/// Key "default" is the catch-all for logs that don't match explicit subsystems.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    pub file: String,          // "logs/api.log"
    #[serde(default)]
    pub file_level: String,
    pub max_age_days: Option<u32>,
    #[serde(default)]
    pub max_backups: Option<usize>, // How many files to keep
    #[serde(default)]
    pub max_size_mb: Option<u64>, // Max size of the file in MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // Empty => platform default resolved by resolve_home_dir():
            // Windows: %APPDATA%/.contacts
            // Unix/macOS: $HOME/.contacts
            home_dir: String::new(),
            host: "127.0.0.1".to_string(),
            port: 8087,
            timeout_sec: 0,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `SocketAddr` parsing.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Create a default logging configuration.
pub fn default_logging_config() -> LoggingConfig {
    let mut logging = HashMap::new();
    logging.insert(
        "default".to_string(),
        Section {
            console_level: "info".to_string(),
            file: "logs/contacts.log".to_string(),
            file_level: "debug".to_string(),
            max_age_days: Some(7),
            max_backups: Some(3),
            max_size_mb: Some(100),
        },
    );
    logging
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration with layered loading: defaults → YAML file → environment variables.
    /// Also normalizes `server.home_dir` into an absolute path and creates the directory.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        use figment::{
            providers::{Env, Format, Serialized, Yaml},
            Figment,
        };

        let path = config_path.as_ref();
        if !path.is_file() {
            anyhow::bail!("config file not found: {}", path.display());
        }

        // Optional sections stay None unless explicitly provided by YAML/ENV.
        let base = AppConfig {
            server: ServerConfig::default(),
            logging: None,
            modules_dir: None,
            modules: HashMap::new(),
        };

        let figment = Figment::new()
            .merge(Serialized::defaults(base))
            .merge(Yaml::file(path))
            // Example: APP__SERVER__PORT=8087 maps to server.port
            .merge(Env::prefixed("APP__").split("__"));

        let mut config: AppConfig = figment
            .extract()
            .with_context(|| format!("Failed to parse yaml config '{}'", path.display()))?;

        normalize_home_dir_inplace(&mut config.server)
            .context("Failed to resolve server.home_dir")?;

        if let Some(dir) = config.modules_dir.clone() {
            merge_module_files(&mut config.modules, dir)?;
        }

        Ok(config)
    }

    /// Load configuration from file or create with default values.
    /// Also normalizes `server.home_dir` into an absolute path and creates the directory.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => {
                let mut c = Self::default();
                normalize_home_dir_inplace(&mut c.server)
                    .context("Failed to resolve server.home_dir (defaults)")?;
                Ok(c)
            }
        }
    }

    /// Serialize configuration to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Apply overrides from command line arguments.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }

        // Set logging level based on verbose flags for "default" section.
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(default_section) = logging.get_mut("default") {
            default_section.console_level = match args.verbose {
                0 => default_section.console_level.clone(), // keep
                1 => "debug".to_string(),
                _ => "trace".to_string(),
            };
        }
    }
}

/// Command line arguments structure.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub print_config: bool,
    pub verbose: u8,
    /// Force the in-memory contact store regardless of module config.
    pub mock: bool,
}

const fn default_subdir() -> &'static str {
    ".contacts"
}

/// Normalize `server.home_dir` and store the absolute path back.
fn normalize_home_dir_inplace(server: &mut ServerConfig) -> Result<()> {
    // Treat empty string as "not provided" => None.
    let opt = if server.home_dir.trim().is_empty() {
        None
    } else {
        Some(server.home_dir.clone())
    };

    let resolved: PathBuf = resolve_home_dir(opt, default_subdir(), /*create*/ true)
        .context("home_dir normalization failed")?;

    server.home_dir = resolved.to_string_lossy().to_string();
    Ok(())
}

fn merge_module_files(
    bag: &mut HashMap<String, serde_json::Value>,
    dir: impl AsRef<Path>,
) -> Result<()> {
    use std::fs;
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if ext != "yml" && ext != "yaml" {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read module config '{}'", path.display()))?;
        let val: serde_yaml::Value = serde_yaml::from_str(&raw)
            .with_context(|| format!("Invalid yaml in module config '{}'", path.display()))?;
        let json = serde_json::to_value(val)?;
        bag.insert(name, json);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// A normalized home_dir should be absolute and not start with '~'.
    fn is_normalized_path(p: &str) -> bool {
        let pb = PathBuf::from(p);
        pb.is_absolute() && !p.starts_with('~')
    }

    #[test]
    fn test_default_config_structure() {
        let config = AppConfig::default();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8087);
        // raw (not yet normalized)
        assert_eq!(config.server.home_dir, "");
        assert_eq!(config.server.timeout_sec, 0);
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8087");

        let logging = config.logging.as_ref().unwrap();
        let default_section = &logging["default"];
        assert_eq!(default_section.console_level, "info");
        assert_eq!(default_section.file, "logs/contacts.log");

        assert!(config.modules.is_empty());
    }

    #[test]
    fn test_load_layered_reads_sections_and_modules() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let home = tmp.path().join("home");

        let yaml = format!(
            r#"
server:
  home_dir: "{}"
  host: "0.0.0.0"
  port: 9090
  timeout_sec: 30

logging:
  default:
    console_level: debug
    file: "logs/default.log"

modules:
  contacts:
    storage: file
    data_file: "data/contacts.json"
"#,
            home.to_string_lossy().replace('\\', "/")
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert!(is_normalized_path(&config.server.home_dir));
        assert!(home.is_dir(), "home_dir must be created");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.timeout_sec, 30);

        let def = &config.logging.as_ref().unwrap()["default"];
        assert_eq!(def.console_level, "debug");
        assert_eq!(def.file, "logs/default.log");

        assert_eq!(config.modules["contacts"]["storage"], "file");
    }

    #[test]
    fn test_minimal_yaml_config() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("cfg.yaml");
        let yaml = format!(
            r#"
server:
  home_dir: "{}"
  host: "localhost"
  port: 8080
"#,
            tmp.path().join("minimal").to_string_lossy().replace('\\', "/")
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert!(config.server.home_dir.ends_with("minimal"));
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.timeout_sec, 0);

        // Optional sections default to None
        assert!(config.logging.is_none());
        assert!(config.modules.is_empty());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let tmp = tempdir().unwrap();
        let err = AppConfig::load_layered(tmp.path().join("absent.yaml")).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();

        let args = CliArgs {
            port: Some(3000),
            verbose: 2,
            ..Default::default()
        };

        config.apply_cli_overrides(&args);

        assert_eq!(config.server.port, 3000);
        let default_section = &config.logging.as_ref().unwrap()["default"];
        assert_eq!(default_section.console_level, "trace");
    }

    #[test]
    fn test_cli_verbose_levels_matrix() {
        for (verbose_level, expected_log_level) in
            [(0, "info"), (1, "debug"), (2, "trace"), (3, "trace")]
        {
            let mut config = AppConfig::default();
            let args = CliArgs {
                verbose: verbose_level,
                ..Default::default()
            };

            config.apply_cli_overrides(&args);

            let default_section = &config.logging.as_ref().unwrap()["default"];
            assert_eq!(default_section.console_level, expected_log_level);
        }
    }

    #[test]
    fn test_layered_config_loading_with_modules_dir() {
        let tmp = tempdir().unwrap();
        let cfg_path = tmp.path().join("modules_dir.yaml");
        let modules_dir = tmp.path().join("modules");

        fs::create_dir_all(&modules_dir).unwrap();
        fs::write(
            modules_dir.join("contacts.yaml"),
            r#"
storage: memory
seed_sample_data: true
"#,
        )
        .unwrap();

        let yaml = format!(
            r#"
server:
  home_dir: "{}"
  host: "127.0.0.1"
  port: 8087

modules_dir: "{}"

modules:
  api_ingress:
    cors_enabled: true
"#,
            tmp.path().join("home").to_string_lossy().replace('\\', "/"),
            modules_dir.to_string_lossy().replace('\\', "/")
        );
        fs::write(&cfg_path, yaml).unwrap();

        let config = AppConfig::load_layered(&cfg_path).unwrap();

        assert!(config.modules.contains_key("api_ingress"));
        let contacts = &config.modules["contacts"];
        assert_eq!(contacts["storage"], "memory");
        assert_eq!(contacts["seed_sample_data"], true);
    }

    #[test]
    fn test_to_yaml_roundtrip_basic() {
        let config = AppConfig::default();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("server:"));
        assert!(yaml.contains("logging:"));

        let roundtrip: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(roundtrip.server.port, config.server.port);
    }

    #[test]
    fn test_invalid_yaml_missing_required_field() {
        let invalid_yaml = r#"
server:
  home_dir: "~/.test"
  # Missing required host field
  port: 8087
"#;

        let result: Result<AppConfig, _> = serde_yaml::from_str(invalid_yaml);
        assert!(result.is_err());
    }
}
