use serde::{Deserialize, Serialize};

/// Where the contacts module keeps its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Process memory only.
    Memory,
    /// JSON snapshot file under the server home dir.
    #[default]
    File,
}

/// Configuration for the contacts module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactsConfig {
    #[serde(default)]
    pub storage: StorageKind,
    /// Relative paths resolve against `server.home_dir`.
    #[serde(default = "default_data_file")]
    pub data_file: String,
    #[serde(default)]
    pub seed_sample_data: bool,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::default(),
            data_file: default_data_file(),
            seed_sample_data: false,
        }
    }
}

fn default_data_file() -> String {
    "data/contacts.json".to_string()
}
