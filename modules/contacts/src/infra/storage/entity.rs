//! On-disk record layout of the file store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One persisted contact. Optional text defaults to `""` so older files
/// without those keys still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    pub id: String,
    #[serde(default)]
    pub first: String,
    #[serde(default)]
    pub last: String,
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
}
