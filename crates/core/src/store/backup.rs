//! Backup export and import payloads.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::BACKUP_VERSION;
use crate::errors::StoreError;
use crate::groups::Group;
use crate::holdings::Holding;
use crate::{Error, Result};

/// The backup envelope: the two persisted collections plus provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    pub funds: Vec<Holding>,
    pub groups: Vec<Group>,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub version: String,
}

/// Build a backup envelope from the current collections.
pub fn export_backup(holdings: &[Holding], groups: &[Group]) -> BackupData {
    BackupData {
        funds: holdings.to_vec(),
        groups: groups.to_vec(),
        timestamp: Utc::now().timestamp_millis(),
        version: BACKUP_VERSION.to_string(),
    }
}

/// Parse and validate a backup payload.
///
/// Both the `funds` and the `groups` keys must be present and must parse
/// into their typed collections; anything less fails the import as a
/// whole, and the caller must leave persisted state untouched.
pub fn parse_backup(bytes: &[u8]) -> Result<BackupData> {
    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| Error::Store(StoreError::InvalidBackup(format!("malformed JSON: {}", e))))?;

    for key in ["funds", "groups"] {
        if value.get(key).is_none() {
            return Err(Error::Store(StoreError::InvalidBackup(format!(
                "missing '{}' key",
                key
            ))));
        }
    }

    serde_json::from_value(value)
        .map_err(|e| Error::Store(StoreError::InvalidBackup(format!("bad collections: {}", e))))
}
