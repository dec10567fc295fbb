//! Group domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;
use crate::{Error, Result};

/// An account group. Exactly one group is the default at any time; the
/// default group is the fallback target for new holdings and cannot be
/// deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(name: &str, is_default: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            is_default,
            created_at: Utc::now(),
        }
    }
}

/// Input model for creating a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub name: String,
}

impl NewGroup {
    /// Validates the new group data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Group name cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_validation() {
        assert!(NewGroup {
            name: "养老".to_string()
        }
        .validate()
        .is_ok());
        assert!(NewGroup {
            name: "   ".to_string()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_group_ids_are_unique() {
        let a = Group::new("a", false);
        let b = Group::new("a", false);
        assert_ne!(a.id, b.id);
    }
}
