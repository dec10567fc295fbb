//! The application store.
//!
//! Owns the canonical holdings and groups collections behind a single
//! logical writer. Mutations go through the operations defined here and
//! nowhere else; UI layers read derived snapshots. Every mutation
//! replaces the affected collection with a freshly built one and saves
//! it on success, so readers never observe a half-applied change.

use std::sync::Arc;

use log::info;

use crate::constants::{
    DEFAULT_GROUP_NAME, GROUPS_STORE_KEY, HOLDINGS_STORE_KEY, MARKET_CONFIG_STORE_KEY,
};
use crate::errors::ValidationError;
use crate::groups::{Group, NewGroup};
use crate::holdings::Holding;
use crate::settings::MarketConfig;
use crate::{Error, Result};

use super::backup::{export_backup, parse_backup, BackupData};
use super::KeyValueStore;

/// Single-writer owner of the persisted collections.
pub struct AppStore<S: KeyValueStore> {
    store: Arc<S>,
    holdings: Vec<Holding>,
    groups: Vec<Group>,
    market_config: MarketConfig,
}

impl<S: KeyValueStore> AppStore<S> {
    /// Load the persisted state. Missing keys start empty; an empty
    /// group list is bootstrapped with the default group so holdings
    /// always have a valid target.
    pub fn load(store: Arc<S>) -> Result<Self> {
        let holdings = Self::load_collection::<Holding>(&store, HOLDINGS_STORE_KEY)?;
        let groups = Self::load_collection::<Group>(&store, GROUPS_STORE_KEY)?;
        let market_config = match store.load(MARKET_CONFIG_STORE_KEY)? {
            Some(bytes) => serde_json::from_slice(&bytes)?,
            None => MarketConfig::default(),
        };

        let mut app_store = Self {
            store,
            holdings,
            groups,
            market_config,
        };
        if app_store.groups.is_empty() {
            let group = Group::new(DEFAULT_GROUP_NAME, true);
            info!("bootstrapping default group '{}'", group.name);
            app_store.groups = vec![group];
            app_store.persist_groups()?;
        }
        Ok(app_store)
    }

    fn load_collection<T: serde::de::DeserializeOwned>(
        store: &Arc<S>,
        key: &str,
    ) -> Result<Vec<T>> {
        match store.load(key)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    // ==================== snapshots ====================

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn market_config(&self) -> &MarketConfig {
        &self.market_config
    }

    pub fn get_holding(&self, holding_id: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.id == holding_id)
    }

    pub fn get_group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    /// The current default group.
    pub fn default_group(&self) -> Option<&Group> {
        self.groups.iter().find(|g| g.is_default)
    }

    // ==================== holdings mutations ====================

    /// Insert a new holding. Its group must exist.
    pub fn insert_holding(&mut self, holding: Holding) -> Result<()> {
        if self.get_group(&holding.group_id).is_none() {
            return Err(Error::NotFound(format!("group {}", holding.group_id)));
        }
        let mut next = self.holdings.clone();
        next.push(holding);
        self.holdings = next;
        self.persist_holdings()
    }

    /// Replace one holding by id.
    pub fn replace_holding(&mut self, updated: Holding) -> Result<()> {
        if self.get_holding(&updated.id).is_none() {
            return Err(Error::NotFound(format!("holding {}", updated.id)));
        }
        self.holdings = self
            .holdings
            .iter()
            .map(|h| if h.id == updated.id { updated.clone() } else { h.clone() })
            .collect();
        self.persist_holdings()
    }

    /// Replace the whole collection in one step. This is how refresh
    /// results land: partial results are never exposed mid-refresh.
    pub fn replace_all_holdings(&mut self, holdings: Vec<Holding>) -> Result<()> {
        self.holdings = holdings;
        self.persist_holdings()
    }

    /// Remove a holding, returning it.
    pub fn remove_holding(&mut self, holding_id: &str) -> Result<Holding> {
        let removed = self
            .get_holding(holding_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("holding {}", holding_id)))?;
        self.holdings = self
            .holdings
            .iter()
            .filter(|h| h.id != holding_id)
            .cloned()
            .collect();
        self.persist_holdings()?;
        Ok(removed)
    }

    // ==================== group mutations ====================

    /// Create a group. The first group ever created becomes the default.
    pub fn create_group(&mut self, new_group: NewGroup) -> Result<Group> {
        new_group.validate()?;
        let group = Group::new(new_group.name.trim(), self.groups.is_empty());
        let mut next = self.groups.clone();
        next.push(group.clone());
        self.groups = next;
        self.persist_groups()?;
        Ok(group)
    }

    /// Rename a group.
    pub fn rename_group(&mut self, group_id: &str, name: &str) -> Result<Group> {
        if name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Group name cannot be empty".to_string(),
            )));
        }
        let mut renamed = self
            .get_group(group_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("group {}", group_id)))?;
        renamed.name = name.trim().to_string();

        self.groups = self
            .groups
            .iter()
            .map(|g| {
                if g.id == group_id {
                    renamed.clone()
                } else {
                    g.clone()
                }
            })
            .collect();
        self.persist_groups()?;
        Ok(renamed)
    }

    /// Move the default flag to another group.
    pub fn set_default_group(&mut self, group_id: &str) -> Result<()> {
        if self.get_group(group_id).is_none() {
            return Err(Error::NotFound(format!("group {}", group_id)));
        }
        self.groups = self
            .groups
            .iter()
            .map(|g| {
                let mut next = g.clone();
                next.is_default = g.id == group_id;
                next
            })
            .collect();
        self.persist_groups()
    }

    /// Delete a group, cascading to its holdings. The default group is
    /// protected: it is the fallback target and must always exist.
    ///
    /// Returns the number of holdings removed by the cascade.
    pub fn delete_group(&mut self, group_id: &str) -> Result<usize> {
        let group = self
            .get_group(group_id)
            .ok_or_else(|| Error::NotFound(format!("group {}", group_id)))?;
        if group.is_default {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "The default group cannot be deleted".to_string(),
            )));
        }

        let next_groups: Vec<Group> = self
            .groups
            .iter()
            .filter(|g| g.id != group_id)
            .cloned()
            .collect();
        let next_holdings: Vec<Holding> = self
            .holdings
            .iter()
            .filter(|h| h.group_id != group_id)
            .cloned()
            .collect();
        let removed = self.holdings.len() - next_holdings.len();

        // Both collections change together; stage them as one write.
        let entries = [
            (HOLDINGS_STORE_KEY, serde_json::to_vec_pretty(&next_holdings)?),
            (GROUPS_STORE_KEY, serde_json::to_vec_pretty(&next_groups)?),
        ];
        self.store.save_many(&entries)?;

        self.holdings = next_holdings;
        self.groups = next_groups;
        info!("deleted group {} and {} holdings", group_id, removed);
        Ok(removed)
    }

    // ==================== market config ====================

    pub fn set_market_config(&mut self, config: MarketConfig) -> Result<()> {
        self.market_config = config;
        self.store.save(
            MARKET_CONFIG_STORE_KEY,
            &serde_json::to_vec_pretty(&self.market_config)?,
        )
    }

    // ==================== backup ====================

    /// Export both collections as a backup envelope.
    pub fn export_backup(&self) -> BackupData {
        export_backup(&self.holdings, &self.groups)
    }

    /// Import a backup, overwriting both collections atomically: either
    /// both are persisted and visible, or neither changed.
    pub fn import_backup(&mut self, bytes: &[u8]) -> Result<()> {
        let backup = parse_backup(bytes)?;

        let entries = [
            (HOLDINGS_STORE_KEY, serde_json::to_vec_pretty(&backup.funds)?),
            (GROUPS_STORE_KEY, serde_json::to_vec_pretty(&backup.groups)?),
        ];
        self.store.save_many(&entries)?;

        self.holdings = backup.funds;
        self.groups = backup.groups;
        info!(
            "imported backup: {} holdings, {} groups",
            self.holdings.len(),
            self.groups.len()
        );
        Ok(())
    }

    // ==================== persistence ====================

    fn persist_holdings(&self) -> Result<()> {
        self.store.save(
            HOLDINGS_STORE_KEY,
            &serde_json::to_vec_pretty(&self.holdings)?,
        )
    }

    fn persist_groups(&self) -> Result<()> {
        self.store
            .save(GROUPS_STORE_KEY, &serde_json::to_vec_pretty(&self.groups)?)
    }
}
