//! Group service - business operations over the application store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::{AppStore, KeyValueStore};
use crate::Result;

use super::{Group, NewGroup};

/// Trait defining the contract for group operations.
#[async_trait]
pub trait GroupServiceTrait: Send + Sync {
    /// Lists all groups in creation order.
    async fn list_groups(&self) -> Vec<Group>;

    /// Creates a new group; the first group ever becomes the default.
    async fn create_group(&self, new_group: NewGroup) -> Result<Group>;

    /// Renames a group.
    async fn rename_group(&self, group_id: &str, name: &str) -> Result<Group>;

    /// Moves the default flag to the given group.
    async fn set_default_group(&self, group_id: &str) -> Result<()>;

    /// Deletes a group and every holding in it (cascade). Returns the
    /// number of holdings removed.
    async fn delete_group(&self, group_id: &str) -> Result<usize>;
}

/// Group service over the shared application store.
pub struct GroupService<S: KeyValueStore> {
    store: Arc<RwLock<AppStore<S>>>,
}

impl<S: KeyValueStore> GroupService<S> {
    pub fn new(store: Arc<RwLock<AppStore<S>>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> GroupServiceTrait for GroupService<S> {
    async fn list_groups(&self) -> Vec<Group> {
        self.store.read().await.groups().to_vec()
    }

    async fn create_group(&self, new_group: NewGroup) -> Result<Group> {
        self.store.write().await.create_group(new_group)
    }

    async fn rename_group(&self, group_id: &str, name: &str) -> Result<Group> {
        self.store.write().await.rename_group(group_id, name)
    }

    async fn set_default_group(&self, group_id: &str) -> Result<()> {
        self.store.write().await.set_default_group(group_id)
    }

    async fn delete_group(&self, group_id: &str) -> Result<usize> {
        self.store.write().await.delete_group(group_id)
    }
}
