//! In-memory repository for backlog item handles.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::work_item::{
    domain::{BacklogItem, BacklogItemId, SharedBacklogItem},
    ports::{BacklogItemRepository, BacklogItemRepositoryError, BacklogItemRepositoryResult},
};

/// Thread-safe in-memory backlog item repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBacklogItemRepository {
    state: Arc<RwLock<InMemoryBacklogItemState>>,
}

#[derive(Debug, Default)]
struct InMemoryBacklogItemState {
    items: HashMap<BacklogItemId, SharedBacklogItem>,
    order: Vec<BacklogItemId>,
}

impl InMemoryBacklogItemRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> BacklogItemRepositoryError {
    BacklogItemRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl BacklogItemRepository for InMemoryBacklogItemRepository {
    async fn store(&self, item: BacklogItem) -> BacklogItemRepositoryResult<SharedBacklogItem> {
        let mut state = self.state.write().map_err(lock_error)?;
        let id = item.id();
        if state.items.contains_key(&id) {
            return Err(BacklogItemRepositoryError::DuplicateBacklogItem(id));
        }
        let handle = SharedBacklogItem::new(item);
        state.items.insert(id, handle.clone());
        state.order.push(id);
        Ok(handle)
    }

    async fn find_by_id(
        &self,
        id: BacklogItemId,
    ) -> BacklogItemRepositoryResult<Option<SharedBacklogItem>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.items.get(&id).cloned())
    }

    async fn list_all(&self) -> BacklogItemRepositoryResult<Vec<SharedBacklogItem>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.items.get(id))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: BacklogItemId) -> BacklogItemRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.items.remove(&id).is_none() {
            return Err(BacklogItemRepositoryError::NotFound(id));
        }
        state.order.retain(|existing| *existing != id);
        Ok(())
    }
}
