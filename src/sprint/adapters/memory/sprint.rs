//! In-memory repository for sprint handles.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::domain::ProjectId;
use crate::sprint::{
    domain::{SharedSprint, Sprint, SprintId},
    ports::{SprintRepository, SprintRepositoryError, SprintRepositoryResult},
};

/// Thread-safe in-memory sprint repository.
#[derive(Debug, Clone, Default)]
pub struct InMemorySprintRepository {
    state: Arc<RwLock<InMemorySprintState>>,
}

#[derive(Debug, Default)]
struct InMemorySprintState {
    sprints: HashMap<SprintId, StoredSprint>,
    order: Vec<SprintId>,
}

#[derive(Debug)]
struct StoredSprint {
    project_id: ProjectId,
    handle: SharedSprint,
}

impl InMemorySprintRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> SprintRepositoryError {
    SprintRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl SprintRepository for InMemorySprintRepository {
    async fn store(&self, sprint: Sprint) -> SprintRepositoryResult<SharedSprint> {
        let mut state = self.state.write().map_err(lock_error)?;
        let id = sprint.id();
        if state.sprints.contains_key(&id) {
            return Err(SprintRepositoryError::DuplicateSprint(id));
        }
        let project_id = sprint.project_id();
        let handle = SharedSprint::new(sprint);
        state.sprints.insert(
            id,
            StoredSprint {
                project_id,
                handle: handle.clone(),
            },
        );
        state.order.push(id);
        Ok(handle)
    }

    async fn find_by_id(&self, id: SprintId) -> SprintRepositoryResult<Option<SharedSprint>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.sprints.get(&id).map(|stored| stored.handle.clone()))
    }

    async fn list_all(&self) -> SprintRepositoryResult<Vec<SharedSprint>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.sprints.get(id))
            .map(|stored| stored.handle.clone())
            .collect())
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
    ) -> SprintRepositoryResult<Vec<SharedSprint>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.sprints.get(id))
            .filter(|stored| stored.project_id == project_id)
            .map(|stored| stored.handle.clone())
            .collect())
    }

    async fn delete(&self, id: SprintId) -> SprintRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.sprints.remove(&id).is_none() {
            return Err(SprintRepositoryError::NotFound(id));
        }
        state.order.retain(|existing| *existing != id);
        Ok(())
    }
}
