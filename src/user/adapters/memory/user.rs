//! In-memory repository for users.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::user::{
    domain::{Role, User, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<InMemoryUserState>>,
}

#[derive(Debug, Default)]
struct InMemoryUserState {
    users: HashMap<UserId, User>,
    order: Vec<UserId>,
}

impl InMemoryUserRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> UserRepositoryError {
    UserRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

fn email_key(user: &User) -> Option<String> {
    user.contacts().email().map(str::to_ascii_lowercase)
}

fn email_taken(state: &InMemoryUserState, user: &User) -> Option<String> {
    let key = email_key(user)?;
    state
        .users
        .values()
        .any(|other| other.id() != user.id() && email_key(other).as_deref() == Some(key.as_str()))
        .then_some(key)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.users.contains_key(&user.id()) {
            return Err(UserRepositoryError::DuplicateUser(user.id()));
        }
        if let Some(email) = email_taken(&state, user) {
            return Err(UserRepositoryError::DuplicateEmail(email));
        }
        state.order.push(user.id());
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.users.contains_key(&user.id()) {
            return Err(UserRepositoryError::NotFound(user.id()));
        }
        if let Some(email) = email_taken(&state, user) {
            return Err(UserRepositoryError::DuplicateEmail(email));
        }
        state.users.insert(user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserRepositoryResult<Option<User>> {
        let state = self.state.read().map_err(lock_error)?;
        let key = email.trim().to_ascii_lowercase();
        Ok(state
            .users
            .values()
            .find(|user| email_key(user).as_deref() == Some(key.as_str()))
            .cloned())
    }

    async fn list_by_role(&self, role: Role) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.users.get(id))
            .filter(|user| user.role() == role)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> UserRepositoryResult<Vec<User>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .order
            .iter()
            .filter_map(|id| state.users.get(id))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.users.remove(&id).is_none() {
            return Err(UserRepositoryError::NotFound(id));
        }
        state.order.retain(|existing| *existing != id);
        Ok(())
    }
}
