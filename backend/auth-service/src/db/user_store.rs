/// User account storage
///
/// Accounts are owned by an external collaborator; the service only creates
/// them and looks them up by username. `InMemoryUserStore` is the bundled
/// implementation.
use crate::error::{AuthError, Result};
use crate::models::User;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user, failing with `UnavailableUsername` on a duplicate.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

#[derive(Debug)]
pub struct InMemoryUserStore {
    users: DashMap<String, User>,
    next_id: AtomicI64,
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self {
            users: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        // The entry guard holds the shard lock, so two registrations of the
        // same username cannot both succeed.
        match self.users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(AuthError::UnavailableUsername),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst),
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                    created_at: Utc::now(),
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.get(username).map(|user| user.clone()))
    }
}
