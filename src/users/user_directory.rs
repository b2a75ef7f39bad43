//! Directory of the users to notify.

use std::sync::Arc;

use log::info;
use tokio::sync::Mutex;

use crate::users::User;

/// Source of the users iterated on every refresh cycle.
pub trait UserDirectory {
    /// Lists the users to notify. The order carries no meaning.
    async fn list_users(&self) -> Vec<Arc<User>>;
}

/// In-memory [`UserDirectory`].
///
/// Users are shared through [`Arc`], so subscriptions changed on a listed
/// user are seen by the next cycle.
#[derive(Default)]
pub struct UserRepository {
    users: Mutex<Vec<Arc<User>>>,
}

impl UserRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        UserRepository::default()
    }

    /// Adds `user`, replacing any user registered with the same id.
    pub async fn add_user(&self, user: Arc<User>) {
        let mut users = self.users.lock().await;
        users.retain(|u| u.id != user.id);

        info!("registered user {}", user.id);
        users.push(user);
    }

    /// Removes the user with `user_id`.
    ///
    /// # Returns
    ///
    /// The removed user, if there was one.
    pub async fn remove_user(&self, user_id: &str) -> Option<Arc<User>> {
        let mut users = self.users.lock().await;
        let position = users.iter().position(|u| u.id == user_id)?;

        info!("removed user {}", user_id);
        Some(users.remove(position))
    }

    /// Returns the user with `user_id`.
    #[cfg(test)]
    pub async fn get_user(&self, user_id: &str) -> Option<Arc<User>> {
        self.users
            .lock()
            .await
            .iter()
            .find(|u| u.id == user_id)
            .map(Arc::clone)
    }
}

impl UserDirectory for UserRepository {
    async fn list_users(&self) -> Vec<Arc<User>> {
        self.users.lock().await.clone()
    }
}
