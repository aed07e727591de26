use tokio::sync::RwLock;
use tracing::info;

use crate::model::Member;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub member: Member,
    pub is_admin: bool,
}

/// Application-wide state: who is signed in.
///
/// Shared by reference; read and written only through these methods.
#[derive(Debug, Default)]
pub struct AppState {
    user: RwLock<Option<CurrentUser>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sign_in(&self, user: CurrentUser) {
        info!("signed in: {}", user.member.id);
        *self.user.write().await = Some(user);
    }

    pub async fn sign_out(&self) -> Option<CurrentUser> {
        self.user.write().await.take()
    }

    pub async fn current_user(&self) -> Option<CurrentUser> {
        self.user.read().await.clone()
    }

    pub async fn is_admin(&self) -> bool {
        self.user.read().await.as_ref().is_some_and(|u| u.is_admin)
    }
}
