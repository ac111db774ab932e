//! Explicit authentication state.
//!
//! Callers own an [`AuthContext`] and pass it into every operation that
//! needs to know who is signed in; nothing reads a session from ambient
//! storage.

use crate::common::UserId;
use crate::error::{MarketError, Result};

use super::{Session, User};

#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    session: Option<Session>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.current_user().map(|u| u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The signed-in user, or `AuthenticationRequired`.
    pub fn require_user(&self) -> Result<&User> {
        self.current_user()
            .ok_or(MarketError::AuthenticationRequired)
    }

    pub fn sign_in(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Replace the cached user record (e.g. after an email change).
    pub fn refresh_user(&mut self, user: User) {
        if let Some(session) = self.session.as_mut() {
            session.user = user;
        }
    }

    pub fn clear(&mut self) {
        self.session = None;
    }
}
