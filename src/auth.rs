//! Admin authentication collaborator
//!
//! The dashboard needs a signed-in admin before it shows anything. The
//! provider is a trait so the hosted identity service can be swapped for a
//! static credential table in tests and the CLI.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// An authenticated dashboard user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub uid: String,
    pub email: String,
    pub is_admin: bool,
}

/// Session-scoped authentication
pub trait AuthProvider {
    /// Exchange credentials for a user, or an auth error
    fn sign_in(&mut self, email: &str, password: &str) -> Result<AdminUser, EngineError>;

    fn sign_out(&mut self);

    /// The currently signed-in user, if any
    fn current_user(&self) -> Option<&AdminUser>;
}

/// Provider backed by a fixed credential table, for tests and local tooling
#[derive(Debug, Default)]
pub struct StaticAuthProvider {
    accounts: Vec<(String, String, AdminUser)>,
    current: Option<AdminUser>,
}

impl StaticAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, email: &str, password: &str, is_admin: bool) -> Self {
        let user = AdminUser {
            uid: format!("uid-{}", self.accounts.len() + 1),
            email: email.to_string(),
            is_admin,
        };
        self.accounts
            .push((email.to_string(), password.to_string(), user));
        self
    }
}

impl AuthProvider for StaticAuthProvider {
    fn sign_in(&mut self, email: &str, password: &str) -> Result<AdminUser, EngineError> {
        let user = self
            .accounts
            .iter()
            .find(|(e, p, _)| e == email && p == password)
            .map(|(_, _, user)| user.clone())
            .ok_or_else(|| EngineError::Auth("invalid email or password".to_string()))?;
        self.current = Some(user.clone());
        Ok(user)
    }

    fn sign_out(&mut self) {
        self.current = None;
    }

    fn current_user(&self) -> Option<&AdminUser> {
        self.current.as_ref()
    }
}

/// Gate for dashboard access: a signed-in user with the admin claim
pub fn require_admin(provider: &dyn AuthProvider) -> Result<&AdminUser, EngineError> {
    let user = provider
        .current_user()
        .ok_or_else(|| EngineError::Auth("not signed in".to_string()))?;
    if !user.is_admin {
        return Err(EngineError::Auth(format!(
            "{} is not an admin",
            user.email
        )));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn provider() -> StaticAuthProvider {
        StaticAuthProvider::new()
            .with_account("admin@example.com", "hunter2", true)
            .with_account("viewer@example.com", "hunter2", false)
    }

    #[test]
    fn sign_in_with_good_credentials() {
        let mut auth = provider();
        let user = auth.sign_in("admin@example.com", "hunter2").unwrap();
        assert!(user.is_admin);
        assert_eq!(auth.current_user().map(|u| u.email.as_str()), Some("admin@example.com"));
    }

    #[test]
    fn bad_password_keeps_the_session_signed_out() {
        let mut auth = provider();
        assert!(auth.sign_in("admin@example.com", "wrong").is_err());
        assert!(auth.current_user().is_none());
    }

    #[test]
    fn require_admin_rejects_anonymous_and_non_admin() {
        let mut auth = provider();
        assert!(require_admin(&auth).is_err());

        auth.sign_in("viewer@example.com", "hunter2").unwrap();
        let err = require_admin(&auth).unwrap_err();
        assert!(matches!(err, EngineError::Auth(_)));

        auth.sign_in("admin@example.com", "hunter2").unwrap();
        assert!(require_admin(&auth).is_ok());
    }

    #[test]
    fn sign_out_clears_the_session() {
        let mut auth = provider();
        auth.sign_in("admin@example.com", "hunter2").unwrap();
        auth.sign_out();
        assert!(auth.current_user().is_none());
        assert!(require_admin(&auth).is_err());
    }
}
