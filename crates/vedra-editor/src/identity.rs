//! Identity of the depositor
//!
//! The session never reads tokens from ambient storage; it asks the
//! [`IdentityProvider`] it was constructed with.

use serde::{Deserialize, Serialize};

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub name: String,
    pub email: String,
    /// Account role, e.g. `"student"` or `"researcher"`
    #[serde(default)]
    pub role: String,
    /// Institution scope the account belongs to
    #[serde(default)]
    pub scope_code: String,
    /// Bearer token for the repository API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
            role: String::new(),
            scope_code: String::new(),
            access_token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>, scope_code: impl Into<String>) -> Self {
        self.role = role.into();
        self.scope_code = scope_code.into();
        self
    }

    /// Value for an `Authorization` header
    pub fn bearer(&self) -> Option<String> {
        self.access_token.as_ref().map(|t| format!("Bearer {}", t))
    }
}

/// Source of the current identity
pub trait IdentityProvider {
    fn current_identity(&self) -> Option<Identity>;
}

/// A fixed identity, or none
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<Identity>);

impl StaticIdentity {
    pub fn new(identity: Identity) -> Self {
        Self(Some(identity))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_identity(&self) -> Option<Identity> {
        self.0.clone()
    }
}
