//! Session capability handed to the HTTP boundary.
//!
//! The identity provider is external; the core only needs to know who is acting so the audit
//! trail on each loan application can name them.

use serde::{Deserialize, Serialize};

/// The authenticated back-office user performing a workflow action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl CurrentUser {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: None,
        }
    }
}

/// Resolves a bearer credential issued by the identity provider into a user.
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, bearer_token: &str) -> Option<CurrentUser>;
}

/// Extract the token portion of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
