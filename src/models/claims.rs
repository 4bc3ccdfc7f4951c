//! JWT Claims model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Purpose a token was issued for. A token is only accepted where its scope matches.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    AccessToken,
    RefreshToken,
    EmailToken,
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenScope::AccessToken => write!(f, "access_token"),
            TokenScope::RefreshToken => write!(f, "refresh_token"),
            TokenScope::EmailToken => write!(f, "email_token"),
        }
    }
}

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user email
    pub scope: TokenScope,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
    pub jti: String, // unique token id
}

impl Claims {
    /// Check if the claims were issued for the given scope
    pub fn has_scope(&self, scope: TokenScope) -> bool {
        self.scope == scope
    }
}
