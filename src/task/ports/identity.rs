//! Identity port resolving caller credentials to task owners.

use crate::task::domain::OwnerId;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Result type for identity resolution.
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Opaque bearer credential presented by a caller.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BearerCredential(String);

impl BearerCredential {
    /// Wraps a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Extracts the token from an `Authorization: Bearer <token>` header
    /// value.
    ///
    /// Returns `None` when the scheme is not `Bearer` or the token is blank.
    #[must_use]
    pub fn from_authorization_header(value: &str) -> Option<Self> {
        let (scheme, token) = value.trim().split_once(' ')?;
        let token = token.trim();
        if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
            return None;
        }
        Some(Self(token.to_owned()))
    }

    /// Returns the raw token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerCredential(<redacted>)")
    }
}

/// Authentication collaborator contract.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves a credential to the owner identity it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredential`] when the credential is
    /// unknown, expired or malformed.
    async fn resolve(&self, credential: &BearerCredential) -> IdentityResult<OwnerId>;
}

/// Errors returned while establishing caller identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// No credential accompanied the call.
    #[error("missing caller credential")]
    MissingCredential,

    /// The credential was rejected.
    #[error("invalid caller credential")]
    InvalidCredential,
}
