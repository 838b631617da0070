//! Fixed token table standing in for an external identity provider.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::task::{
    domain::OwnerId,
    ports::{BearerCredential, IdentityError, IdentityProvider, IdentityResult},
};

/// Identity provider backed by a static token-to-owner map.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    tokens: HashMap<String, OwnerId>,
}

impl StaticIdentityProvider {
    /// Creates a provider that accepts no tokens.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` as a credential for `owner`.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, owner: OwnerId) -> Self {
        self.tokens.insert(token.into(), owner);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve(&self, credential: &BearerCredential) -> IdentityResult<OwnerId> {
        self.tokens
            .get(credential.token())
            .cloned()
            .ok_or(IdentityError::InvalidCredential)
    }
}
