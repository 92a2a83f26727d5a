//! In-memory token store for tests and ephemeral sessions.

use super::{TokenStore, TokenStoreError};
use crate::models::AuthTokens;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<Option<AuthTokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a credential pair.
    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<AuthTokens>> {
        // A poisoned lock still holds a consistent Option.
        self.tokens.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl TokenStore for MemoryTokenStore {
    fn access_token(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.lock().as_ref().map(|t| t.access_token.clone()))
    }

    fn refresh_token(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.lock().as_ref().map(|t| t.refresh_token.clone()))
    }

    fn save(&self, tokens: &AuthTokens) -> Result<(), TokenStoreError> {
        *self.lock() = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        *self.lock() = None;
        Ok(())
    }
}
