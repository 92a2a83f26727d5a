// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated session context.
//!
//! Owns the token store and broadcasts whether the user is signed in.
//! Construct one per app run and hand clones to whatever needs it.

use crate::db::TokenStore;
use crate::error::ApiError;
use crate::models::AuthTokens;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Authenticated,
    Unauthenticated,
}

#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    state: Arc<watch::Sender<AuthState>>,
}

impl Session {
    /// Create a session. It starts authenticated iff an access token is stored.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let initial = match store.access_token() {
            Ok(Some(_)) => AuthState::Authenticated,
            Ok(None) => AuthState::Unauthenticated,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored tokens, starting signed out");
                AuthState::Unauthenticated
            }
        };

        Self {
            store,
            state: Arc::new(watch::Sender::new(initial)),
        }
    }

    pub fn auth_state(&self) -> AuthState {
        *self.state.borrow()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_state() == AuthState::Authenticated
    }

    /// Watch for sign-in/sign-out transitions.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn access_token(&self) -> Result<Option<String>, ApiError> {
        self.store
            .access_token()
            .map_err(|e| ApiError::Storage(e.to_string()))
    }

    pub fn refresh_token(&self) -> Result<Option<String>, ApiError> {
        self.store
            .refresh_token()
            .map_err(|e| ApiError::Storage(e.to_string()))
    }

    /// Store a fresh credential pair and mark the session signed in.
    pub fn login(&self, tokens: &AuthTokens) -> Result<(), ApiError> {
        self.store
            .save(tokens)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        self.state.send_replace(AuthState::Authenticated);
        Ok(())
    }

    /// Erase credentials and mark the session signed out.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "Failed to clear stored tokens");
        }
        self.state.send_replace(AuthState::Unauthenticated);
        tracing::info!("Session logged out");
    }
}
