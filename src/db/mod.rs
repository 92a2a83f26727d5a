//! Credential storage layer.
//!
//! Exactly one credential pair is live at a time. Stores overwrite both
//! values on save and remove both on clear.

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use crate::models::AuthTokens;

/// Fixed keys the two token values are stored under.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
}

/// Secure storage boundary for the credential pair.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Result<Option<String>, TokenStoreError>;

    fn refresh_token(&self) -> Result<Option<String>, TokenStoreError>;

    /// Replace the stored pair wholesale.
    fn save(&self, tokens: &AuthTokens) -> Result<(), TokenStoreError>;

    /// Erase both tokens. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Errors from token storage.
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("Token file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token file is corrupt: {0}")]
    Corrupt(String),
}
