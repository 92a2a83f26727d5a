// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed token store.
//!
//! Both tokens live in one JSON object under the fixed keys in
//! [`super::keys`]. Writes go to a sibling temp file and are renamed into
//! place so a crash never leaves half a pair on disk.

use super::{keys, TokenStore, TokenStoreError};
use crate::models::AuthTokens;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Token store persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeMap<String, String>, TokenStoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&data).map_err(|e| TokenStoreError::Corrupt(e.to_string()))
    }

    fn value(&self, key: &str) -> Result<Option<String>, TokenStoreError> {
        Ok(self.read()?.remove(key))
    }
}

impl TokenStore for FileTokenStore {
    fn access_token(&self) -> Result<Option<String>, TokenStoreError> {
        self.value(keys::ACCESS_TOKEN)
    }

    fn refresh_token(&self) -> Result<Option<String>, TokenStoreError> {
        self.value(keys::REFRESH_TOKEN)
    }

    fn save(&self, tokens: &AuthTokens) -> Result<(), TokenStoreError> {
        let mut values = BTreeMap::new();
        values.insert(keys::ACCESS_TOKEN, tokens.access_token.as_str());
        values.insert(keys::REFRESH_TOKEN, tokens.refresh_token.as_str());
        let json = serde_json::to_vec_pretty(&values)
            .map_err(|e| TokenStoreError::Corrupt(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), "Tokens saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Tokens cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
