//! Document blob store
//!
//! Opaque storage for uploaded identity/medical documents. Files are
//! content-addressed by SHA-256 under `WORK_DIR/documents`; the returned
//! reference token is the hex digest. Nothing in the core ever reads the
//! bytes back; reviewers fetch them out-of-band.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::utils::{AppError, AppResult};

/// Maximum accepted document size (10MB)
pub const MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    pub fn new(work_dir: impl AsRef<Path>) -> Self {
        Self {
            root: work_dir.as_ref().join("documents"),
        }
    }

    /// Persist a document, returning its opaque reference token.
    ///
    /// Identical content yields the same token; the second write is a
    /// no-op, so retried uploads are harmless.
    pub async fn store(&self, data: &[u8]) -> AppResult<String> {
        if data.is_empty() {
            return Err(AppError::validation("document is empty"));
        }
        if data.len() > MAX_DOCUMENT_SIZE {
            return Err(AppError::validation(format!(
                "document exceeds maximum size ({MAX_DOCUMENT_SIZE} bytes)"
            )));
        }

        let mut hasher = Sha256::new();
        hasher.update(data);
        let token = hex::encode(hasher.finalize());

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::internal(format!("Failed to create document dir: {e}")))?;

        let path = self.root.join(&token);
        if !path.exists() {
            tokio::fs::write(&path, data)
                .await
                .map_err(|e| AppError::internal(format!("Failed to store document: {e}")))?;
        }

        tracing::debug!(token = %token, size = data.len(), "Document stored");
        Ok(token)
    }

    /// Check that a previously issued token still resolves.
    pub fn exists(&self, token: &str) -> bool {
        // Tokens are hex digests; anything else can't be ours (and could
        // be a traversal attempt).
        token.len() == 64
            && token.chars().all(|c| c.is_ascii_hexdigit())
            && self.root.join(token).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_is_content_addressed() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());

        let a = store.store(b"id card front").await.unwrap();
        let b = store.store(b"id card front").await.unwrap();
        let c = store.store(b"id card back").await.unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(store.exists(&a));
        assert!(store.exists(&c));
    }

    #[tokio::test]
    async fn empty_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        assert!(store.store(b"").await.is_err());
    }

    #[test]
    fn traversal_tokens_never_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::new(dir.path());
        assert!(!store.exists("../../../etc/passwd"));
        assert!(!store.exists(""));
    }
}
