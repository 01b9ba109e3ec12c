//! Attachment storage collaborator
//!
//! Maps a file-like blob to a referenceable URL. The baseline keeps bytes
//! in memory under `mock://` URLs; a production system uploads to durable
//! storage and returns real URLs through the same trait.

use crate::error::{ParlorError, Result};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Stores blobs and hands back referenceable URLs
pub trait AttachmentStore: Send + Sync {
    /// Stores a blob and returns its URL
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be stored.
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String>;

    /// Fetches a previously stored blob by URL
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unknown.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// In-memory attachment store issuing `mock://attachments/...` URLs
#[derive(Debug, Default)]
pub struct LocalAttachmentStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl LocalAttachmentStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored blobs
    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    /// Returns true if nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.blobs.lock().unwrap().is_empty()
    }
}

impl AttachmentStore for LocalAttachmentStore {
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        if filename.trim().is_empty() {
            return Err(ParlorError::Attachment("filename is empty".to_string()).into());
        }
        let url = format!("mock://attachments/{}/{}", Uuid::new_v4(), filename);
        self.blobs.lock().unwrap().insert(url.clone(), bytes.to_vec());
        tracing::debug!("Stored attachment {} ({} bytes)", url, bytes.len());
        Ok(url)
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| ParlorError::Attachment(format!("unknown URL: {}", url)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_fetch_round_trip() {
        let store = LocalAttachmentStore::new();
        let url = store.store("notes.txt", b"hello").unwrap();
        assert!(url.starts_with("mock://attachments/"));
        assert!(url.ends_with("/notes.txt"));
        assert_eq!(store.fetch(&url).unwrap(), b"hello");
    }

    #[test]
    fn test_urls_are_unique_per_blob() {
        let store = LocalAttachmentStore::new();
        let a = store.store("same.txt", b"one").unwrap();
        let b = store.store("same.txt", b"two").unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_empty_filename_rejected() {
        let store = LocalAttachmentStore::new();
        assert!(store.store("  ", b"data").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_fetch_unknown_url_fails() {
        let store = LocalAttachmentStore::new();
        assert!(store.fetch("mock://attachments/none/x.txt").is_err());
    }
}
