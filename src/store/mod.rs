//! Object store module
//!
//! The router only reads from storage: a single `get` per candidate key,
//! answering with the object or `None` when the key is absent.

mod directory;
mod error;
mod memory;

pub use directory::DirectoryStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;

use async_trait::async_trait;
use futures_util::Stream;
use hyper::body::Bytes;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use crate::config::{StoreBackend, StoreConfig};

/// Byte stream of an object's content
pub type ObjectStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// Snapshot of a stored object returned by a lookup
pub struct StoredObject {
    /// Object content, streamed as-is into the response
    pub body: ObjectStream,
    /// Total size in bytes
    pub size: u64,
    /// Content type recorded for the object, if any
    pub content_type: Option<String>,
}

impl StoredObject {
    pub fn new(body: ObjectStream, size: u64, content_type: Option<String>) -> Self {
        Self {
            body,
            size,
            content_type,
        }
    }
}

impl fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredObject")
            .field("size", &self.size)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Key-value image storage.
///
/// `Ok(None)` means the key is not present. `Err` is reserved for the store
/// itself failing (I/O, transport) and is never retried by callers.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Look up an object by its exact storage key
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>>;

    /// Short backend name for logging
    fn name(&self) -> &'static str;
}

/// Build the store selected by configuration
pub fn from_config(config: &StoreConfig) -> Arc<dyn ImageStore> {
    match config.backend {
        StoreBackend::Directory => Arc::new(DirectoryStore::new(&config.root)),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    }
}
