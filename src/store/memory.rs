use async_trait::async_trait;
use futures_util::stream;
use hyper::body::Bytes;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use super::{ImageStore, ObjectStream, StoreError, StoreResult, StoredObject};

#[derive(Debug, Clone)]
struct MemoryObject {
    data: Bytes,
    content_type: Option<String>,
}

/// In-memory, HashMap-based image store.
///
/// Intended for tests and for embedding the router as a library, where the
/// host fills it through `insert`. Objects are held behind a `RwLock`;
/// `Bytes` makes reads a reference-count bump rather than a copy.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, MemoryObject>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object under `key`, replacing any previous value.
    pub fn insert(&self, key: impl Into<String>, data: impl Into<Bytes>, content_type: Option<&str>) {
        let object = MemoryObject {
            data: data.into(),
            content_type: content_type.map(ToString::to_string),
        };
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), object);
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>> {
        let object = {
            let map = self
                .objects
                .read()
                .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))?;
            map.get(key).cloned()
        };

        Ok(object.map(|obj| {
            let size = obj.data.len() as u64;
            let body: ObjectStream = Box::pin(stream::iter([Ok::<_, std::io::Error>(obj.data)]));
            StoredObject::new(body, size, obj.content_type)
        }))
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
