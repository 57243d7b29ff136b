use async_trait::async_trait;
use futures_util::stream;
use hyper::body::Bytes;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;

use super::{ImageStore, ObjectStream, StoreResult, StoredObject};
use crate::http::mime;
use crate::logger;

/// Read size for streaming object bodies
const CHUNK_SIZE: usize = 64 * 1024;

/// Longest file name component common filesystems accept (`NAME_MAX`)
const MAX_COMPONENT_LEN: usize = 255;

/// Longest key accepted, well under `PATH_MAX` once joined to the root
const MAX_KEY_LEN: usize = 1024;

/// Image store backed by a local directory.
///
/// The storage key is the file name relative to `root`. Content type
/// metadata comes from the key's extension; unknown extensions carry none.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to a path under `root`, refusing anything that could escape
    /// it or that no file could be named
    fn resolve(&self, key: &str) -> Option<PathBuf> {
        if key.is_empty() || key.len() > MAX_KEY_LEN || key.contains('\\') {
            return None;
        }
        let relative = Path::new(key);
        let plain = relative.components().all(|c| match c {
            Component::Normal(name) => name.len() <= MAX_COMPONENT_LEN,
            _ => false,
        });
        plain.then(|| self.root.join(relative))
    }
}

#[async_trait]
impl ImageStore for DirectoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<StoredObject>> {
        let Some(path) = self.resolve(key) else {
            logger::log_warning(&format!(
                "Rejected storage key (outside store root or name too long): {}",
                key.chars().take(64).collect::<String>()
            ));
            return Ok(None);
        };

        let file = match File::open(&path).await {
            Ok(f) => f,
            Err(e) if is_absent(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Ok(None);
        }

        let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()))
            .map(ToString::to_string);

        Ok(Some(StoredObject::new(
            file_stream(file),
            metadata.len(),
            content_type,
        )))
    }

    fn name(&self) -> &'static str {
        "directory"
    }
}

/// Errors that mean "no such object" rather than a store failure
fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// Stream a file in fixed-size chunks without reading it whole
fn file_stream(file: File) -> ObjectStream {
    Box::pin(stream::try_unfold(file, read_chunk))
}

async fn read_chunk(mut file: File) -> io::Result<Option<(Bytes, File)>> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let n = file.read(&mut buf).await?;
    if n == 0 {
        return Ok(None);
    }
    buf.truncate(n);
    Ok(Some((Bytes::from(buf), file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;

    fn store_with(files: &[(&str, &[u8])]) -> (tempfile::TempDir, DirectoryStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, data) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, data).unwrap();
        }
        let store = DirectoryStore::new(dir.path());
        (dir, store)
    }

    async fn read_all(obj: StoredObject) -> Vec<u8> {
        let chunks: Vec<Bytes> = obj.body.try_collect().await.unwrap();
        chunks.concat()
    }

    #[tokio::test]
    async fn test_missing_key() {
        let (_dir, store) = store_with(&[]);
        assert!(store.get("muppet.jpg").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_present_key_with_metadata() {
        let (_dir, store) = store_with(&[("photo.png", b"12345678")]);
        let obj = store.get("photo.png").await.unwrap().unwrap();
        assert_eq!(obj.size, 8);
        assert_eq!(obj.content_type.as_deref(), Some("image/png"));
        assert_eq!(read_all(obj).await, b"12345678");
    }

    #[tokio::test]
    async fn test_unknown_extension_has_no_content_type() {
        let (_dir, store) = store_with(&[("blob.bin", b"ab")]);
        let obj = store.get("blob.bin").await.unwrap().unwrap();
        assert_eq!(obj.size, 2);
        assert!(obj.content_type.is_none());
    }

    #[tokio::test]
    async fn test_large_file_streams_in_chunks() {
        let data = vec![7u8; CHUNK_SIZE * 2 + 10];
        let (_dir, store) = store_with(&[("big.gif", data.as_slice())]);
        let obj = store.get("big.gif").await.unwrap().unwrap();
        assert_eq!(obj.size, data.len() as u64);

        let chunks: Vec<Bytes> = obj.body.try_collect().await.unwrap();
        assert!(chunks.len() > 1);
        assert_eq!(chunks.concat(), data);
    }

    #[tokio::test]
    async fn test_nested_key() {
        let (_dir, store) = store_with(&[("cats/tom.jpg", b"tom")]);
        assert!(store.get("cats/tom.jpg").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_directory_is_not_an_object() {
        let (_dir, store) = store_with(&[("cats/tom.jpg", b"tom")]);
        assert!(store.get("cats").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_used_as_directory_is_absent() {
        let (_dir, store) = store_with(&[("muppet.jpg", b"abc")]);
        assert!(store.get("muppet.jpg/x.jpg").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_traversal_rejected() {
        let (dir, store) = store_with(&[("inner/ok.jpg", b"ok")]);
        std::fs::write(dir.path().join("secret.jpg"), b"secret").unwrap();
        let inner = DirectoryStore::new(dir.path().join("inner"));

        assert!(inner.get("../secret.jpg").await.unwrap().is_none());
        assert!(inner.get("/etc/passwd").await.unwrap().is_none());
        assert!(inner.get("..\\secret.jpg").await.unwrap().is_none());
        assert!(inner.get("ok.jpg").await.unwrap().is_some());
        assert!(store.get("secret.jpg").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_overlong_names_are_absent() {
        let (_dir, store) = store_with(&[]);

        let long_name = format!("{}.jpg", "a".repeat(300));
        assert!(store.get(&long_name).await.unwrap().is_none());

        let long_path = format!("{}/x.jpg", ["d"; 600].join("/"));
        assert!(store.get(&long_path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_name_at_component_limit_is_served() {
        let name = format!("{}.png", "b".repeat(MAX_COMPONENT_LEN - 4));
        let (_dir, store) = store_with(&[(name.as_str(), b"png")]);
        assert!(store.get(&name).await.unwrap().is_some());
    }
}
