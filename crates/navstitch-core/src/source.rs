//! The seam between the runtime and whatever produces blobs.
//!
//! Reading and decoding blob files is the loader's business; the stitch
//! manager only ever sees an already-decoded [`NavMeshBlob`] behind an
//! `Arc`, obtained through a [`BlobSource`].

use std::sync::Arc;

use indexmap::IndexMap;

use crate::blob::NavMeshBlob;
use crate::error::LoadError;

/// Something that can hand out decoded blobs by key.
pub trait BlobSource {
    /// Fetch the blob stored under `key`.
    ///
    /// Implementations report a missing key as [`LoadError::NotFound`].
    /// Validation is left to the caller.
    fn load_blob(&self, key: &str) -> Result<Arc<NavMeshBlob>, LoadError>;
}

/// An in-memory [`BlobSource`], used by tests and the streaming demo.
#[derive(Clone, Debug, Default)]
pub struct MemoryBlobSource {
    blobs: IndexMap<String, Arc<NavMeshBlob>>,
}

impl MemoryBlobSource {
    /// An empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `blob` under `key`, returning whatever was there before.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        blob: impl Into<Arc<NavMeshBlob>>,
    ) -> Option<Arc<NavMeshBlob>> {
        self.blobs.insert(key.into(), blob.into())
    }

    /// Remove the blob under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Arc<NavMeshBlob>> {
        self.blobs.shift_remove(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.blobs.keys().map(String::as_str)
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Whether the source is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl BlobSource for MemoryBlobSource {
    fn load_blob(&self, key: &str) -> Result<Arc<NavMeshBlob>, LoadError> {
        self.blobs
            .get(key)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                key: key.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::EntityParameters;
    use crate::id::MeshGuid;

    fn blob(guid: u64) -> NavMeshBlob {
        NavMeshBlob {
            guid: MeshGuid(guid),
            cell_size: 1.0,
            entity: EntityParameters::default(),
            cells: Vec::new(),
        }
    }

    #[test]
    fn load_returns_shared_blob() {
        let mut source = MemoryBlobSource::new();
        source.insert("a", blob(1));
        let first = source.load_blob("a").unwrap();
        let second = source.load_blob("a").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn missing_key_is_not_found() {
        let source = MemoryBlobSource::new();
        assert_eq!(
            source.load_blob("nope"),
            Err(LoadError::NotFound {
                key: "nope".to_string()
            })
        );
    }

    #[test]
    fn keys_keep_insertion_order() {
        let mut source = MemoryBlobSource::new();
        source.insert("b", blob(2));
        source.insert("a", blob(1));
        assert_eq!(source.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        source.remove("b");
        assert_eq!(source.len(), 1);
    }
}
