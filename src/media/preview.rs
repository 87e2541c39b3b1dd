/// Session-scoped preview blobs
/// Holds the bytes of every imported image for the lifetime of the process
/// and hands out opaque handles to them. Nothing here is ever persisted.
use std::collections::HashMap;
use std::sync::Arc;

use crate::state::data::PreviewHandle;

/// Media type used when a file arrived without one.
const FALLBACK_MEDIA_TYPE: &str = "image/*";

/// Bytes behind a preview handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewBlob {
    pub media_type: String,
    pub bytes: Arc<[u8]>,
}

/// Owner of all live preview blobs.
#[derive(Debug, Default)]
pub struct PreviewStore {
    next_id: u64,
    blobs: HashMap<PreviewHandle, PreviewBlob>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize a preview from raw bytes and return its handle.
    pub fn create(&mut self, bytes: Vec<u8>, media_type: &str) -> PreviewHandle {
        self.next_id += 1;
        let handle = PreviewHandle::new(self.next_id);

        let media_type = if media_type.trim().is_empty() {
            FALLBACK_MEDIA_TYPE.to_string()
        } else {
            media_type.to_string()
        };

        self.blobs.insert(
            handle,
            PreviewBlob {
                media_type,
                bytes: bytes.into(),
            },
        );
        handle
    }

    pub fn get(&self, handle: PreviewHandle) -> Option<&PreviewBlob> {
        self.blobs.get(&handle)
    }

    /// Drop the bytes behind a handle. Returns false if it was already gone.
    pub fn release(&mut self, handle: PreviewHandle) -> bool {
        self.blobs.remove(&handle).is_some()
    }

    /// Number of live previews.
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}
