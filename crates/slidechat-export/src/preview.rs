//! Transient in-memory export artifacts.
//!
//! A preview is addressed by an opaque `blob:slidechat/<uuid>` URL and
//! lives until the caller releases it or the process exits.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;
use uuid::Uuid;

use crate::format::ExportFormat;

pub const PREVIEW_URL_PREFIX: &str = "blob:slidechat/";

#[derive(Debug, Clone)]
pub struct PreviewBlob {
    pub format: ExportFormat,
    pub bytes: Arc<Vec<u8>>,
}

#[derive(Debug, Default)]
pub struct PreviewRegistry {
    blobs: Mutex<HashMap<Uuid, PreviewBlob>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, PreviewBlob>> {
        self.blobs.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Store `bytes` and return the URL that addresses them.
    pub fn register(&self, format: ExportFormat, bytes: Vec<u8>) -> String {
        let id = Uuid::new_v4();
        debug!(preview_id = %id, bytes = bytes.len(), "preview registered");
        self.lock().insert(
            id,
            PreviewBlob {
                format,
                bytes: Arc::new(bytes),
            },
        );
        preview_url(id)
    }

    pub fn get(&self, id: Uuid) -> Option<PreviewBlob> {
        self.lock().get(&id).cloned()
    }

    pub fn get_by_url(&self, url: &str) -> Option<PreviewBlob> {
        self.get(parse_preview_url(url)?)
    }

    /// Free a preview. Returns whether it existed.
    pub fn release(&self, url: &str) -> bool {
        let Some(id) = parse_preview_url(url) else {
            return false;
        };
        self.release_id(id)
    }

    pub fn release_id(&self, id: Uuid) -> bool {
        let released = self.lock().remove(&id).is_some();
        if released {
            debug!(preview_id = %id, "preview released");
        }
        released
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn preview_url(id: Uuid) -> String {
    format!("{PREVIEW_URL_PREFIX}{id}")
}

pub fn parse_preview_url(url: &str) -> Option<Uuid> {
    url.strip_prefix(PREVIEW_URL_PREFIX)?.parse().ok()
}
