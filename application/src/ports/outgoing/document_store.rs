use std::path::Path;
use std::sync::Arc;

use crate::error::AppResult;
use domain::document::VideoDocument;

pub trait DocumentStorePort: Send + Sync {
    /// Writes the whole document or nothing. Returns the stored size in bytes.
    fn write(&self, path: &Path, document: &VideoDocument) -> AppResult<u64>;

    fn read(&self, path: &Path) -> AppResult<VideoDocument>;
}

pub type DynDocumentStorePort = Arc<dyn DocumentStorePort>;
