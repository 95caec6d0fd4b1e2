use std::path::Path;

use crate::{document::service::DocumentSummary, error::AppResult};

pub trait InspectDocumentUseCase: Send + Sync {
    fn inspect(&self, path: &Path) -> AppResult<DocumentSummary>;
}
