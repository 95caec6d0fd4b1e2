use std::path::{Path, PathBuf};
use tracing::instrument;

use domain::{document::DocumentStats, frame::FrameLayout, grid::Dimensions};

use crate::{
    error::AppResult,
    ports::{
        incoming::document::InspectDocumentUseCase,
        outgoing::document_store::DynDocumentStorePort,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub path: PathBuf,
    pub dimensions: Dimensions,
    pub palette_size: Option<usize>,
    pub layout: FrameLayout,
    pub stats: DocumentStats,
}

pub struct DocumentService {
    document_store: DynDocumentStorePort,
}

impl DocumentService {
    pub fn new(document_store: DynDocumentStorePort) -> Self {
        Self { document_store }
    }
}

impl InspectDocumentUseCase for DocumentService {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn inspect(&self, path: &Path) -> AppResult<DocumentSummary> {
        let document = self.document_store.read(path)?;

        Ok(DocumentSummary {
            path: path.to_path_buf(),
            dimensions: document.dimensions(),
            palette_size: document.palette().map(|p| p.len()),
            layout: document.layout(),
            stats: document.stats(),
        })
    }
}
