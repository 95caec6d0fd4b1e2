use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

use domain::{document::VideoDocument, error::DomainError};
use framepack_application::{
    error::{AppError, AppResult},
    ports::outgoing::document_store::DocumentStorePort,
};

use super::document_dto::DocumentDto;

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDocumentStore;

impl JsonDocumentStore {
    pub fn new() -> Self {
        Self
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or(path.as_os_str()));
    name.push(".tmp");
    path.with_file_name(name)
}

impl DocumentStorePort for JsonDocumentStore {
    #[instrument(skip(self, document), fields(path = %path.display()))]
    fn write(&self, path: &Path, document: &VideoDocument) -> AppResult<u64> {
        let bytes = serde_json::to_vec(&DocumentDto::from(document))?;
        let temp_path = temporary_path(path);

        debug!("Writing {} bytes to {}", bytes.len(), temp_path.display());
        if let Err(e) = fs::write(&temp_path, &bytes).and_then(|()| fs::rename(&temp_path, path)) {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                warn!(
                    "Failed to remove temporary file {}: {}",
                    temp_path.display(),
                    cleanup
                );
            }
            return Err(AppError::IoError(e));
        }

        Ok(bytes.len() as u64)
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    fn read(&self, path: &Path) -> AppResult<VideoDocument> {
        let bytes = fs::read(path)?;
        debug!("Read {} bytes", bytes.len());

        let dto: DocumentDto = serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::CorruptData(format!("{} is not a valid document: {e}", path.display()))
        })?;

        Ok(VideoDocument::try_from(dto)?)
    }
}
