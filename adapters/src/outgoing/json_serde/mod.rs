pub mod document_dto;
pub mod document_store_json;
pub mod palette_loader_json;
