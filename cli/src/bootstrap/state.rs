use std::sync::Arc;

use framepack_adapters::outgoing::{
    ffmpeg_process::frame_source_ffmpeg::FfmpegConfig,
    json_serde::{
        document_store_json::JsonDocumentStore, palette_loader_json::JsonPaletteLoader,
    },
    source_select::frame_source_select::SelectingFrameSource,
    tokio_spawn::frame_encoder_tokio::TokioFrameEncoderAdapter,
};
use framepack_application::{
    document::service::DocumentService,
    encoding::service::{EncodingService, EncodingServiceDeps},
    infrastructure_config::Config,
    playback::service::PlaybackService,
    ports::{
        incoming::{
            document::InspectDocumentUseCase, encode::EncodeVideoUseCase,
            playback::LoadPlaybackUseCase,
        },
        outgoing::document_store::DynDocumentStorePort,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub encode_service: Arc<dyn EncodeVideoUseCase>,
    pub playback_service: Arc<dyn LoadPlaybackUseCase>,
    pub document_service: Arc<dyn InspectDocumentUseCase>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let document_store: DynDocumentStorePort = Arc::new(JsonDocumentStore::new());

        let encode_service = Arc::new(EncodingService::new(EncodingServiceDeps {
            frame_source: Arc::new(SelectingFrameSource::new(
                config.encode.source,
                FfmpegConfig::default(),
            )),
            palette_loader: Arc::new(JsonPaletteLoader::new()),
            document_store: Arc::clone(&document_store),
            frame_encoder: Arc::new(TokioFrameEncoderAdapter::new()),
        }));

        let playback_service = Arc::new(PlaybackService::new(Arc::clone(&document_store)));
        let document_service = Arc::new(DocumentService::new(document_store));

        Self {
            config,
            encode_service,
            playback_service,
            document_service,
        }
    }
}
