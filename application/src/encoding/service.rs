use futures::stream::{FuturesOrdered, StreamExt};
use std::path::Path;
use tracing::{info, instrument};

use domain::{document::DocumentBuilder, palette::Palette};

use crate::{
    config::EncodeSettings,
    error::{AppError, AppResult},
    ports::{
        incoming::encode::{EncodeReport, EncodeRequest, EncodeVideoUseCase},
        outgoing::{
            document_store::DynDocumentStorePort,
            frame_encoding::{BlockingTaskError, DynFrameEncodingPort, FrameJob},
            frame_source::{DynFrameSourcePort, FrameStream, SourceInfo},
            palette_loader::DynPaletteLoaderPort,
        },
    },
};

use super::{
    pipeline::{format_size, output_path_for},
    progress::ProgressReporter,
};

pub struct EncodingServiceDeps {
    pub frame_source: DynFrameSourcePort,
    pub palette_loader: DynPaletteLoaderPort,
    pub document_store: DynDocumentStorePort,
    pub frame_encoder: DynFrameEncodingPort,
}

pub struct EncodingService {
    frame_source: DynFrameSourcePort,
    palette_loader: DynPaletteLoaderPort,
    document_store: DynDocumentStorePort,
    frame_encoder: DynFrameEncodingPort,
}

impl EncodingService {
    pub fn new(deps: EncodingServiceDeps) -> Self {
        Self {
            frame_source: deps.frame_source,
            palette_loader: deps.palette_loader,
            document_store: deps.document_store,
            frame_encoder: deps.frame_encoder,
        }
    }

    fn load_palette(&self, settings: &EncodeSettings) -> AppResult<Option<Palette>> {
        let Some(path) = &settings.palette_path else {
            return Ok(None);
        };

        info!("Loading palette from: {}", path.display());
        let palette = self.palette_loader.load(path)?;
        info!("Loaded {} colors from palette", palette.len());
        Ok(Some(palette))
    }

    fn open_source(&self, video_path: &Path) -> AppResult<Box<dyn FrameStream>> {
        if !video_path.exists() {
            return Err(AppError::SourceUnavailable {
                message: format!("Video file not found: {}", video_path.display()),
            });
        }
        self.frame_source.open(video_path)
    }

    async fn encode_frames(
        &self,
        stream: &mut dyn FrameStream,
        settings: &EncodeSettings,
        builder: &mut DocumentBuilder,
        palette: Option<&Palette>,
    ) -> AppResult<u64> {
        let selector = settings.selector;
        let mut pending = FuturesOrdered::new();
        let mut progress = ProgressReporter::new(stream.info().frame_count);
        let mut source_index = 0u64;
        let mut submitted = 0usize;

        while !selector.limit_reached(submitted) {
            if selector.includes(source_index) {
                let Some(grid) = stream.next_frame()? else {
                    break;
                };

                pending.push_back(self.frame_encoder.encode(FrameJob {
                    source_index,
                    grid,
                    target: settings.target,
                    palette: palette.cloned(),
                }));
                submitted += 1;

                while pending.len() >= settings.workers {
                    let Some(frame) = pending.next().await else {
                        break;
                    };
                    builder.push(frame.map_err(task_error)?)?;
                }
                progress.frame_done(source_index, builder.len());
            } else if !stream.skip_frame()? {
                break;
            }
            source_index += 1;
        }

        while let Some(frame) = pending.next().await {
            builder.push(frame.map_err(task_error)?)?;
        }

        Ok(source_index)
    }
}

fn task_error(error: BlockingTaskError) -> AppError {
    AppError::TaskError {
        message: error.message,
    }
}

fn log_source_info(info: &SourceInfo, settings: &EncodeSettings, palette: Option<&Palette>) {
    info!("Video properties:");
    info!("  Resolution: {}", info.resolution);
    match info.fps {
        Some(fps) => info!("  FPS: {:.3}", fps),
        None => info!("  FPS: unknown"),
    }
    match info.frame_count {
        Some(count) => info!("  Total frames: {}", count),
        None => info!("  Total frames: unknown"),
    }
    info!("  Target resolution: {}", settings.target);
    info!("  Frame skip: {}", settings.selector.frameskip());
    if let Some(max) = settings.selector.max_frames() {
        info!("  Total frames to save: {}", max);
    }
    if let Some(palette) = palette {
        info!("  Using palette with {} colors", palette.len());
    }
    info!("  Workers: {}", settings.workers);
}

#[async_trait::async_trait]
impl EncodeVideoUseCase for EncodingService {
    #[instrument(skip(self, request), fields(video = %request.video_path.display()))]
    async fn encode_video(&self, request: EncodeRequest) -> AppResult<EncodeReport> {
        let settings = &request.settings;
        let output_path = output_path_for(&request.video_path)?;
        let palette = self.load_palette(settings)?;

        let mut stream = self.open_source(&request.video_path)?;
        log_source_info(stream.info(), settings, palette.as_ref());

        let mut builder = DocumentBuilder::new(settings.target, palette.clone());
        let frames_read = self
            .encode_frames(stream.as_mut(), settings, &mut builder, palette.as_ref())
            .await?;

        if builder.is_empty() {
            return Err(AppError::SourceUnavailable {
                message: format!("{} yielded no frames", request.video_path.display()),
            });
        }

        let frames_saved = builder.len();
        info!("Processed {} frames", frames_saved);

        let document = builder.finish();
        info!("Writing output to: {}", output_path.display());
        let bytes_written = self.document_store.write(&output_path, &document)?;
        info!("Output file size: {}", format_size(bytes_written));

        Ok(EncodeReport {
            output_path,
            frames_read,
            frames_saved,
            palette_size: palette.as_ref().map(Palette::len),
            bytes_written,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::future;
    use std::io::ErrorKind;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::{Builder, NamedTempFile};
    use tokio::time::sleep;

    use domain::color::{Color, ColorIndex};
    use domain::document::VideoDocument;
    use domain::frame::{DocumentFrames, EncodedFrame};
    use domain::grid::{Dimensions, PixelGrid};
    use domain::rle::Run;
    use domain::selection::FrameSelector;

    use crate::encoding::pipeline::encode_frame;
    use crate::ports::outgoing::{
        document_store::DocumentStorePort,
        frame_encoding::{EncodedFrameFuture, FrameEncodingPort},
        frame_source::FrameSourcePort,
        palette_loader::PaletteLoaderPort,
    };

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions::new(width, height).unwrap()
    }

    fn gray_frames(count: u8) -> Vec<PixelGrid> {
        (0..count)
            .map(|i| PixelGrid::uniform(dims(4, 4), Color::from_rgb8(i, i, i)))
            .collect()
    }

    struct VecFrameSource {
        frames: Vec<PixelGrid>,
        decoded: Arc<Mutex<Vec<u64>>>,
    }

    struct VecFrameStream {
        info: SourceInfo,
        frames: VecDeque<PixelGrid>,
        position: u64,
        decoded: Arc<Mutex<Vec<u64>>>,
    }

    impl FrameStream for VecFrameStream {
        fn info(&self) -> &SourceInfo {
            &self.info
        }

        fn next_frame(&mut self) -> AppResult<Option<PixelGrid>> {
            let frame = self.frames.pop_front();
            if frame.is_some() {
                self.decoded.lock().unwrap().push(self.position);
                self.position += 1;
            }
            Ok(frame)
        }

        fn skip_frame(&mut self) -> AppResult<bool> {
            self.position += 1;
            Ok(self.frames.pop_front().is_some())
        }
    }

    impl FrameSourcePort for VecFrameSource {
        fn open(&self, _path: &Path) -> AppResult<Box<dyn FrameStream>> {
            Ok(Box::new(VecFrameStream {
                info: SourceInfo {
                    resolution: dims(4, 4),
                    fps: Some(24.0),
                    frame_count: Some(self.frames.len() as u64),
                },
                frames: self.frames.clone().into(),
                position: 0,
                decoded: Arc::clone(&self.decoded),
            }))
        }
    }

    #[derive(Default)]
    struct MemoryDocumentStore {
        documents: Mutex<HashMap<PathBuf, VideoDocument>>,
    }

    impl DocumentStorePort for MemoryDocumentStore {
        fn write(&self, path: &Path, document: &VideoDocument) -> AppResult<u64> {
            self.documents
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), document.clone());
            Ok(document.stats().total_runs as u64)
        }

        fn read(&self, path: &Path) -> AppResult<VideoDocument> {
            self.documents
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .ok_or_else(|| AppError::IoError(ErrorKind::NotFound.into()))
        }
    }

    struct InlineFrameEncoder;

    impl FrameEncodingPort for InlineFrameEncoder {
        fn encode(&self, job: FrameJob) -> EncodedFrameFuture {
            let frame = encode_frame(&job.grid, job.target, job.palette.as_ref());
            Box::pin(future::ready(Ok(frame)))
        }
    }

    #[derive(Default)]
    struct DelayedFrameEncoder {
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl FrameEncodingPort for DelayedFrameEncoder {
        fn encode(&self, job: FrameJob) -> EncodedFrameFuture {
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(running, Ordering::SeqCst);

            // Earlier frames finish last.
            let delay = Duration::from_millis(100 - job.source_index * 10);
            let in_flight = Arc::clone(&self.in_flight);
            Box::pin(async move {
                sleep(delay).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(encode_frame(&job.grid, job.target, job.palette.as_ref()))
            })
        }
    }

    struct FixedPaletteLoader(Option<Palette>);

    impl PaletteLoaderPort for FixedPaletteLoader {
        fn load(&self, path: &Path) -> AppResult<Palette> {
            self.0.clone().ok_or_else(|| AppError::ConfigError {
                message: format!("Palette file not found: {}", path.display()),
            })
        }
    }

    struct Harness {
        service: EncodingService,
        store: Arc<MemoryDocumentStore>,
        decoded: Arc<Mutex<Vec<u64>>>,
        video: NamedTempFile,
    }

    fn harness(frames: Vec<PixelGrid>, palette: Option<Palette>) -> Harness {
        harness_with(frames, palette, Arc::new(InlineFrameEncoder))
    }

    fn harness_with(
        frames: Vec<PixelGrid>,
        palette: Option<Palette>,
        frame_encoder: DynFrameEncodingPort,
    ) -> Harness {
        let store = Arc::new(MemoryDocumentStore::default());
        let decoded = Arc::new(Mutex::new(Vec::new()));
        let service = EncodingService::new(EncodingServiceDeps {
            frame_source: Arc::new(VecFrameSource {
                frames,
                decoded: Arc::clone(&decoded),
            }),
            palette_loader: Arc::new(FixedPaletteLoader(palette)),
            document_store: Arc::clone(&store) as DynDocumentStorePort,
            frame_encoder,
        });
        Harness {
            service,
            store,
            decoded,
            video: Builder::new().suffix(".mp4").tempfile().unwrap(),
        }
    }

    fn request(video: &Path, frameskip: u32, max_frames: usize, palette: bool) -> EncodeRequest {
        EncodeRequest {
            video_path: video.to_path_buf(),
            settings: EncodeSettings {
                target: dims(2, 2),
                selector: FrameSelector::new(frameskip).with_max_frames(max_frames),
                palette_path: palette.then(|| PathBuf::from("palette.json")),
                workers: 3,
            },
        }
    }

    fn stored_frames(harness: &Harness, report: &EncodeReport) -> Vec<EncodedFrame> {
        let document = harness.store.read(&report.output_path).unwrap();
        match document.frames() {
            DocumentFrames::Rle(frames) => frames.clone(),
            DocumentFrames::LegacyDense(_) => panic!("encoder wrote legacy frames"),
        }
    }

    #[tokio::test]
    async fn frameskip_selects_every_third_frame_in_order() {
        let harness = harness(gray_frames(10), None);
        let report = harness
            .service
            .encode_video(request(harness.video.path(), 2, 0, false))
            .await
            .unwrap();

        assert_eq!(report.frames_saved, 4);
        assert_eq!(report.output_path, harness.video.path().with_extension("json"));
        assert_eq!(*harness.decoded.lock().unwrap(), vec![0, 3, 6, 9]);

        let frames = stored_frames(&harness, &report);
        let expected: Vec<EncodedFrame> = [0u8, 3, 6, 9]
            .iter()
            .map(|i| EncodedFrame::Rgb(vec![Run::new(Color::from_rgb8(*i, *i, *i), 4)]))
            .collect();
        assert_eq!(frames, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_order_encodes_keep_source_order() {
        let encoder = Arc::new(DelayedFrameEncoder::default());
        let peak = Arc::clone(&encoder.peak);
        let harness = harness_with(gray_frames(8), None, encoder);

        let report = harness
            .service
            .encode_video(request(harness.video.path(), 0, 0, false))
            .await
            .unwrap();

        assert_eq!(report.frames_saved, 8);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        let expected: Vec<EncodedFrame> = (0u8..8)
            .map(|i| EncodedFrame::Rgb(vec![Run::new(Color::from_rgb8(i, i, i), 4)]))
            .collect();
        assert_eq!(stored_frames(&harness, &report), expected);
    }

    #[tokio::test]
    async fn max_frames_stops_early() {
        let harness = harness(gray_frames(10), None);
        let report = harness
            .service
            .encode_video(request(harness.video.path(), 1, 2, false))
            .await
            .unwrap();

        assert_eq!(report.frames_saved, 2);
        assert_eq!(*harness.decoded.lock().unwrap(), vec![0, 2]);
    }

    #[tokio::test]
    async fn palette_documents_store_indices() {
        let palette = Palette::new(vec![Color::BLACK, Color::WHITE]).unwrap();
        let frames = vec![
            PixelGrid::uniform(dims(4, 4), Color::new(0.9, 0.9, 0.9)),
            PixelGrid::uniform(dims(4, 4), Color::new(0.1, 0.2, 0.1)),
        ];
        let harness = harness(frames, Some(palette));
        let report = harness
            .service
            .encode_video(request(harness.video.path(), 0, 0, true))
            .await
            .unwrap();

        assert_eq!(report.palette_size, Some(2));
        assert_eq!(
            stored_frames(&harness, &report),
            vec![
                EncodedFrame::Indexed(vec![Run::new(ColorIndex(1), 4)]),
                EncodedFrame::Indexed(vec![Run::new(ColorIndex(0), 4)]),
            ]
        );
    }

    #[tokio::test]
    async fn empty_source_is_unavailable_and_writes_nothing() {
        let harness = harness(Vec::new(), None);
        let result = harness
            .service
            .encode_video(request(harness.video.path(), 0, 0, false))
            .await;

        assert!(matches!(result, Err(AppError::SourceUnavailable { .. })));
        assert!(harness.store.documents.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_video_is_unavailable() {
        let harness = harness(gray_frames(2), None);
        let result = harness
            .service
            .encode_video(request(Path::new("/definitely/not/here.mp4"), 0, 0, false))
            .await;
        assert!(matches!(result, Err(AppError::SourceUnavailable { .. })));
    }

    #[tokio::test]
    async fn palette_errors_abort_before_any_frame_is_read() {
        let harness = harness(gray_frames(3), None);
        let result = harness
            .service
            .encode_video(request(harness.video.path(), 0, 0, true))
            .await;

        assert!(matches!(result, Err(AppError::ConfigError { .. })));
        assert!(harness.decoded.lock().unwrap().is_empty());
    }
}
