use serde::{Deserialize, Serialize};

use domain::{
    color::{Color, ColorIndex},
    document::VideoDocument,
    error::{DomainError, DomainResult},
    frame::{DocumentFrames, EncodedFrame, FrameLayout},
    grid::{Dimensions, PixelGrid},
    palette::Palette,
    rle::Run,
};

type RgbTriple = [f64; 3];

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentDto {
    pub width: i64,
    pub height: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<Vec<RgbTriple>>,
    pub frames: Vec<FrameDto>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameDto {
    IndexedRuns(Vec<(i64, i64)>),
    RgbRuns(Vec<(RgbTriple, i64)>),
    Dense(Vec<Vec<RgbTriple>>),
}

impl FrameDto {
    fn layout(&self) -> Option<FrameLayout> {
        match self {
            Self::IndexedRuns(runs) if runs.is_empty() => None,
            Self::IndexedRuns(_) | Self::RgbRuns(_) => Some(FrameLayout::Rle),
            Self::Dense(_) => Some(FrameLayout::LegacyDense),
        }
    }
}

impl From<&VideoDocument> for DocumentDto {
    fn from(document: &VideoDocument) -> Self {
        let frames = match document.frames() {
            DocumentFrames::Rle(frames) => frames.iter().map(encoded_to_dto).collect(),
            DocumentFrames::LegacyDense(grids) => grids.iter().map(dense_to_dto).collect(),
        };

        Self {
            width: i64::from(document.dimensions().width()),
            height: i64::from(document.dimensions().height()),
            palette: document
                .palette()
                .map(|palette| palette.colors().iter().map(Color::to_array).collect()),
            frames,
        }
    }
}

fn encoded_to_dto(frame: &EncodedFrame) -> FrameDto {
    match frame {
        EncodedFrame::Indexed(runs) => FrameDto::IndexedRuns(
            runs.iter()
                .map(|run| (i64::from(run.value.get()), run.count as i64))
                .collect(),
        ),
        EncodedFrame::Rgb(runs) => FrameDto::RgbRuns(
            runs.iter()
                .map(|run| (run.value.to_array(), run.count as i64))
                .collect(),
        ),
    }
}

fn dense_to_dto(grid: &PixelGrid) -> FrameDto {
    let rows = (0..grid.height())
        .filter_map(|y| grid.row(y))
        .map(|row| row.iter().map(Color::to_array).collect())
        .collect();
    FrameDto::Dense(rows)
}

impl TryFrom<DocumentDto> for VideoDocument {
    type Error = DomainError;

    fn try_from(dto: DocumentDto) -> DomainResult<Self> {
        let dimensions = parse_dimensions(dto.width, dto.height)?;
        let palette = dto.palette.map(parse_palette).transpose()?;
        let layout = resolve_layout(&dto.frames)?;

        let frames = match layout {
            FrameLayout::Rle => DocumentFrames::Rle(
                dto.frames
                    .into_iter()
                    .map(|frame| parse_encoded(frame, palette.is_some()))
                    .collect::<DomainResult<_>>()?,
            ),
            FrameLayout::LegacyDense => DocumentFrames::LegacyDense(
                dto.frames
                    .into_iter()
                    .enumerate()
                    .map(|(index, frame)| parse_dense(index, frame, dimensions))
                    .collect::<DomainResult<_>>()?,
            ),
        };

        Self::from_frames(dimensions, palette, frames)
    }
}

fn parse_dimensions(width: i64, height: i64) -> DomainResult<Dimensions> {
    let (Ok(width), Ok(height)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(DomainError::CorruptData(format!(
            "invalid document size {width}x{height}"
        )));
    };
    Dimensions::new(width, height).map_err(|e| DomainError::CorruptData(e.to_string()))
}

fn parse_palette(entries: Vec<RgbTriple>) -> DomainResult<Palette> {
    let colors = entries
        .into_iter()
        .map(parse_color)
        .collect::<DomainResult<Vec<_>>>()?;
    Palette::new(colors).map_err(|e| DomainError::CorruptData(format!("palette: {e}")))
}

fn parse_color([r, g, b]: RgbTriple) -> DomainResult<Color> {
    Color::checked(r, g, b).map_err(|e| DomainError::CorruptData(e.to_string()))
}

fn resolve_layout(frames: &[FrameDto]) -> DomainResult<FrameLayout> {
    let mut layout = None;
    for (index, frame) in frames.iter().enumerate() {
        match (layout, frame.layout()) {
            (_, None) => {}
            (None, found) => layout = found,
            (Some(expected), Some(found)) if expected != found => {
                return Err(DomainError::CorruptData(format!(
                    "frame {index}: {found} frame in a {expected} document"
                )));
            }
            (Some(_), Some(_)) => {}
        }
    }
    Ok(layout.unwrap_or(FrameLayout::Rle))
}

fn parse_count(count: i64) -> DomainResult<u64> {
    u64::try_from(count)
        .ok()
        .filter(|count| *count >= 1)
        .ok_or_else(|| DomainError::CorruptData(format!("run count {count} is not positive")))
}

fn parse_encoded(frame: FrameDto, has_palette: bool) -> DomainResult<EncodedFrame> {
    match frame {
        FrameDto::IndexedRuns(runs) if runs.is_empty() => Ok(if has_palette {
            EncodedFrame::Indexed(Vec::new())
        } else {
            EncodedFrame::Rgb(Vec::new())
        }),
        FrameDto::IndexedRuns(runs) => runs
            .into_iter()
            .map(|(index, count)| {
                let index = u32::try_from(index).map_err(|_| {
                    DomainError::CorruptData(format!("palette index {index} is out of range"))
                })?;
                Ok(Run::new(ColorIndex(index), parse_count(count)?))
            })
            .collect::<DomainResult<_>>()
            .map(EncodedFrame::Indexed),
        FrameDto::RgbRuns(runs) => runs
            .into_iter()
            .map(|(rgb, count)| Ok(Run::new(parse_color(rgb)?, parse_count(count)?)))
            .collect::<DomainResult<_>>()
            .map(EncodedFrame::Rgb),
        FrameDto::Dense(_) => Err(DomainError::CorruptData(
            "dense frame in a run-length document".to_string(),
        )),
    }
}

fn parse_dense(index: usize, frame: FrameDto, dimensions: Dimensions) -> DomainResult<PixelGrid> {
    let rows = match frame {
        FrameDto::Dense(rows) => rows,
        FrameDto::IndexedRuns(runs) if runs.is_empty() => Vec::new(),
        FrameDto::IndexedRuns(_) | FrameDto::RgbRuns(_) => {
            return Err(DomainError::CorruptData(format!(
                "frame {index}: run-length frame in a legacy-dense document"
            )));
        }
    };

    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(parse_color).collect())
        .collect::<DomainResult<Vec<Vec<Color>>>>()?;

    PixelGrid::from_rows(dimensions, rows).map_err(|e| match e {
        DomainError::CorruptData(message) => {
            DomainError::CorruptData(format!("frame {index}: {message}"))
        }
        other => other,
    })
}
