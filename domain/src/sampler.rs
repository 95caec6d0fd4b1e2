use std::ops::Range;

use crate::color::Color;
use crate::grid::{Dimensions, PixelGrid};

#[must_use]
pub fn sample(source: &PixelGrid, target: Dimensions) -> PixelGrid {
    let source_width = source.width() as usize;
    let source_height = source.height() as usize;
    let target_width = target.width() as usize;
    let target_height = target.height() as usize;

    let columns: Vec<Range<usize>> = (0..target_width)
        .map(|x| source_span(x, source_width, target_width))
        .collect();

    let mut pixels = Vec::with_capacity(target.pixel_count());
    for y in 0..target_height {
        let rows = source_span(y, source_height, target_height);
        for span in &columns {
            pixels.push(average_region(source, rows.clone(), span.clone()));
        }
    }

    PixelGrid::from_parts(target, pixels)
}

fn source_span(index: usize, source_len: usize, target_len: usize) -> Range<usize> {
    let scaled = |i: usize| (i as u128 * source_len as u128 / target_len as u128) as usize;

    let start = scaled(index).min(source_len.saturating_sub(1));
    let end = scaled(index + 1).min(source_len).max(start + 1);
    start..end
}

fn average_region(source: &PixelGrid, rows: Range<usize>, columns: Range<usize>) -> Color {
    let width = source.width() as usize;
    let pixels = source.pixels();

    let pivot = pixels
        .get(rows.start * width + columns.start)
        .copied()
        .unwrap_or(Color::BLACK);

    let mut sum = [0.0f64; 3];
    let mut count = 0usize;
    for y in rows {
        let row_start = y * width;
        let Some(row) = pixels.get(row_start + columns.start..row_start + columns.end) else {
            continue;
        };
        for pixel in row {
            sum[0] += pixel.r - pivot.r;
            sum[1] += pixel.g - pivot.g;
            sum[2] += pixel.b - pivot.b;
            count += 1;
        }
    }

    if count == 0 {
        return pivot;
    }

    let n = count as f64;
    Color::new(
        pivot.r + sum[0] / n,
        pivot.g + sum[1] / n,
        pivot.b + sum[2] / n,
    )
}
