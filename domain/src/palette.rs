use std::sync::Arc;

use crate::color::{Color, ColorIndex};
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Arc<[Color]>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> DomainResult<Self> {
        if colors.is_empty() {
            return Err(DomainError::ConfigError {
                message: "Color palette cannot be empty".to_string(),
            });
        }

        if u32::try_from(colors.len()).is_err() {
            return Err(DomainError::ConfigError {
                message: format!("Color palette has too many entries ({})", colors.len()),
            });
        }

        for (i, color) in colors.iter().enumerate() {
            if let Some(j) = colors.iter().take(i).position(|earlier| earlier == color) {
                return Err(DomainError::ConfigError {
                    message: format!("Palette entries {j} and {i} are both {color}"),
                });
            }
        }

        Ok(Self {
            colors: colors.into(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    #[must_use]
    pub fn get(&self, index: ColorIndex) -> Option<Color> {
        self.colors.get(index.as_usize()).copied()
    }

    pub fn resolve(&self, index: ColorIndex) -> DomainResult<Color> {
        self.get(index).ok_or_else(|| {
            DomainError::CorruptData(format!(
                "Palette index {} is out of range (palette has {} colors)",
                index,
                self.len()
            ))
        })
    }

    #[must_use]
    pub fn nearest_index(&self, color: &Color) -> ColorIndex {
        let mut best_index = 0usize;
        let mut best_distance = f64::INFINITY;

        for (i, candidate) in self.colors.iter().enumerate() {
            let distance = candidate.squared_distance(color);
            if distance < best_distance {
                best_index = i;
                best_distance = distance;
            }
        }

        ColorIndex(best_index as u32)
    }

    #[must_use]
    pub fn quantize(&self, pixels: &[Color]) -> Vec<ColorIndex> {
        pixels.iter().map(|pixel| self.nearest_index(pixel)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn black_and_white() -> Palette {
        Palette::new(vec![Color::BLACK, Color::WHITE]).unwrap()
    }

    #[test]
    fn empty_palette_is_a_config_error() {
        assert!(matches!(
            Palette::new(Vec::new()),
            Err(DomainError::ConfigError { .. })
        ));
    }

    #[test]
    fn duplicate_entries_are_rejected() {
        let result = Palette::new(vec![Color::BLACK, Color::WHITE, Color::BLACK]);
        assert!(matches!(result, Err(DomainError::ConfigError { .. })));
    }

    #[test]
    fn nearest_index_picks_the_closest_entry() {
        let palette = black_and_white();
        assert_eq!(palette.nearest_index(&Color::new(0.2, 0.1, 0.3)), ColorIndex(0));
        assert_eq!(palette.nearest_index(&Color::new(0.8, 0.9, 0.6)), ColorIndex(1));
    }

    #[test]
    fn exact_tie_keeps_the_lowest_index() {
        let palette = black_and_white();
        assert_eq!(palette.nearest_index(&Color::new(0.5, 0.5, 0.5)), ColorIndex(0));

        let reversed = Palette::new(vec![Color::WHITE, Color::BLACK]).unwrap();
        assert_eq!(reversed.nearest_index(&Color::new(0.5, 0.5, 0.5)), ColorIndex(0));
    }

    #[test]
    fn resolve_rejects_out_of_range_indices() {
        let palette = black_and_white();
        assert_eq!(palette.resolve(ColorIndex(1)).unwrap(), Color::WHITE);
        assert!(matches!(
            palette.resolve(ColorIndex(2)),
            Err(DomainError::CorruptData(_))
        ));
    }

    fn channel() -> impl Strategy<Value = f64> {
        (0u8..=255).prop_map(|v| f64::from(v) / 255.0)
    }

    fn color() -> impl Strategy<Value = Color> {
        (channel(), channel(), channel()).prop_map(|(r, g, b)| Color::new(r, g, b))
    }

    proptest! {
        #[test]
        fn nearest_index_has_no_strictly_closer_entry(
            entries in prop::collection::vec(color(), 1..12),
            query in color(),
        ) {
            let mut distinct: Vec<Color> = Vec::new();
            for entry in entries {
                if !distinct.contains(&entry) {
                    distinct.push(entry);
                }
            }
            let palette = Palette::new(distinct).unwrap();
            let chosen = palette.nearest_index(&query).as_usize();
            let chosen_distance = palette.colors()[chosen].squared_distance(&query);

            for (j, other) in palette.colors().iter().enumerate() {
                let distance = other.squared_distance(&query);
                prop_assert!(distance >= chosen_distance);
                if j < chosen {
                    prop_assert!(distance > chosen_distance);
                }
            }
        }
    }
}
