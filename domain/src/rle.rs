use std::iter;

use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<V> {
    pub value: V,
    pub count: u64,
}

impl<V> Run<V> {
    pub fn new(value: V, count: u64) -> Self {
        Self { value, count }
    }
}

pub fn encode<V: PartialEq + Clone>(values: &[V]) -> Vec<Run<V>> {
    let mut runs: Vec<Run<V>> = Vec::new();

    for value in values {
        match runs.last_mut() {
            Some(run) if run.value == *value => run.count += 1,
            _ => runs.push(Run::new(value.clone(), 1)),
        }
    }

    runs
}

pub fn decoded_len<V>(runs: &[Run<V>]) -> DomainResult<usize> {
    let mut total = 0usize;
    for (position, run) in runs.iter().enumerate() {
        if run.count == 0 {
            return Err(DomainError::CorruptData(format!(
                "run {position} has a count of zero"
            )));
        }
        total = usize::try_from(run.count)
            .ok()
            .and_then(|count| total.checked_add(count))
            .ok_or_else(|| {
                DomainError::CorruptData(format!("run {position} overflows the frame length"))
            })?;
    }
    Ok(total)
}

/// Expands `runs` in order. When `expected_len` is given the expanded length
/// must match it exactly; the check happens before anything is allocated.
pub fn decode<V: Clone>(runs: &[Run<V>], expected_len: Option<usize>) -> DomainResult<Vec<V>> {
    decode_with(runs, expected_len, |value| Ok(value.clone()))
}

pub fn decode_with<V, T, F>(
    runs: &[Run<V>],
    expected_len: Option<usize>,
    mut map: F,
) -> DomainResult<Vec<T>>
where
    T: Clone,
    F: FnMut(&V) -> DomainResult<T>,
{
    let total = decoded_len(runs)?;
    if let Some(expected) = expected_len {
        if total != expected {
            return Err(DomainError::LengthMismatch {
                expected,
                actual: total,
            });
        }
    }

    let mut values = Vec::with_capacity(total);
    for run in runs {
        let value = map(&run.value)?;
        values.extend(iter::repeat_n(value, run.count as usize));
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use proptest::prelude::*;

    #[test]
    fn encodes_index_runs() {
        let runs = encode(&[0u32, 0, 0, 1, 1, 2, 2, 2, 2]);
        assert_eq!(runs, vec![Run::new(0, 3), Run::new(1, 2), Run::new(2, 4)]);
        assert_eq!(
            decode(&runs, Some(9)).unwrap(),
            vec![0, 0, 0, 1, 1, 2, 2, 2, 2]
        );
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(encode::<u32>(&[]).is_empty());
        assert!(decode::<u32>(&[], None).unwrap().is_empty());
        assert_eq!(encode(&[7u32]), vec![Run::new(7, 1)]);
        assert_eq!(encode(&[5u32; 6]), vec![Run::new(5, 6)]);
    }

    #[test]
    fn colors_group_only_on_exact_equality() {
        let almost_black = Color::new(0.0, 0.0, 1e-12);
        let runs = encode(&[Color::BLACK, Color::BLACK, almost_black]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], Run::new(Color::BLACK, 2));
    }

    #[test]
    fn zero_count_is_corrupt() {
        let runs = [Run::new(1u32, 2), Run::new(2, 0)];
        assert!(matches!(
            decode(&runs, None),
            Err(DomainError::CorruptData(_))
        ));
    }

    #[test]
    fn length_must_match_bound_exactly() {
        let runs = [Run::new(1u32, 60), Run::new(2, 39)];
        assert_eq!(
            decode(&runs, Some(100)),
            Err(DomainError::LengthMismatch {
                expected: 100,
                actual: 99
            })
        );
        let too_long = [Run::new(1u32, 101)];
        assert_eq!(
            decode(&too_long, Some(100)),
            Err(DomainError::LengthMismatch {
                expected: 100,
                actual: 101
            })
        );
    }

    #[test]
    fn huge_counts_fail_before_allocating() {
        let runs = [Run::new(1u32, u64::MAX), Run::new(2, u64::MAX)];
        assert!(decode(&runs, Some(4)).is_err());
    }

    #[test]
    fn decode_with_maps_each_run_once() {
        let mut calls = 0;
        let runs = [Run::new(1u32, 3), Run::new(2, 2)];
        let decoded = decode_with(&runs, Some(5), |value| {
            calls += 1;
            Ok(value * 10)
        })
        .unwrap();
        assert_eq!(decoded, vec![10, 10, 10, 20, 20]);
        assert_eq!(calls, 2);
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(values in prop::collection::vec(0u32..4, 0..200)) {
            let runs = encode(&values);
            prop_assert_eq!(decode(&runs, Some(values.len())).unwrap(), values);
        }

        #[test]
        fn decode_inverts_encode_for_colors(
            picks in prop::collection::vec((0u8..3, 0u8..3), 0..200),
        ) {
            let colors: Vec<Color> = picks
                .iter()
                .map(|(r, g)| {
                    Color::new(f64::from(*r) / 3.0, f64::from(*g) / 7.0, 0.435_294_117_647_058_83)
                })
                .collect();
            let runs = encode(&colors);
            prop_assert!(runs.windows(2).all(|pair| pair[0].value != pair[1].value));
            prop_assert_eq!(decode(&runs, Some(colors.len())).unwrap(), colors);
        }

        #[test]
        fn runs_are_maximal(values in prop::collection::vec(0u32..3, 0..200)) {
            let runs = encode(&values);
            prop_assert!(runs.iter().all(|run| run.count >= 1));
            prop_assert!(runs.windows(2).all(|pair| pair[0].value != pair[1].value));
            prop_assert_eq!(decoded_len(&runs).unwrap(), values.len());
        }
    }
}
