//! Derived frames: baseline correction, forward differences and ranges.
//!
//! Every function returns a new frame; inputs are never modified.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::CycleFrame;

/// Minimum x-axis span (cycles) for plot ranges.
pub const PLOT_XDELTA_MIN: f64 = 2.0;

/// Minimum y-axis span for plot ranges.
pub const PLOT_YDELTA_MIN: f64 = 0.02;

/// Inclusive value range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Widen `max` so that the span is at least `min_span`.
    #[must_use]
    pub fn with_min_span(self, min_span: Option<f64>) -> Self {
        match min_span {
            Some(span) if self.span() < span => Self::new(self.min, self.min + span),
            _ => self,
        }
    }

    /// Value at `fraction` of the way from `min` to `max`.
    pub fn fraction(&self, fraction: f64) -> f64 {
        self.min + fraction * self.span()
    }
}

/// Subtract each column's first-row value from every row of that column.
pub fn baseline_correct(frame: &CycleFrame) -> Result<CycleFrame> {
    frame.map_values(frame.height(), |values| {
        let baseline = values.first().copied().flatten();
        values
            .iter()
            .map(|value| match (value, baseline) {
                (Some(value), Some(baseline)) => Some(value - baseline),
                _ => None,
            })
            .collect()
    })
}

/// Forward difference `v[i+1] - v[i]`, one row shorter than the input.
///
/// The result keeps the index values of the first `N-1` input rows.
pub fn first_derivative(frame: &CycleFrame) -> Result<CycleFrame> {
    let height = frame.height().saturating_sub(1);
    frame.map_values(height, |values| {
        values
            .windows(2)
            .map(|pair| match (pair[0], pair[1]) {
                (Some(current), Some(next)) => Some(next - current),
                _ => None,
            })
            .collect()
    })
}

/// First derivative applied twice; two rows shorter than the input.
pub fn second_derivative(frame: &CycleFrame) -> Result<CycleFrame> {
    first_derivative(&first_derivative(frame)?)
}

/// Overall minimum and maximum over every value of the frame.
///
/// Missing and NaN values are skipped; `None` when nothing remains. When
/// `min_span` is given the range is widened to at least that span.
pub fn min_max(frame: &CycleFrame, min_span: Option<f64>) -> Result<Option<ValueRange>> {
    let mut range: Option<ValueRange> = None;
    for name in frame.column_names() {
        if let Some(column) = values_range(frame.column_values(&name)?.into_iter().flatten()) {
            range = Some(match range {
                Some(acc) => ValueRange::new(acc.min.min(column.min), acc.max.max(column.max)),
                None => column,
            });
        }
    }
    Ok(range.map(|range| range.with_min_span(min_span)))
}

/// Minimum and maximum of one column.
pub fn column_min_max(frame: &CycleFrame, name: &str) -> Result<Option<ValueRange>> {
    Ok(values_range(frame.column_values(name)?.into_iter().flatten()))
}

/// First and last index values, assuming an ascending index.
pub fn row_index_min_max(frame: &CycleFrame, min_span: Option<f64>) -> Result<Option<ValueRange>> {
    let index = frame.index_values()?;
    let (Some(first), Some(last)) = (index.first(), index.last()) else {
        return Ok(None);
    };
    Ok(Some(ValueRange::new(*first, *last).with_min_span(min_span)))
}

fn values_range(values: impl Iterator<Item = f64>) -> Option<ValueRange> {
    values
        .filter(|value| !value.is_nan())
        .fold(None, |range: Option<ValueRange>, value| {
            Some(match range {
                Some(range) => ValueRange::new(range.min.min(value), range.max.max(value)),
                None => ValueRange::new(value, value),
            })
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(columns: Vec<(&str, Vec<Option<f64>>)>) -> CycleFrame {
        let height = columns.first().map_or(0, |(_, values)| values.len());
        CycleFrame::from_values(
            "Cycle",
            (1..=height).map(|cycle| cycle as f64).collect(),
            columns
                .into_iter()
                .map(|(name, values)| (name.to_string(), values))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn baseline_subtracts_first_row() {
        let raw = frame(vec![("A1_0", vec![Some(3.0), Some(4.0), Some(9.0)])]);
        let corrected = baseline_correct(&raw).unwrap();
        assert_eq!(
            corrected.column_values("A1_0").unwrap(),
            vec![Some(0.0), Some(1.0), Some(6.0)]
        );
        assert_eq!(corrected.index_values().unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn baseline_of_zero_first_row_is_identity() {
        let raw = frame(vec![
            ("A1_0", vec![Some(0.0), Some(4.0), Some(9.0)]),
            ("A2_0", vec![Some(0.0), Some(-1.5), None]),
        ]);
        let corrected = baseline_correct(&raw).unwrap();
        for name in raw.column_names() {
            assert_eq!(
                corrected.column_values(&name).unwrap(),
                raw.column_values(&name).unwrap()
            );
        }
    }

    #[test]
    fn derivatives_drop_trailing_rows() {
        let raw = frame(vec![("A1_0", vec![Some(1.0), Some(2.0), Some(5.0), Some(9.0)])]);
        let d1 = first_derivative(&raw).unwrap();
        assert_eq!(d1.height(), 3);
        assert_eq!(d1.index_values().unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(
            d1.column_values("A1_0").unwrap(),
            vec![Some(1.0), Some(3.0), Some(4.0)]
        );

        let d2 = second_derivative(&raw).unwrap();
        assert_eq!(d2.height(), 2);
        assert_eq!(d2.index_values().unwrap(), vec![1.0, 2.0]);
        assert_eq!(d2.column_values("A1_0").unwrap(), vec![Some(2.0), Some(1.0)]);
    }

    #[test]
    fn derivatives_of_short_frames_are_empty() {
        let raw = frame(vec![("A1_0", vec![Some(1.0)])]);
        assert_eq!(first_derivative(&raw).unwrap().height(), 0);
        assert_eq!(second_derivative(&raw).unwrap().height(), 0);
    }

    #[test]
    fn min_max_spans_all_columns() {
        let raw = frame(vec![
            ("A1_0", vec![Some(1.0), Some(2.0)]),
            ("A2_0", vec![Some(-3.0), None]),
        ]);
        let range = min_max(&raw, None).unwrap().unwrap();
        assert_eq!(range, ValueRange::new(-3.0, 2.0));
    }

    #[test]
    fn min_max_widens_degenerate_range() {
        let flat = frame(vec![("A1_0", vec![Some(5.0), Some(5.0)])]);
        let range = min_max(&flat, Some(PLOT_YDELTA_MIN)).unwrap().unwrap();
        assert_eq!(range.min, 5.0);
        assert!((range.max - 5.02).abs() < 1e-12);

        let rows = row_index_min_max(&flat, Some(PLOT_XDELTA_MIN)).unwrap().unwrap();
        assert_eq!(rows, ValueRange::new(1.0, 3.0));
    }

    #[test]
    fn min_max_of_empty_frame_is_none() {
        let empty = frame(vec![]);
        assert_eq!(min_max(&empty, None).unwrap(), None);
        assert_eq!(row_index_min_max(&empty, None).unwrap(), None);
    }
}
