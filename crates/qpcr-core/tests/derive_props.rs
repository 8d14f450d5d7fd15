//! Property tests for the derived-frame pipeline.

use proptest::collection::vec;
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

use qpcr_core::{
    CycleFrame, baseline_correct, first_derivative, min_max, second_derivative,
    threshold_crossing_position,
};

fn frame_from(values: &[f64]) -> CycleFrame {
    CycleFrame::from_values(
        "Cycle",
        (1..=values.len()).map(|cycle| cycle as f64).collect(),
        vec![(
            "A1_0".to_string(),
            values.iter().copied().map(Some).collect(),
        )],
    )
    .unwrap()
}

proptest! {
    #[test]
    fn derivative_row_counts(values in vec(-1.0e3f64..1.0e3, 2..40)) {
        let frame = frame_from(&values);
        let n = values.len();
        prop_assert_eq!(first_derivative(&frame).unwrap().height(), n - 1);
        prop_assert_eq!(second_derivative(&frame).unwrap().height(), n.saturating_sub(2));
    }

    #[test]
    fn baseline_starts_at_zero(values in vec(-1.0e3f64..1.0e3, 1..40)) {
        let corrected = baseline_correct(&frame_from(&values)).unwrap();
        let column = corrected.column_values("A1_0").unwrap();
        prop_assert_eq!(column[0], Some(0.0));
        prop_assert_eq!(corrected.height(), values.len());
    }

    #[test]
    fn min_max_bounds_every_value(values in vec(-1.0e3f64..1.0e3, 1..40)) {
        let range = min_max(&frame_from(&values), None).unwrap().unwrap();
        prop_assert!(values.iter().all(|value| *value >= range.min && *value <= range.max));
    }

    #[test]
    fn crossing_follows_sample_at_or_below_threshold(
        values in vec(0.0f64..100.0, 2..40),
        threshold in 0.0f64..100.0,
    ) {
        let cq = threshold_crossing_position(&values, threshold, -1.0);
        if cq >= 0.0 {
            prop_assert!(cq >= 1.0 && cq <= values.len() as f64);
            let i = cq.floor() as usize;
            prop_assert!(values[..i.min(values.len())].iter().any(|value| *value <= threshold));
        }
    }
}
