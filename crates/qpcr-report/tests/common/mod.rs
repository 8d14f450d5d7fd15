#![allow(dead_code)]

use qpcr_core::{CycleFrame, PlateDataset, Session};

pub fn channel_table(columns: &[(&str, [f64; 5])]) -> CycleFrame {
    CycleFrame::from_values(
        "Cycle",
        vec![1.0, 2.0, 3.0, 4.0, 5.0],
        columns
            .iter()
            .map(|(well, values)| {
                (
                    (*well).to_string(),
                    values.iter().copied().map(Some).collect(),
                )
            })
            .collect(),
    )
    .unwrap()
}

pub fn two_channel_dataset() -> PlateDataset {
    let mut dataset = PlateDataset::new("plate.csv");
    dataset
        .add_channel(
            &channel_table(&[
                ("A1", [1.0, 2.0, 3.0, 10.0, 20.0]),
                ("B2", [5.0, 5.0, 5.0, 5.0, 5.0]),
            ]),
            "Step1Channel1",
            "FAM",
        )
        .unwrap();
    dataset
        .add_channel(
            &channel_table(&[("A1", [2.0, 2.0, 4.0, 8.0, 16.0])]),
            "Step1Channel2",
            "HEX",
        )
        .unwrap();
    dataset
}

pub fn loaded_session() -> Session {
    let mut session = Session::default();
    session.install_dataset(two_channel_dataset()).unwrap();
    session
}
