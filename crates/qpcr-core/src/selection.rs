//! Active channel and cell selection.

use std::collections::BTreeSet;

use qpcr_model::{Cell, ColumnKey, plate96_cells};

use crate::dataset::PlateDataset;

/// Which channels and cells take part in plotting and reporting.
///
/// `any_data` and `no_data` are fixed when a dataset is installed and
/// partition the 96-cell plate; the active sets are user selections that
/// start out as "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    active_channels: BTreeSet<usize>,
    active_cells: BTreeSet<Cell>,
    any_data: BTreeSet<Cell>,
    no_data: BTreeSet<Cell>,
}

impl Selection {
    /// Selection for a freshly loaded dataset: all channels, all data cells.
    pub fn for_dataset(dataset: &PlateDataset) -> Self {
        let any_data: BTreeSet<Cell> = dataset
            .channel_columns_for_index1(0)
            .iter()
            .filter_map(|column| decode(column).map(|(_, cell)| cell))
            .collect();
        Self {
            active_channels: (0..dataset.num_channels()).collect(),
            active_cells: any_data.clone(),
            no_data: no_data_for(&any_data),
            any_data,
        }
    }

    /// Selection with nothing loaded: no channels or data cells, whole plate empty.
    pub fn empty() -> Self {
        Self {
            no_data: plate96_cells().into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn active_channels(&self) -> &BTreeSet<usize> {
        &self.active_channels
    }

    pub fn active_cells(&self) -> &BTreeSet<Cell> {
        &self.active_cells
    }

    pub fn any_data_cells(&self) -> &BTreeSet<Cell> {
        &self.any_data
    }

    pub fn no_data_cells(&self) -> &BTreeSet<Cell> {
        &self.no_data
    }

    pub fn set_active_channels(&mut self, channels: impl IntoIterator<Item = usize>) {
        self.active_channels = channels.into_iter().collect();
    }

    /// Columns of `dataset` whose channel and cell are both active, in
    /// dataset column order.
    pub fn active_columns(&self, dataset: &PlateDataset) -> Vec<String> {
        if self.active_channels.is_empty() {
            return Vec::new();
        }
        dataset
            .channel_columns_for_index1(0)
            .into_iter()
            .filter(|column| {
                decode(column).is_some_and(|(channel, cell)| {
                    self.active_channels.contains(&channel) && self.active_cells.contains(&cell)
                })
            })
            .collect()
    }

    /// Add and remove active cells, returning the number of cells whose
    /// membership changed.
    ///
    /// A cell listed in both `add` and `remove` ends up inactive.
    pub fn modify_active_cells(&mut self, add: &[Cell], remove: &[Cell]) -> usize {
        let mut changed = 0;
        for cell in add {
            if !remove.contains(cell) && self.active_cells.insert(*cell) {
                changed += 1;
            }
        }
        for cell in remove {
            if self.active_cells.remove(cell) {
                changed += 1;
            }
        }
        changed
    }

    /// Make every cell with data active.
    pub fn select_all_cells(&mut self) -> usize {
        let add: Vec<Cell> = self.any_data.iter().copied().collect();
        self.modify_active_cells(&add, &[])
    }

    /// Deactivate every cell.
    pub fn select_no_cells(&mut self) -> usize {
        let remove: Vec<Cell> = self.active_cells.iter().copied().collect();
        self.modify_active_cells(&[], &remove)
    }
}

fn decode(column: &str) -> Option<(usize, Cell)> {
    let key: ColumnKey = column.parse().ok()?;
    let cell = key.cell().ok()?;
    Some((key.channel, cell))
}

fn no_data_for(any_data: &BTreeSet<Cell>) -> BTreeSet<Cell> {
    plate96_cells()
        .into_iter()
        .filter(|cell| !any_data.contains(cell))
        .collect()
}
