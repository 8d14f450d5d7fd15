//! The 96-well plate grid.
//!
//! Wells are labelled `A1`..`H12` (row letter, 1-based column number); cells
//! are zero-based `(row, col)` pairs. Both directions are answered from lookup
//! tables built on first use.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Number of plate rows (`A`..`H`).
pub const PLATE_ROWS: usize = 8;

/// Number of plate columns (`1`..`12`).
pub const PLATE_COLS: usize = 12;

/// Total number of wells on the plate.
pub const PLATE_WELLS: usize = PLATE_ROWS * PLATE_COLS;

const ROW_LETTERS: [char; PLATE_ROWS] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H'];

/// Zero-based grid coordinate of a well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Whether the coordinate lies on the 8x12 grid.
    pub fn is_on_plate(self) -> bool {
        self.row < PLATE_ROWS && self.col < PLATE_COLS
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

static WELL_TO_CELL: LazyLock<HashMap<String, Cell>> = LazyLock::new(|| {
    plate96_cells()
        .into_iter()
        .map(|cell| (format_well(cell), cell))
        .collect()
});

static CELL_TO_WELL: LazyLock<HashMap<Cell, String>> = LazyLock::new(|| {
    WELL_TO_CELL
        .iter()
        .map(|(well, cell)| (*cell, well.clone()))
        .collect()
});

fn format_well(cell: Cell) -> String {
    format!("{}{}", ROW_LETTERS[cell.row], cell.col + 1)
}

/// Convert a well label to its grid cell; `"B3"` gives `(1, 2)`.
pub fn well_to_cell(well: &str) -> Result<Cell> {
    WELL_TO_CELL
        .get(well)
        .copied()
        .ok_or_else(|| ModelError::UnknownWell {
            well: well.to_string(),
        })
}

/// Convert a grid cell to its well label; `(1, 2)` gives `"B3"`.
pub fn cell_to_well(cell: Cell) -> Result<&'static str> {
    CELL_TO_WELL
        .get(&cell)
        .map(String::as_str)
        .ok_or(ModelError::UnknownCell {
            row: cell.row,
            col: cell.col,
        })
}

pub fn wells_to_cells<S: AsRef<str>>(wells: &[S]) -> Result<Vec<Cell>> {
    wells.iter().map(|well| well_to_cell(well.as_ref())).collect()
}

pub fn cells_to_wells(cells: &[Cell]) -> Result<Vec<&'static str>> {
    cells.iter().map(|cell| cell_to_well(*cell)).collect()
}

/// Row labels `A`..`H`.
pub fn plate96_row_labels() -> Vec<String> {
    ROW_LETTERS.iter().map(char::to_string).collect()
}

/// Column labels `1`..`12`.
pub fn plate96_col_labels() -> Vec<String> {
    (1..=PLATE_COLS).map(|col| col.to_string()).collect()
}

/// All well labels in row-major order (`A1`, `A2`, ... `H12`).
pub fn plate96_wells() -> Vec<String> {
    plate96_cells().into_iter().map(format_well).collect()
}

/// All cells in row-major order.
pub fn plate96_cells() -> Vec<Cell> {
    (0..PLATE_ROWS)
        .flat_map(|row| (0..PLATE_COLS).map(move |col| Cell::new(row, col)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_known_wells() {
        assert_eq!(well_to_cell("A1").unwrap(), Cell::new(0, 0));
        assert_eq!(well_to_cell("B3").unwrap(), Cell::new(1, 2));
        assert_eq!(well_to_cell("H12").unwrap(), Cell::new(7, 11));
        assert_eq!(cell_to_well(Cell::new(1, 2)).unwrap(), "B3");
    }

    #[test]
    fn rejects_off_plate_coordinates() {
        assert!(matches!(
            well_to_cell("I1"),
            Err(ModelError::UnknownWell { .. })
        ));
        assert!(well_to_cell("A13").is_err());
        assert!(well_to_cell("a1").is_err());
        assert!(matches!(
            cell_to_well(Cell::new(0, 12)),
            Err(ModelError::UnknownCell { row: 0, col: 12 })
        ));
    }

    #[test]
    fn enumerations_cover_plate() {
        assert_eq!(plate96_wells().len(), PLATE_WELLS);
        assert_eq!(plate96_cells().len(), PLATE_WELLS);
        assert_eq!(plate96_wells()[12], "B1");
        assert_eq!(plate96_row_labels().join(""), "ABCDEFGH");
        assert_eq!(plate96_col_labels().last().map(String::as_str), Some("12"));
        assert!(plate96_cells().iter().all(|cell| cell.is_on_plate()));
    }

    #[test]
    fn list_conversions_preserve_order() {
        let cells = wells_to_cells(&["C4", "A1"]).unwrap();
        assert_eq!(cells, vec![Cell::new(2, 3), Cell::new(0, 0)]);
        assert_eq!(cells_to_wells(&cells).unwrap(), vec!["C4", "A1"]);
    }
}
