//! Coordinate model for 96-well plate runs.
//!
//! Three naming schemes are used throughout the workspace:
//!
//! - **Well**: plate position label such as `A3` or `G4`
//! - **Cell**: zero-based grid coordinate such as `(0, 2)` or `(6, 3)`
//! - **Column key**: dataset column `<well>_<channel>` such as `A3_0` or `G4_1`
//!
//! This crate converts between them. It holds no state beyond the lookup
//! tables for the fixed 96-well universe.

pub mod channel;
pub mod column;
pub mod error;
pub mod plate;

pub use channel::{
    CHANNEL_LABEL_PREFIX, ChannelSelector, channel_index_from_label, channel_label_for_1index,
};
pub use column::{
    CHANNEL_SEPARATOR, ColumnKey, channel_1index_suffix, channel_index_suffix, column_key,
    column_to_cell, column_to_channel_index, column_to_well, columns_to_cells, columns_to_wells,
    strip_channel_suffix,
};
pub use error::{ModelError, Result};
pub use plate::{
    Cell, PLATE_COLS, PLATE_ROWS, PLATE_WELLS, cell_to_well, cells_to_wells, plate96_cells,
    plate96_col_labels, plate96_row_labels, plate96_wells, well_to_cell, wells_to_cells,
};
