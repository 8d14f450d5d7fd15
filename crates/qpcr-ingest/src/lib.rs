//! Reader for multi-channel plate run exports.
//!
//! An export holds one block per fluorescence channel. Each block opens with
//! a `StepNChannelM <name>` line followed by a header row (index name and
//! well labels) and one row per cycle. Blank lines and `#` comment lines are
//! skipped anywhere in the file.

mod block;
mod error;
mod options;
mod reader;

pub use block::{BLOCK_START_PREFIX, ChannelBlock, parse_value};
pub use error::{IngestError, Result};
pub use options::IngestOptions;
pub use reader::{load_plate_file, parse_plate_reader, read_plate_file};
