//! One-line summaries of each channel table.

use qpcr_core::PlateDataset;

use crate::error::Result;

/// Which parts of a channel summary to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailOptions {
    /// Index name and row count.
    pub index: bool,
    /// First and last index value; only shown with `index`.
    pub row_range: bool,
    /// Column count.
    pub columns: bool,
}

impl Default for DetailOptions {
    fn default() -> Self {
        Self {
            index: true,
            row_range: true,
            columns: true,
        }
    }
}

/// Describe each channel as `<key> (<name>)\t<index>: <n> rows (<a> to <b>)\t<m> cols`.
pub fn dataset_details(dataset: &PlateDataset, options: &DetailOptions) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(dataset.num_channels());
    for (idx, channel) in dataset.channels().iter().enumerate() {
        let frame = dataset.channel_frame(idx)?;
        let mut line = format!("{} ({})", channel.key, channel.name);
        if options.index {
            line.push_str(&format!("\t{}: {} rows", frame.index_name(), frame.height()));
            if options.row_range {
                let index = frame.index_values()?;
                if let (Some(first), Some(last)) = (index.first(), index.last()) {
                    line.push_str(&format!(" ({first} to {last})"));
                }
            }
        }
        if options.columns {
            line.push_str(&format!("\t{} cols", frame.width()));
        }
        lines.push(line);
    }
    Ok(lines)
}
