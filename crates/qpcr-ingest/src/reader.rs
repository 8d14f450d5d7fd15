//! Run export reader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use qpcr_core::{PlateDataset, Session};
use tracing::{debug, info, info_span, warn};

use crate::block::ChannelBlock;
use crate::error::{IngestError, Result};
use crate::options::IngestOptions;

/// Read a run export into a dataset.
///
/// The dataset's source label is the path as given.
pub fn read_plate_file(path: &Path, options: &IngestOptions) -> Result<PlateDataset> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let span = info_span!("read_plate_file", path = %path.display());
    let _guard = span.enter();
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_plate_reader(file, path, options)?;
    info!(
        channels = dataset.num_channels(),
        columns = dataset.frame().map_or(0, |frame| frame.width()),
        "plate file read"
    );
    Ok(dataset)
}

/// Parse a run export from any reader.
///
/// `path` labels the dataset source and error messages.
pub fn parse_plate_reader<R: Read>(
    reader: R,
    path: &Path,
    options: &IngestOptions,
) -> Result<PlateDataset> {
    let blocks = collect_blocks(reader, path, options)?;
    let mut dataset = PlateDataset::new(path.display().to_string());
    for block in blocks {
        if block.is_empty() {
            warn!(channel = %block.key, "skipping channel block with no rows");
            continue;
        }
        let frame = block.to_frame(path, options)?;
        dataset
            .add_channel(&frame, block.key, block.name)
            .map_err(|source| IngestError::Dataset {
                path: path.to_path_buf(),
                source,
            })?;
    }
    Ok(dataset)
}

/// Read a run export and install it into `session`.
///
/// On error the session keeps its previous dataset.
pub fn load_plate_file(session: &mut Session, path: &Path, options: &IngestOptions) -> Result<()> {
    let dataset = read_plate_file(path, options)?;
    session
        .install_dataset(dataset)
        .map_err(|source| IngestError::Dataset {
            path: path.to_path_buf(),
            source,
        })
}

fn collect_blocks<R: Read>(
    reader: R,
    path: &Path,
    options: &IngestOptions,
) -> Result<Vec<ChannelBlock>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.separator)
        .comment(options.comment)
        .from_reader(reader);

    let mut blocks: Vec<ChannelBlock> = Vec::new();
    let mut skipped = 0usize;
    for record in csv_reader.byte_records() {
        let record = record.map_err(|e| IngestError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let fields: Vec<String> = record.iter().map(clean_field).collect();
        if fields.iter().all(String::is_empty) {
            continue;
        }
        if is_comment(&fields, options) {
            continue;
        }
        if let Some(block) = fields
            .first()
            .and_then(|first| ChannelBlock::from_start_field(first))
        {
            debug!(channel = %block.key, name = %block.name, "channel block");
            blocks.push(block);
            continue;
        }
        match blocks.last_mut() {
            Some(block) => block.rows.push(fields),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        debug!(skipped, "ignored rows before the first channel block");
    }
    Ok(blocks)
}

/// Comment lines may carry leading whitespace or stray bytes the csv
/// reader does not strip.
fn is_comment(fields: &[String], options: &IngestOptions) -> bool {
    match (options.comment, fields.first()) {
        (Some(marker), Some(first)) => first.as_bytes().first() == Some(&marker),
        _ => false,
    }
}

/// Keep printable ASCII only and trim.
fn clean_field(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .filter(|ch| ch.is_ascii_graphic() || ch.is_ascii_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_field_strips_non_printable() {
        assert_eq!(clean_field("\u{feff}Step1Channel1 FAM".as_bytes()), "Step1Channel1 FAM");
        assert_eq!(clean_field(b" 12.5\r"), "12.5");
    }

    #[test]
    fn rows_before_first_block_are_ignored() {
        let text = "Run,Plate 7\nStep1Channel1 FAM\nCycle,A1\n1,3\n";
        let blocks = collect_blocks(
            text.as_bytes(),
            Path::new("inline.csv"),
            &IngestOptions::default(),
        )
        .unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].rows.len(), 2);
    }
}
