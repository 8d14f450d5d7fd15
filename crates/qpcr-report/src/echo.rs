//! Dataset echo export.
//!
//! Writes a loaded dataset back out in the block layout the ingest reader
//! accepts: one `Step1ChannelN <name>` line per channel followed by a CSV
//! table with bare well labels. Optional `#` comment lines describe the run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{Local, NaiveDate};
use csv::{Terminator, WriterBuilder};
use qpcr_core::{CycleFrame, PlateDataset};
use qpcr_model::strip_channel_suffix;
use tracing::info;

use crate::error::{ReportError, Result};

/// Text written for missing values.
pub const MISSING_VALUE: &str = "NaN";

/// Options for the echo export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoOptions {
    /// Write the `#` header and per-channel comment lines.
    pub comments: bool,
    /// Date for the header; today when unset.
    pub date: Option<NaiveDate>,
    /// User for the header; taken from the environment when unset.
    pub user: Option<String>,
}

impl Default for EchoOptions {
    fn default() -> Self {
        Self {
            comments: true,
            date: None,
            user: None,
        }
    }
}

impl EchoOptions {
    #[must_use]
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
}

/// Write `dataset` to `path`, returning the number of channel tables written.
pub fn write_plate_echo(
    dataset: &PlateDataset,
    path: &Path,
    options: &EchoOptions,
) -> Result<usize> {
    let file = File::create(path).map_err(|source| ReportError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let written = write_plate_echo_to(dataset, path, &mut writer, options)?;
    writer.flush().map_err(|source| ReportError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), channels = written, "wrote dataset echo");
    Ok(written)
}

/// Write the echo to any writer; `path` supplies the file name in the header.
pub fn write_plate_echo_to<W: Write>(
    dataset: &PlateDataset,
    path: &Path,
    mut out: W,
    options: &EchoOptions,
) -> Result<usize> {
    let io_err = |source: std::io::Error| ReportError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if options.comments {
        let basename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let date = options.date.unwrap_or_else(|| Local::now().date_naive());
        let user = options.user.clone().unwrap_or_else(current_user);
        writeln!(out, "# File: {basename}").map_err(io_err)?;
        writeln!(
            out,
            "# 96-well plate, {} channel dataset",
            dataset.num_channels()
        )
        .map_err(io_err)?;
        writeln!(out, "# Source: {}", dataset.source()).map_err(io_err)?;
        writeln!(out, "# Date: {}", date.format("%B %d, %Y")).map_err(io_err)?;
        writeln!(out, "# User: {user}").map_err(io_err)?;
    }

    let mut written = 0;
    for (idx, channel) in dataset.channels().iter().enumerate() {
        let frame = dataset.channel_frame(idx)?;
        if options.comments {
            let (rows, cols) = frame.shape();
            writeln!(out, "# Dataset {} ({rows}, {cols})", channel.name).map_err(io_err)?;
        }
        let start = format!("Step1Channel{} {}", idx + 1, channel.name);
        writeln!(out, "{}", start.trim_end()).map_err(io_err)?;
        write_table(&frame, &mut out)?;
        written += 1;
    }
    Ok(written)
}

fn write_table<W: Write>(frame: &CycleFrame, out: W) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    let names = frame.column_names();
    let mut header = Vec::with_capacity(names.len() + 1);
    header.push(frame.index_name().to_string());
    header.extend(names.iter().map(|name| strip_channel_suffix(name).to_string()));
    writer.write_record(&header)?;

    let index = frame.index_values()?;
    let columns = names
        .iter()
        .map(|name| frame.column_values(name))
        .collect::<qpcr_core::Result<Vec<_>>>()?;
    for (row, cycle) in index.iter().enumerate() {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(cycle.to_string());
        for values in &columns {
            record.push(match values.get(row).copied().flatten() {
                Some(value) => value.to_string(),
                None => MISSING_VALUE.to_string(),
            });
        }
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|e| ReportError::Csv {
        message: e.to_string(),
    })?;
    Ok(())
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}
