//! Library side of the `qpcr` command-line tool.

pub mod commands;
pub mod logging;
pub mod tables;
