//! qPCR plate analysis CLI.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;

use qpcr_cli::commands::{
    ReportRequest, apply_report_request, load_session, load_settings, run_export, run_prefs,
    run_summary,
};
use qpcr_cli::logging::{LogConfig, LogFormat, init_logging};
use qpcr_cli::tables::{channels_table, settings_table, thresholds_table, wells_table};
use qpcr_report::{
    ReportKind, channels_report, render_report, thresholds_report, wells_report,
};

mod cli;

use crate::cli::{Cli, Command, ExportArgs, LogFormatArg, LogLevelArg, ReportArgs};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let prefs = cli.prefs.as_deref();
    let outcome = match &cli.command {
        Command::Summary(args) => load_session(&args.file, prefs)
            .and_then(|session| run_summary(&session))
            .map(|lines| {
                for line in lines {
                    println!("{line}");
                }
            }),
        Command::Report(args) => run_report(args, &cli),
        Command::Export(args) => run_export_command(args, &cli),
        Command::Prefs(args) => {
            run_prefs(&load_settings(prefs), args.file.as_deref()).map(|entries| {
                println!("{}", settings_table(&entries));
            })
        }
    };
    let exit_code = match outcome {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run_report(args: &ReportArgs, cli: &Cli) -> Result<()> {
    let mut session = load_session(&args.file, cli.prefs.as_deref())?;
    let request = ReportRequest {
        kind: args.kind.into(),
        channels: args.channels.clone(),
        wells: args.wells.clone(),
        thresholds: args.thresholds.clone(),
    };
    apply_report_request(&mut session, &request)?;
    if args.plain {
        println!("{}", render_report(&session, request.kind)?);
        return Ok(());
    }
    let table = match request.kind {
        ReportKind::Wells => wells_table(&wells_report(&session)?),
        ReportKind::Channels => channels_table(&channels_report(&session)),
        ReportKind::Thresholds => thresholds_table(&thresholds_report(&session)),
    };
    println!("{table}");
    println!("{}", session.status_text());
    Ok(())
}

fn run_export_command(args: &ExportArgs, cli: &Cli) -> Result<()> {
    let session = load_session(&args.file, cli.prefs.as_deref())?;
    let written = run_export(&session, &args.output, !args.no_comments)?;
    println!(
        "Wrote {written} channel tables to {}",
        args.output.display()
    );
    Ok(())
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
