use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use ndis2inf::Inf;
use ndis2inf::convert;

use crate::cli::CliArgs;

mod cli;
mod logging;

/// cli entrypoint
fn main() -> ExitCode {
    let args = CliArgs::parse();

    if let Err(e) = logging::setup_logger(args.color, args.log_level()) {
        eprintln!("{}: error: {e:#}", env!("CARGO_BIN_NAME"));
        return ExitCode::FAILURE;
    }

    if let Err(e) = try_main(&args) {
        error!("{e:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main(args: &CliArgs) -> Result<()> {
    let (dialect, source_path) = args
        .source
        .dialect_and_path()
        .context("no source file given")?;

    let data = fs::read(source_path)
        .with_context(|| format!("{}: could not read source file", source_path.display()))?;
    let source = Inf::parse(&data).with_context(|| source_path.display().to_string())?;

    let command_line = cli::command_line(std::env::args_os());
    let output = convert::convert(&source, dialect, &args.ids, Some(command_line.as_str()))
        .with_context(|| source_path.display().to_string())?;

    let bytes = output
        .to_bytes(args.encoding)
        .with_context(|| format!("{}: cannot encode output", args.out.display()))?;
    write_atomically(&args.out, &bytes)?;

    info!("wrote {} for {} device ID(s)", args.out.display(), args.ids.len());
    Ok(())
}

/// Writes to a sibling temporary file first so a failed run never leaves a truncated INF.
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut temp_name = path
        .file_name()
        .with_context(|| format!("{}: output path has no file name", path.display()))?
        .to_owned();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, bytes)
        .with_context(|| format!("{}: could not write output file", temp_path.display()))?;

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e).with_context(|| format!("{}: could not write output file", path.display()));
    }

    Ok(())
}
