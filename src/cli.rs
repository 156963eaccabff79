use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, ValueEnum};
use encoding_rs::Encoding;
use log::LevelFilter;
use ndis2inf::convert::Dialect;
use ndis2inf::pci::PciId;

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct CliArgs {
    /// PCI vendor/device ID in hexadecimal, optionally with a display name,
    /// e.g. 10EC:8139:"Realtek 8139 PCI Fast Ethernet"
    #[arg(long = "id", value_name = "VEN:DEV[:NAME]", required = true)]
    pub ids: Vec<PciId>,

    #[command(flatten)]
    pub source: SourceArgs,

    /// Windows 9x INF output file
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    /// Code page of the output file
    #[arg(long, value_name = "LABEL", default_value = "windows-1252", value_parser = parse_encoding)]
    pub encoding: &'static Encoding,

    /// Use colors in diagnostic messages
    #[arg(long, value_name = "WHEN", value_enum, default_value_t = ColorOption::Auto)]
    pub color: ColorOption,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// NDIS2 driver OEMSETUP.INF file
    #[arg(long, value_name = "PATH")]
    pub inf: Option<PathBuf>,

    /// NDIS2 driver NIF file
    #[arg(long, value_name = "PATH")]
    pub nif: Option<PathBuf>,
}

impl SourceArgs {
    pub fn dialect_and_path(&self) -> Option<(Dialect, &Path)> {
        match (&self.inf, &self.nif) {
            (Some(path), _) => Some((Dialect::OemSetup, path.as_path())),
            (None, Some(path)) => Some((Dialect::Nif, path.as_path())),
            (None, None) => None,
        }
    }
}

impl CliArgs {
    pub fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Warn,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorOption {
    #[default]
    Auto,
    Always,
    Never,
}

impl From<ColorOption> for termcolor::ColorChoice {
    fn from(value: ColorOption) -> Self {
        match value {
            ColorOption::Auto => Self::Auto,
            ColorOption::Always => Self::Always,
            ColorOption::Never => Self::Never,
        }
    }
}

fn parse_encoding(label: &str) -> Result<&'static Encoding, String> {
    Encoding::for_label(label.as_bytes())
        .filter(|encoding| encoding.is_single_byte())
        .ok_or_else(|| format!("{label:?} is not a single-byte code page"))
}

/// Reconstructs the command line for the record kept in the output file.
pub fn command_line(args: impl IntoIterator<Item = OsString>) -> String {
    args.into_iter()
        .map(|arg| {
            let arg = arg.to_string_lossy().into_owned();
            if arg.is_empty() || arg.contains([' ', '\t', '"']) {
                format!("\"{}\"", arg.replace('"', "\\\""))
            } else {
                arg
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
