use std::io::{IsTerminal, Write};

use log::{Level, LevelFilter};
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

use crate::cli::ColorOption;

struct CliLogger {
    stdout: BufferWriter,
    stderr: BufferWriter,
}

impl log::Log for CliLogger {
    #[inline]
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if record.args().as_str().is_some_and(str::is_empty) {
            return;
        }

        let writer = if record.level() <= Level::Warn {
            &self.stderr
        } else {
            &self.stdout
        };

        let (label, color) = match record.level() {
            Level::Error => ("error:", Color::Red),
            Level::Warn => ("warn:", Color::Yellow),
            Level::Info => ("info:", Color::Green),
            Level::Debug => ("debug:", Color::White),
            Level::Trace => ("trace:", Color::Blue),
        };

        // Nothing sensible can be done when the console itself fails.
        let mut buffer = writer.buffer();
        let _ = write!(buffer, "{}: ", env!("CARGO_BIN_NAME"));
        let _ = buffer.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(buffer, "{label}");
        let _ = buffer.reset();
        let _ = writeln!(buffer, " {}", record.args());
        let _ = writer.print(&buffer);
    }

    fn flush(&self) {}
}

/// Sets up logging for the cli
pub fn setup_logger(color: ColorOption, max_level: LevelFilter) -> anyhow::Result<()> {
    let color_choice = if color == ColorOption::Auto
        && (std::env::var("TERM").is_ok_and(|term| term.eq_ignore_ascii_case("dumb"))
            || std::env::var_os("NO_COLOR").is_some())
    {
        ColorChoice::Never
    } else {
        color.into()
    };

    let stream_choice = |is_terminal: bool| {
        if color_choice == ColorChoice::Auto && !is_terminal {
            ColorChoice::Never
        } else {
            color_choice
        }
    };

    log::set_boxed_logger(Box::new(CliLogger {
        stdout: BufferWriter::stdout(stream_choice(std::io::stdout().is_terminal())),
        stderr: BufferWriter::stderr(stream_choice(std::io::stderr().is_terminal())),
    }))?;
    log::set_max_level(max_level);

    Ok(())
}
