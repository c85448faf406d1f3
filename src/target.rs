//! The output targets a handle writes its messages to.

use std::fmt::Debug;
use std::fs::{DirBuilder, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::level::Severity;

/// An opened log file, optionally mirrored to STDOUT.
pub enum OutputTarget {
    /// Writes only to the log file.
    File(File),
    /// Writes to the log file and then to STDOUT. STDOUT may use colors depending on the
    /// environment.
    FileAndStdout(File, StandardStream),
}

impl Debug for OutputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputTarget::File(file) => f.debug_tuple("File").field(file).finish(),
            OutputTarget::FileAndStdout(file, stdout) => f
                .debug_tuple("FileAndStdout")
                .field(file)
                .field(if stdout.supports_color() {
                    &"<stdout stream with color support>"
                } else {
                    &"<stdout stream>"
                })
                .finish(),
        }
    }
}

impl OutputTarget {
    /// Open `path` for appending, creating it if it does not exist yet. Existing contents are
    /// never truncated.
    pub fn new_file_path<P: AsRef<Path>>(path: P, mirror_stdout: bool) -> std::io::Result<Self> {
        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o666);
        }
        let file = options.open(path)?;

        Ok(if mirror_stdout {
            Self::FileAndStdout(file, StandardStream::stdout(color_support(atty::Stream::Stdout)))
        } else {
            Self::File(file)
        })
    }

    /// Write a single formatted line. The file receives the line in a single write. If that write
    /// fails then nothing is written to STDOUT either.
    pub fn write_line(
        &mut self,
        timestamp: &str,
        severity: Severity,
        name: &str,
        message: &str,
    ) -> std::io::Result<()> {
        let line = format!("{timestamp} [{}] {name}: {message}\n", severity.label());
        match self {
            OutputTarget::File(file) => file.write_all(line.as_bytes()),
            OutputTarget::FileAndStdout(file, stdout) => {
                file.write_all(line.as_bytes())?;

                write!(stdout, "{timestamp} [")?;
                stdout.set_color(&severity_color(severity))?;
                write!(stdout, "{}", severity.label())?;
                stdout.reset()?;
                writeln!(stdout, "] {name}: {message}")?;
                stdout.flush()
            }
        }
    }

    /// Flush the file and, when mirroring, STDOUT.
    pub fn flush(&mut self) -> std::io::Result<()> {
        match self {
            OutputTarget::File(file) => file.flush(),
            OutputTarget::FileAndStdout(file, stdout) => {
                file.flush()?;
                stdout.flush()
            }
        }
    }
}

/// Recursively create `directory` with permissions open to everyone, subject to the umask.
pub fn create_directory(directory: &Path) -> std::io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }

    builder.create(directory)
}

fn severity_color(severity: Severity) -> ColorSpec {
    let mut spec = ColorSpec::new();
    match severity {
        Severity::Trace | Severity::Debug => spec.set_fg(Some(Color::Cyan)),
        Severity::Info => spec.set_fg(Some(Color::Green)),
        Severity::Warn => spec.set_fg(Some(Color::Yellow)),
        Severity::Error => spec.set_fg(Some(Color::Red)),
        Severity::Fatal => spec.set_fg(Some(Color::Red)).set_bold(true),
    };

    spec
}

/// Whether to use colors when writing to `stream`. Considers the `CLICOLOR`, `CLICOLOR_FORCE`, and
/// `NO_COLOR` environment variables, and whether or not the stream is attached to a real TTY.
fn color_support(stream: atty::Stream) -> ColorChoice {
    if let Ok(value) = std::env::var("CLICOLOR_FORCE") {
        if value.trim() != "0" {
            return ColorChoice::Always;
        }
    }

    if let Ok(value) = std::env::var("NO_COLOR") {
        if value.trim() != "0" {
            return ColorChoice::Never;
        }
    }

    if let Ok(value) = std::env::var("CLICOLOR") {
        if value.trim() == "0" {
            return ColorChoice::Never;
        }
    }

    if atty::is(stream) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}
