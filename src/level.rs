//! Severity thresholds and their textual names.

use log::LevelFilter;
use std::error::Error;
use std::fmt::Display;

/// The threshold a handle uses when its configured level could not be parsed.
pub const DEFAULT_THRESHOLD: LevelFilter = LevelFilter::Info;

/// The severity of a single message. This is [`log::Level`] extended with `Fatal`, which is
/// always written regardless of the handle's threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Severity {
    /// The label written in front of every message.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    /// Whether a message with this severity passes `threshold`.
    pub fn admitted_by(self, threshold: LevelFilter) -> bool {
        match self.as_log_level() {
            Some(level) => level <= threshold,
            None => true,
        }
    }

    /// The equivalent `log` crate level. `Fatal` has no equivalent.
    pub fn as_log_level(self) -> Option<log::Level> {
        match self {
            Severity::Trace => Some(log::Level::Trace),
            Severity::Debug => Some(log::Level::Debug),
            Severity::Info => Some(log::Level::Info),
            Severity::Warn => Some(log::Level::Warn),
            Severity::Error => Some(log::Level::Error),
            Severity::Fatal => None,
        }
    }
}

impl From<log::Level> for Severity {
    fn from(value: log::Level) -> Self {
        match value {
            log::Level::Trace => Severity::Trace,
            log::Level::Debug => Severity::Debug,
            log::Level::Info => Severity::Info,
            log::Level::Warn => Severity::Warn,
            log::Level::Error => Severity::Error,
        }
    }
}

/// Returned when a level name is not one of the recognized names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError {
    pub level: String,
}

impl Error for ParseLevelError {}

impl Display for ParseLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' is not a valid log level", self.level)
    }
}

/// Parse a level name into a threshold. Names are matched case-insensitively. `fatal` and `panic`
/// disable every non-fatal message, so they map to [`LevelFilter::Off`].
pub fn parse_level(level: &str) -> Result<LevelFilter, ParseLevelError> {
    let trimmed = level.trim();
    let threshold = if trimmed.eq_ignore_ascii_case("warning") {
        LevelFilter::Warn
    } else if trimmed.eq_ignore_ascii_case("fatal") || trimmed.eq_ignore_ascii_case("panic") {
        LevelFilter::Off
    } else {
        // `LevelFilter`'s own parser handles `off`, `error`, `warn`, `info`, `debug` and `trace`
        trimmed.parse::<LevelFilter>().map_err(|_| ParseLevelError {
            level: level.to_owned(),
        })?
    };

    Ok(threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_standard_names() {
        assert_eq!(parse_level("debug"), Ok(LevelFilter::Debug));
        assert_eq!(parse_level("info"), Ok(LevelFilter::Info));
        assert_eq!(parse_level("warn"), Ok(LevelFilter::Warn));
        assert_eq!(parse_level("error"), Ok(LevelFilter::Error));
        assert_eq!(parse_level("trace"), Ok(LevelFilter::Trace));
    }

    #[test]
    fn parses_aliases_and_case() {
        assert_eq!(parse_level("WARNING"), Ok(LevelFilter::Warn));
        assert_eq!(parse_level(" Info "), Ok(LevelFilter::Info));
        assert_eq!(parse_level("fatal"), Ok(LevelFilter::Off));
        assert_eq!(parse_level("panic"), Ok(LevelFilter::Off));
    }

    #[test]
    fn rejects_unknown_names() {
        let err = parse_level("loud").unwrap_err();
        assert_eq!(err.level, "loud");
        assert!(parse_level("").is_err());
    }

    #[test]
    fn labels_are_not_padded() {
        assert_eq!(Severity::Info.label(), "INFO");
        assert_eq!(Severity::Warn.label(), "WARN");
        assert_eq!(Severity::Fatal.label(), "FATAL");
    }

    #[test]
    fn fatal_ignores_threshold() {
        assert!(Severity::Fatal.admitted_by(LevelFilter::Off));
        assert!(!Severity::Info.admitted_by(LevelFilter::Warn));
        assert!(Severity::Warn.admitted_by(LevelFilter::Warn));
        assert!(Severity::Error.admitted_by(LevelFilter::Warn));
    }
}
