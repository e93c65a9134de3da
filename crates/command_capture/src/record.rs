use std::fmt;

use chrono::{DateTime, Local};

/// Timestamp layout of a transcript record, millisecond precision.
pub const RECORD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Which way a transcript line travelled relative to the child.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Direction {
    /// Sent to the child's stdin.
    In,
    /// Read from the child's stdout.
    Out,
    /// Read from the child's stderr.
    Err,
}

impl Direction {
    pub fn tag(self) -> &'static str {
        match self {
            Direction::In => "IN",
            Direction::Out => "OUT",
            Direction::Err => "ERR",
        }
    }

    /// Stream name used in diagnostic messages.
    pub fn stream_name(self) -> &'static str {
        match self {
            Direction::In => "stdin",
            Direction::Out => "stdout",
            Direction::Err => "stderr",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single transcript line.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub direction: Direction,
    pub line: String,
}

impl LogRecord {
    /// Builds a record from raw stream bytes stamped with the current local time.
    ///
    /// Invalid UTF-8 is replaced with U+FFFD and trailing whitespace (the line
    /// terminator included) is dropped.
    pub fn capture(direction: Direction, raw: &[u8]) -> Self {
        Self::at(Local::now(), direction, raw)
    }

    pub fn at(timestamp: DateTime<Local>, direction: Direction, raw: &[u8]) -> Self {
        let line = String::from_utf8_lossy(raw).trim_end().to_string();
        Self {
            timestamp,
            direction,
            line,
        }
    }

    /// Renders `[<timestamp>] <TAG>: <line>\n`.
    pub fn to_bytes(&self) -> Vec<u8> {
        format!("{self}\n").into_bytes()
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.timestamp.format(RECORD_TIMESTAMP_FORMAT),
            self.direction,
            self.line
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_time() -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn renders_tagged_timestamped_line() {
        let record = LogRecord::at(fixed_time(), Direction::Out, b"{\"a\":1}\n");
        assert_eq!(
            String::from_utf8(record.to_bytes()).unwrap(),
            "[2024-01-01 00:00:00.000] OUT: {\"a\":1}\n"
        );
    }

    #[test]
    fn strips_crlf_and_trailing_spaces() {
        let record = LogRecord::at(fixed_time(), Direction::In, b"ping  \r\n");
        assert_eq!(record.line, "ping");
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let record = LogRecord::at(fixed_time(), Direction::Err, b"bad \xff\xfe byte\n");
        assert_eq!(record.line, "bad \u{FFFD}\u{FFFD} byte");
        assert_eq!(record.to_string(), "[2024-01-01 00:00:00.000] ERR: bad \u{FFFD}\u{FFFD} byte");
    }

    #[test]
    fn tags_match_directions() {
        assert_eq!(Direction::In.tag(), "IN");
        assert_eq!(Direction::Out.tag(), "OUT");
        assert_eq!(Direction::Err.tag(), "ERR");
        assert_eq!(Direction::In.stream_name(), "stdin");
    }
}
