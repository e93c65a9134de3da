#![forbid(unsafe_code)]
//! Pretty-prints JSON payloads in `command-capture` transcripts.
//!
//! Lines of the form `[<YYYY-MM-DD HH:MM:SS.mmm>] IN: <json>` or `... OUT: <json>` have
//! their payload re-rendered with two-space indentation; continuation lines are indented
//! two more spaces so the block stays visually attached to its record. Every other line
//! (including `ERR` records and payloads that are not JSON) passes through unchanged.

mod error;

use std::{
    borrow::Cow,
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use regex::Regex;
use serde_json::Value;

pub use error::FormatError;

/// Prefix (timestamp and tag) in group 1, payload in group 2.
pub const RECORD_PATTERN: &str =
    r"^(\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3}\] (?:IN|OUT): )(.+)";

fn record_regex() -> &'static Regex {
    static RECORD: OnceLock<Regex> = OnceLock::new();
    RECORD.get_or_init(|| Regex::new(RECORD_PATTERN).expect("record pattern is valid"))
}

/// Reformats a single line. `line` may carry its trailing newline; the result of a
/// reformatted line always ends with one.
pub fn format_line(line: &str) -> Cow<'_, str> {
    let Some(captures) = record_regex().captures(line) else {
        return Cow::Borrowed(line);
    };
    let (Some(prefix), Some(payload)) = (captures.get(1), captures.get(2)) else {
        return Cow::Borrowed(line);
    };

    let Ok(value) = serde_json::from_str::<Value>(payload.as_str()) else {
        return Cow::Borrowed(line);
    };
    let Ok(pretty) = serde_json::to_string_pretty(&value) else {
        return Cow::Borrowed(line);
    };

    Cow::Owned(format!(
        "{}{}\n",
        prefix.as_str(),
        pretty.replace('\n', "\n  ")
    ))
}

/// Reformats a whole transcript, line by line.
pub fn format_log(contents: &str) -> String {
    let mut formatted = String::with_capacity(contents.len());
    for line in contents.split_inclusive('\n') {
        formatted.push_str(&format_line(line));
    }
    formatted
}

/// Where [`format_file`] sends its result.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormatTarget {
    File(PathBuf),
    Stdout,
}

impl FormatTarget {
    /// `<stem>_formatted<.ext>` beside `input` when it has an extension, stdout otherwise.
    pub fn default_for(input: &Path) -> Self {
        match (input.file_stem(), input.extension()) {
            (Some(stem), Some(extension)) => {
                let mut name = stem.to_os_string();
                name.push("_formatted.");
                name.push(extension);
                FormatTarget::File(input.with_file_name(name))
            }
            _ => FormatTarget::Stdout,
        }
    }
}

/// Reads `input`, reformats it, and returns the text for the caller to emit, or writes
/// it to the target file and returns `None`.
pub fn format_file(input: &Path, target: &FormatTarget) -> Result<Option<String>, FormatError> {
    if !input.exists() {
        return Err(FormatError::MissingInput {
            path: input.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(input).map_err(|source| FormatError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let formatted = format_log(&contents);

    match target {
        FormatTarget::File(path) => {
            fs::write(path, formatted).map_err(|source| FormatError::Write {
                path: path.clone(),
                source,
            })?;
            Ok(None)
        }
        FormatTarget::Stdout => Ok(Some(formatted)),
    }
}
