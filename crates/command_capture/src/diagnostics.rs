//! Operational logging for the capture tool itself.
//!
//! Messages go to `command-capture-<timestamp>.log` and, unless quiet, to stderr,
//! one line per event: `<timestamp> - <LEVEL> - <message>`. The transcript never
//! passes through here.

use std::{fmt, fs::OpenOptions, path::Path, sync::Mutex};

use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::CaptureError;

pub const DIAGNOSTIC_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// `<timestamp> - <LEVEL> - <message>` event layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagnosticFormat;

impl<S, N> FormatEvent<S, N> for DiagnosticFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format(DIAGNOSTIC_TIMESTAMP_FORMAT),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Installs the global diagnostic subscriber.
///
/// The level defaults to `info` and follows `RUST_LOG` when set.
pub fn init(diagnostics_path: &Path, quiet: bool) -> Result<(), CaptureError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diagnostics_path)
        .map_err(|err| {
            CaptureError::Diagnostics(format!(
                "cannot open `{}`: {err}",
                diagnostics_path.display()
            ))
        })?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .event_format(DiagnosticFormat);
    let console_layer = (!quiet).then(|| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .event_format(DiagnosticFormat)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|err| CaptureError::Diagnostics(err.to_string()))
}
