//! Core library for the twofa authentication agent
//!
//! This crate provides HOTP/TOTP code generation and the plain-text
//! keychain store that holds named secrets and per-key counters.

pub mod error;
pub mod types;

pub mod config;
pub mod keychain;
pub mod otp;

use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Environment variable selecting the log level (e.g. `debug`)
pub const LOG_ENV: &str = "TWOFA_LOG";

/// Prefix of every diagnostic written to stderr
pub const DIAGNOSTIC_PREFIX: &str = "2fa: ";

/// Initialize logging infrastructure
///
/// Logs to the systemd journal only when stderr itself is the journal
/// stream, otherwise to stderr as `2fa: <message>` lines. Diagnostics
/// default to WARN so skipped keychain lines are visible without
/// drowning the code output.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::WARN);

    #[cfg(target_os = "linux")]
    {
        if stderr_is_journal() {
            // No journald socket: fall through to plain stderr
            if let Ok(journal_layer) = tracing_journald::layer() {
                tracing_subscriber::registry()
                    .with(journal_layer)
                    .with(level)
                    .init();
                return Ok(());
            }
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(DiagnosticFormat)
                .with_writer(std::io::stderr),
        )
        .with(level)
        .init();

    Ok(())
}

/// Renders events as `2fa: <message>` lines
struct DiagnosticFormat;

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
    ) -> std::fmt::Result {
        write!(writer, "{}", DIAGNOSTIC_PREFIX)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Whether stderr is connected to the journal, per `JOURNAL_STREAM`
///
/// systemd sets the variable to the `<device>:<inode>` of the stream it
/// hands to a service; child processes inherit it even when their stderr
/// has been redirected elsewhere, e.g. to a terminal.
#[cfg(target_os = "linux")]
fn stderr_is_journal() -> bool {
    use std::os::fd::AsFd;
    use std::os::unix::fs::MetadataExt;

    let Some(stream) = std::env::var_os("JOURNAL_STREAM") else {
        return false;
    };
    let Ok(metadata) = std::io::stderr()
        .as_fd()
        .try_clone_to_owned()
        .map(std::fs::File::from)
        .and_then(|file| file.metadata())
    else {
        return false;
    };
    journal_stream_matches(&stream.to_string_lossy(), metadata.dev(), metadata.ino())
}

#[cfg(target_os = "linux")]
fn journal_stream_matches(value: &str, dev: u64, ino: u64) -> bool {
    let Some((stream_dev, stream_ino)) = value.split_once(':') else {
        return false;
    };
    stream_dev.parse::<u64>() == Ok(dev) && stream_ino.parse::<u64>() == Ok(ino)
}
