use anyhow::Result;
use chrono::{DateTime, Local};
use flexi_logger::{
    style, AdaptiveFormat, Age, Cleanup, Criterion, DeferredNow, Duplicate, Logger, Naming, Record,
};
use std::path::Path;

pub use flexi_logger::LoggerHandle;

/// Levels for crates that are too chatty at the default level.
pub const DEFAULT_MODULE_OVERRIDES: &str = "actix_server=info,actix_web::middleware::logger=info";

/// Rotated log files are kept up to this size.
const MAX_LOG_FILE_SIZE: u64 = 256 * 1024 * 1024;

// local time with offset and milliseconds: 2026-02-01T07:56:22.348+03:00
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

fn timestamp(now: &mut DeferredNow) -> String {
    DateTime::<Local>::from(*now.now())
        .format(DATE_FORMAT)
        .to_string()
}

fn plain_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    write!(
        w,
        "[{} {:5} {}] {}",
        timestamp(now),
        record.level(),
        record.module_path().unwrap_or("<unnamed>"),
        record.args()
    )
}

fn colored_format(
    w: &mut dyn std::io::Write,
    now: &mut DeferredNow,
    record: &Record,
) -> Result<(), std::io::Error> {
    let level = record.level();
    let grey = yansi::Color::Fixed(247);
    write!(
        w,
        "[{} {:5} {}] {}",
        grey.paint(timestamp(now)),
        style(level, level),
        grey.paint(record.module_path().unwrap_or("<unnamed>")),
        record.args()
    )
}

/// Log specification handed to flexi_logger when `RUST_LOG` is not set.
///
/// `force_debug` raises the default level only, per-module overrides stay.
pub fn log_spec(default_level: &str, module_overrides: &str, force_debug: bool) -> String {
    let level = if force_debug { "debug" } else { default_level };
    if module_overrides.is_empty() {
        level.to_string()
    } else {
        format!("{},{}", module_overrides, level)
    }
}

/// Starts the process logger.
///
/// Records go to stderr (colored on terminals). With `log_dir` they are also
/// written to daily rotated files there, compressed after rotation.
pub fn start_logger(
    default_level: &str,
    log_dir: Option<&Path>,
    module_overrides: &str,
    force_debug: bool,
) -> Result<LoggerHandle> {
    let spec = log_spec(default_level, module_overrides, force_debug);
    let mut logger = Logger::with_env_or_str(spec).format(plain_format);

    if let Some(log_dir) = log_dir {
        logger = logger
            .log_to_file()
            .directory(log_dir)
            .rotate(
                Criterion::AgeOrSize(Age::Day, MAX_LOG_FILE_SIZE),
                Naming::Timestamps,
                Cleanup::KeepLogAndCompressedFiles(1, 10),
            )
            .print_message()
            .duplicate_to_stderr(Duplicate::All);
    }

    let handle = logger
        .adaptive_format_for_stderr(AdaptiveFormat::Custom(plain_format, colored_format))
        .set_palette("9;11;2;7;8".to_string())
        .start()?;
    Ok(handle)
}
