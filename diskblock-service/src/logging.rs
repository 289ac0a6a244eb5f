// SPDX-License-Identifier: GPL-3.0-only

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::LogSettings;

const DEFAULT_DIRECTIVES: &str = "diskblock=info,warn";
const KEEP_DAYS: u64 = 7;
/// Date suffix the daily appender puts after `<prefix>.`
const ROTATION_DATE_FORMAT: &str = "%Y-%m-%d";

/// `[YYYY-MM-DD HH:MM:SS.mmm ]` in local time.
struct LogTimestamp;

impl FormatTime for LogTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", timestamp(&Local::now().naive_local()))
    }
}

fn timestamp(now: &NaiveDateTime) -> String {
    format!("[{} ]", now.format("%Y-%m-%d %H:%M:%S%.3f"))
}

/// `[YYYY-MM-DD HH:MM:SS.mmm ] <message>`, no colour, level or target.
///
/// launchd redirects stdout to a plain file, so escape codes stay off.
fn stdout_layer<S, W>(make_writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(make_writer)
        .with_timer(LogTimestamp)
        .with_level(false)
        .with_target(false)
        .with_ansi(false)
}

/// Install the global subscriber. The returned guard flushes the file writer
/// and must be held until the process exits.
pub(crate) fn init(settings: &LogSettings) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let stdout_layer = stdout_layer(std::io::stdout);

    let file = settings.file.as_deref().map(file_writer);

    match file {
        Some(Ok((writer, guard))) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_timer(LogTimestamp)
                .with_target(false)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .with(file_layer)
                .init();

            Some(guard)
        }
        Some(Err(e)) => {
            eprintln!("diskblock: failed to initialize file logging: {e:#}");
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .init();
            None
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stdout_layer)
                .init();
            None
        }
    }
}

fn file_writer(
    path: &Path,
) -> anyhow::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("invalid log file name: {}", path.display()))?;

    fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("create log directory {} failed: {e}", dir.display()))?;

    for expired in expired_logs(dir, prefix, Local::now().date_naive()) {
        if let Err(e) = fs::remove_file(&expired) {
            eprintln!("diskblock: failed to remove {}: {e}", expired.display());
        }
    }

    let appender = tracing_appender::rolling::daily(dir, prefix);
    Ok(tracing_appender::non_blocking(appender))
}

/// Date of a file the daily appender wrote for `prefix`, i.e. one named
/// exactly `<prefix>.<YYYY-MM-DD>`. Anything else is not ours.
fn rotation_date(file_name: &str, prefix: &str) -> Option<NaiveDate> {
    let date = file_name.strip_prefix(prefix)?.strip_prefix('.')?;
    NaiveDate::parse_from_str(date, ROTATION_DATE_FORMAT).ok()
}

/// Rotated logs in `dir` dated more than [`KEEP_DAYS`] before `today`.
fn expired_logs(dir: &Path, prefix: &str, today: NaiveDate) -> Vec<PathBuf> {
    let Some(cutoff) = today.checked_sub_days(Days::new(KEEP_DAYS)) else {
        return Vec::new();
    };
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .and_then(|name| rotation_date(name, prefix))
                .is_some_and(|date| date < cutoff)
        })
        .map(|entry| entry.path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[test]
    fn timestamp_matches_log_sink_format() {
        let now = NaiveDate::from_ymd_opt(2025, 7, 12)
            .and_then(|d| d.and_hms_milli_opt(9, 5, 3, 7))
            .expect("valid date");

        assert_eq!(timestamp(&now), "[2025-07-12 09:05:03.007 ]");
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("diskblock-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn rotation_date_requires_exact_log_name() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 12);

        assert_eq!(rotation_date("diskblock.log.2025-07-12", "diskblock.log"), date);
        assert_eq!(rotation_date("diskblock.log", "diskblock.log"), None);
        assert_eq!(rotation_date("diskblock.log.2025-07-12.bak", "diskblock.log"), None);
        assert_eq!(rotation_date("diskblock.logger.2025-07-12", "diskblock.log"), None);
        assert_eq!(rotation_date("notes-2024-taxes.pdf", "notes"), None);
    }

    #[test]
    fn only_old_rotated_logs_expire() {
        let dir = scratch_dir("expiry");
        for name in [
            "notes.2025-06-01",
            "notes.2025-07-10",
            "notes-2024-taxes.pdf",
            "notes.2020-01-01.bak",
            "notes",
        ] {
            fs::write(dir.join(name), "x").expect("write file");
        }
        fs::create_dir(dir.join("notes.2020-01-01")).expect("create dir");

        let today = NaiveDate::from_ymd_opt(2025, 7, 12).expect("valid date");
        let expired = expired_logs(&dir, "notes", today);

        assert_eq!(expired, vec![dir.join("notes.2025-06-01")]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn cutoff_keeps_the_last_week() {
        let dir = scratch_dir("cutoff");
        fs::write(dir.join("diskblock.log.2025-07-05"), "x").expect("write log");
        fs::write(dir.join("diskblock.log.2025-07-04"), "x").expect("write log");

        let today = NaiveDate::from_ymd_opt(2025, 7, 12).expect("valid date");
        let expired = expired_logs(&dir, "diskblock.log", today);

        assert_eq!(expired, vec![dir.join("diskblock.log.2025-07-04")]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("capture lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn stdout_lines_are_plain_timestamp_and_message() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber =
            tracing_subscriber::registry().with(stdout_layer(move || writer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("memory usage: 1.00 MB");
        });

        let bytes = captured.0.lock().expect("capture lock").clone();
        let line = String::from_utf8(bytes).expect("utf-8 output");
        assert!(!line.contains('\u{1b}'), "escape codes in {line:?}");

        let (stamp, message) = line
            .strip_prefix('[')
            .and_then(|rest| rest.split_once(" ] "))
            .expect("bracketed timestamp");
        assert!(NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S%.3f").is_ok());
        assert_eq!(message, "memory usage: 1.00 MB\n");
    }
}
