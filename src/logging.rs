use crate::error::Result;
use env_logger::{Builder, Env, Target};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

// Rotate once the log passes 5 MB, keeping three old files
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
const MAX_ROTATED_LOGS: usize = 3;

fn rotated_path(log_file_path: &Path, index: usize) -> PathBuf {
    let mut name = log_file_path.as_os_str().to_owned();
    name.push(format!(".{index}"));
    PathBuf::from(name)
}

/// Shift `clinic.log` to `clinic.log.1`, `.1` to `.2` and so on once the
/// current file is too large. The oldest file falls off the end.
fn rotate_logs_if_needed(log_file_path: &Path) -> Result<()> {
    let too_large = fs::metadata(log_file_path)
        .map(|m| m.len() > MAX_LOG_SIZE)
        .unwrap_or(false);
    if !too_large {
        return Ok(());
    }

    // Drop the oldest rotated log
    fs::remove_file(rotated_path(log_file_path, MAX_ROTATED_LOGS)).ok();

    // Shift existing rotated logs
    for i in (1..MAX_ROTATED_LOGS).rev() {
        let from = rotated_path(log_file_path, i);
        if from.exists() {
            fs::rename(&from, rotated_path(log_file_path, i + 1)).ok();
        }
    }

    // Current log becomes .1
    fs::rename(log_file_path, rotated_path(log_file_path, 1))?;

    Ok(())
}

/// Send log records to `log_file_path`, and to stderr as well when `echo` is set.
///
/// The level comes from `RUST_LOG`, defaulting to `info`.
pub fn init_logging(log_file_path: &Path, echo: bool) -> Result<()> {
    // Rotate logs if needed before opening
    rotate_logs_if_needed(log_file_path)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    // Store the file handle globally
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(log_file);
    }

    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.target(Target::Stderr);
    builder.format(move |buf, record| {
        let formatted = format!(
            "[{}] {} {}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        );

        if echo {
            writeln!(buf, "{formatted}")?;
        }

        // Always write to file
        if let Ok(mut guard) = LOG_FILE.lock() {
            if let Some(ref mut file) = *guard {
                writeln!(file, "{formatted}").ok();
                file.flush().ok();
            }
        }

        Ok(())
    });

    // A logger may already be installed, e.g. in tests
    builder.try_init().ok();

    Ok(())
}
