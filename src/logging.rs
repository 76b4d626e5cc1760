use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use chrono::Local;

static LOG_FILE_PATH: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Fixes the optional log file for the rest of the process. Later calls are ignored.
pub fn init_log_file(path: Option<PathBuf>) {
    let _ = LOG_FILE_PATH.set(path.filter(|path| !path.as_os_str().is_empty()));
}

pub fn resolve_log_file_path(raw: Option<&str>) -> Option<PathBuf> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    Some(PathBuf::from(raw))
}

pub(crate) fn format_log_line(scope: &str, message: &str) -> String {
    format!(
        "[{}] [{}] {}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        scope,
        message
    )
}

fn append_line_to_file(path: &Path, line: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|error| {
                format!("Failed to create log directory {}: {}", parent.display(), error)
            })?;
        }
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|error| format!("Failed to open log file {}: {}", path.display(), error))?;
    writeln!(file, "{line}")
        .map_err(|error| format!("Failed to write log file {}: {}", path.display(), error))
}

fn append_log(scope: &str, message: &str) {
    let line = format_log_line(scope, message);
    eprintln!("{line}");
    if let Some(Some(path)) = LOG_FILE_PATH.get() {
        // Logging must never take the process down.
        let _ = append_line_to_file(path, &line);
    }
}

pub fn append_build_log(message: &str) {
    append_log("build", message);
}

pub fn append_runtime_log(message: &str) {
    append_log("runtime", message);
}

pub fn append_shutdown_log(message: &str) {
    append_log("shutdown", message);
}
