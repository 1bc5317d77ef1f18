//! Seams through which the dashboard reaches the user: error notifications
//! and saved downloads.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Surfaces user-facing error messages
pub trait Notifier {
    fn notify_error(&mut self, message: &str);
}

/// Notifier that writes messages to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_error(&mut self, message: &str) {
        tracing::error!(notification = message, "User notification");
    }
}

/// Notifier that keeps every message, for tests and batch runs
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub messages: Vec<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_error(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Destination of downloaded report files
pub trait DownloadSink {
    /// Store `bytes` under `file_name`, returning where it was saved
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Saves downloads into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), size = bytes.len(), "Saved download");
        Ok(path)
    }
}

/// Keeps downloads in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub files: Vec<(String, Vec<u8>)>,
}

impl DownloadSink for MemorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}
