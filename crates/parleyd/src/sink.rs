//! Per-client session logs.
//!
//! One append-only file per peer address under the configured log
//! directory. Losing a single record is not a correctness issue, so append
//! failures are logged and swallowed; failing to open the file at all ends
//! the session.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to create log directory {0}: {1}")]
    DirUnavailable(PathBuf, std::io::Error),
    #[error("failed to open log file {0}: {1}")]
    LogUnavailable(PathBuf, std::io::Error),
}

/// Append-only record of one client's input lines.
#[derive(Debug)]
pub struct SessionLog {
    file: File,
    path: PathBuf,
}

impl SessionLog {
    /// Create the log directory if needed and open this peer's file for
    /// appending.
    pub fn open(dir: &Path, peer: &str) -> Result<Self, SinkError> {
        fs::create_dir_all(dir).map_err(|e| SinkError::DirUnavailable(dir.to_path_buf(), e))?;
        let path = dir.join(format!("{}.log", sanitize(peer)));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| SinkError::LogUnavailable(path.clone(), e))?;
        Ok(Self { file, path })
    }

    /// Record one input line with an RFC 3339 timestamp.
    pub fn append(&mut self, line: &str) {
        let stamp = Local::now().to_rfc3339_opts(SecondsFormat::Secs, false);
        if let Err(e) = writeln!(self.file, "{stamp}: {line}") {
            tracing::warn!(path = %self.path.display(), error = %e, "session log append failed");
        }
    }
}

/// Peer addresses contain colons, which are not valid in file names
/// everywhere; substitute underscores.
fn sanitize(peer: &str) -> String {
    peer.replace(':', "_")
}
