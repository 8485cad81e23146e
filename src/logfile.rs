use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::utils::error::Result;

const IN_STOCK_FILE: &str = "in_stock.txt";
const CHECK_LOG_FILE: &str = "check_log.txt";
const ERROR_FILE: &str = "error.txt";

/// Append-only run journal: one timestamped line per terminal outcome.
/// Purely observational; nothing here is ever read back.
pub struct RunLog {
    dir: PathBuf,
}

impl RunLog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn in_stock(&self, line: &str) {
        self.append(IN_STOCK_FILE, line);
    }

    pub fn check(&self, line: &str) {
        self.append(CHECK_LOG_FILE, line);
    }

    pub fn error(&self, line: &str) {
        self.append(ERROR_FILE, line);
    }

    /// Log writes never fail the run; a journal miss is only a warning.
    fn append(&self, file: &str, line: &str) {
        if let Err(e) = self.try_append(&self.dir.join(file), line) {
            warn!(file, error = %e, "Failed to append run log line");
        }
    }

    fn try_append(&self, path: &Path, line: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{} {}", Utc::now().to_rfc3339(), line)?;
        Ok(())
    }
}
