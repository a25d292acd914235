use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only record of received commands
pub trait CommandLog: Send {
    fn record(&mut self, utterance: &str) -> Result<()>;
}

/// Writes `YYYY-MM-DD HH:MM:SS: <utterance>` lines to a text file
#[derive(Debug, Clone)]
pub struct FileCommandLog {
    path: PathBuf,
}

impl FileCommandLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommandLog for FileCommandLog {
    fn record(&mut self, utterance: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        writeln!(
            file,
            "{}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            utterance
        )?;
        Ok(())
    }
}
