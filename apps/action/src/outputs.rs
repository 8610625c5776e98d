//! Action outputs and workflow commands.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::info;

/// Destination for action outputs.
pub trait OutputSink {
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()>;

    fn set_multiline_output(&mut self, name: &str, value: &str) -> io::Result<()>;
}

/// Appends outputs to the file the runner names in `GITHUB_OUTPUT`.
#[derive(Debug, Clone)]
pub struct GithubOutputFile {
    path: PathBuf,
}

impl GithubOutputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `GITHUB_OUTPUT` when the runner provides it.
    pub fn from_env() -> Option<Self> {
        std::env::var_os("GITHUB_OUTPUT")
            .filter(|p| !p.is_empty())
            .map(Self::new)
    }

    fn append(&self, text: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(text.as_bytes())
    }
}

impl OutputSink for GithubOutputFile {
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        if value.contains('\n') {
            return self.set_multiline_output(name, value);
        }
        self.append(&format!("{name}={value}\n"))
    }

    fn set_multiline_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        let delimiter = uuid::Uuid::new_v4();
        self.append(&format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
    }
}

/// Logs outputs when no output file is available.
#[derive(Debug, Default)]
pub struct LogOutputs;

impl OutputSink for LogOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        info!(output = name, value, "output");
        Ok(())
    }

    fn set_multiline_output(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.set_output(name, value)
    }
}

/// Formats a workflow command such as `::error::message`.
///
/// Data is escaped so multi-line messages stay one command.
pub fn workflow_command(command: &str, data: &str) -> String {
    let escaped = data
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::{command}::{escaped}")
}
