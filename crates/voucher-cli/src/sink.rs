use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use voucher_core::Code;

/// Header line written before the codes in CSV output.
pub const CSV_HEADER: &str = "codes";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write codes to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How accepted codes are laid out in the output artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One code per line.
    Plain,
    /// A `codes` header line, then one code per line.
    Csv,
}

impl OutputFormat {
    /// Picks CSV for a `.csv` extension (any case) and plain text otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Plain,
        }
    }

    pub fn header(self) -> Option<&'static str> {
        match self {
            OutputFormat::Plain => None,
            OutputFormat::Csv => Some(CSV_HEADER),
        }
    }

    pub fn render(self, codes: &[Code]) -> String {
        let width = codes.first().map_or(0, |code| code.as_str().len() + 1);
        let mut out = String::with_capacity(width * (codes.len() + 1));
        if let Some(header) = self.header() {
            out.push_str(header);
            out.push('\n');
        }
        for code in codes {
            out.push_str(code.as_str());
            out.push('\n');
        }
        out
    }
}

/// Receives the finished sequence of codes once a run has succeeded.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Persists `codes`, returning how many were written.
    async fn write(&self, codes: &[Code]) -> Result<usize, SinkError>;
}

/// Writes codes to a file, replacing any previous content.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    format: OutputFormat,
}

impl FileSink {
    /// Creates a sink whose format is inferred from the path's extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = OutputFormat::from_path(&path);
        Self { path, format }
    }

    pub fn with_format(path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

#[async_trait]
impl ResultSink for FileSink {
    async fn write(&self, codes: &[Code]) -> Result<usize, SinkError> {
        let body = self.format.render(codes);
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|source| SinkError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), count = codes.len(), format = ?self.format, "codes written");
        Ok(codes.len())
    }
}
