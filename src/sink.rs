use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use tracing::info;

use crate::error::PipelineError;
use crate::extract::Listing;

/// Accumulates listings in memory and writes them out once at the end
/// of the run. Volumes are a few hundred rows, so no streaming writes.
pub struct CsvSink {
    path: PathBuf,
    rows: Vec<Listing>,
}

impl CsvSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            rows: Vec::new(),
        }
    }

    pub fn append(&mut self, records: impl IntoIterator<Item = Listing>) {
        self.rows.extend(records);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the header line plus one line per record. The header is
    /// written even when no records were collected. Returns the row
    /// count.
    pub fn flush(&self) -> Result<usize, PipelineError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        writer.write_record(Listing::FIELDS)?;
        for row in &self.rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        info!("Wrote {} records to {}", self.rows.len(), self.path.display());
        Ok(self.rows.len())
    }
}

// ── Tests ──
