use std::path::Path;

use rusqlite::Connection;
use tracing::{info, warn};

use crate::db::{self, LoadCounts};
use crate::error::PipelineError;
use crate::extract::Listing;

/// Load a scraped CSV into the relational schema.
///
/// The header must equal the declared field set exactly; a mismatch is
/// systemic, so the whole load aborts with zero inserts. A row whose
/// values fail to parse is skipped with a warning.
pub fn load(conn: &Connection, path: &Path) -> Result<LoadCounts, PipelineError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    if headers.iter().ne(Listing::FIELDS) {
        return Err(PipelineError::SchemaMismatch(format!(
            "CSV header [{}] does not match expected columns [{}]",
            headers.iter().collect::<Vec<_>>().join(", "),
            Listing::FIELDS.join(", ")
        )));
    }

    let mut rows: Vec<Listing> = Vec::new();
    for (i, result) in reader.deserialize().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            // header is line 1, first data row is line 2
            Err(e) => warn!("Skipping line {}: {}", i + 2, e),
        }
    }
    info!("Read {} rows from {}", rows.len(), path.display());

    let counts = db::insert_listings(conn, &rows)?;
    info!(
        "Inserted {} brands, {} models, {} cars",
        counts.brands, counts.models, counts.cars
    );
    Ok(counts)
}

// ── Tests ──
