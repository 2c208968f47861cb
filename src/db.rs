use std::path::Path;

use rusqlite::Connection;

use crate::error::PipelineError;
use crate::extract::Listing;

pub fn connect(path: &Path) -> Result<Connection, PipelineError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<(), PipelineError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS car_brand (
            car_brand_id   INTEGER PRIMARY KEY,
            car_brand_name TEXT NOT NULL UNIQUE,
            created_at     TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at     TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS car_model (
            car_model_id   INTEGER PRIMARY KEY,
            car_model_name TEXT NOT NULL,
            car_brand_id   INTEGER NOT NULL
                           REFERENCES car_brand(car_brand_id) ON DELETE CASCADE,
            created_at     TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at     TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(car_model_name, car_brand_id)
        );
        CREATE INDEX IF NOT EXISTS idx_car_model_brand ON car_model(car_brand_id);

        CREATE TABLE IF NOT EXISTS car_info (
            car_info_id           INTEGER PRIMARY KEY,
            car_model_id          INTEGER NOT NULL
                                  REFERENCES car_model(car_model_id) ON DELETE CASCADE,
            car_price             REAL NOT NULL,
            car_manufactured_year INTEGER NOT NULL,
            car_mileage           TEXT NOT NULL,
            UNIQUE(car_model_id, car_price, car_manufactured_year, car_mileage)
        );
        CREATE INDEX IF NOT EXISTS idx_car_info_model ON car_info(car_model_id);
        ",
    )?;
    Ok(())
}

/// Rows actually inserted by one load; duplicates fall out of the
/// unique constraints and are not counted.
#[derive(Debug)]
pub struct LoadCounts {
    pub brands: usize,
    pub models: usize,
    pub cars: usize,
}

/// Insert listings normalized into brand / model / info tables.
/// Prepared statements inside a single transaction.
pub fn insert_listings(conn: &Connection, rows: &[Listing]) -> Result<LoadCounts, PipelineError> {
    let tx = conn.unchecked_transaction()?;
    let mut counts = LoadCounts {
        brands: 0,
        models: 0,
        cars: 0,
    };
    {
        let mut brand_stmt =
            tx.prepare("INSERT OR IGNORE INTO car_brand (car_brand_name) VALUES (?1)")?;
        let mut brand_id_stmt =
            tx.prepare("SELECT car_brand_id FROM car_brand WHERE car_brand_name = ?1")?;
        let mut model_stmt = tx.prepare(
            "INSERT OR IGNORE INTO car_model (car_model_name, car_brand_id) VALUES (?1, ?2)",
        )?;
        let mut model_id_stmt = tx.prepare(
            "SELECT car_model_id FROM car_model
             WHERE car_model_name = ?1 AND car_brand_id = ?2",
        )?;
        let mut car_stmt = tx.prepare(
            "INSERT OR IGNORE INTO car_info
             (car_model_id, car_price, car_manufactured_year, car_mileage)
             VALUES (?1, ?2, ?3, ?4)",
        )?;

        for row in rows {
            counts.brands += brand_stmt.execute([&row.brand_name])?;
            let brand_id: i64 = brand_id_stmt.query_row([&row.brand_name], |r| r.get(0))?;

            counts.models += model_stmt.execute(rusqlite::params![row.model_name, brand_id])?;
            let model_id: i64 = model_id_stmt
                .query_row(rusqlite::params![row.model_name, brand_id], |r| r.get(0))?;

            counts.cars += car_stmt.execute(rusqlite::params![
                model_id,
                row.price,
                row.manufactured_year,
                row.mileage
            ])?;
        }
    }
    tx.commit()?;
    Ok(counts)
}

// ── Stats ──

pub struct Stats {
    pub brands: usize,
    pub models: usize,
    pub cars: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats, PipelineError> {
    let brands: usize = conn.query_row("SELECT COUNT(*) FROM car_brand", [], |r| r.get(0))?;
    let models: usize = conn.query_row("SELECT COUNT(*) FROM car_model", [], |r| r.get(0))?;
    let cars: usize = conn.query_row("SELECT COUNT(*) FROM car_info", [], |r| r.get(0))?;
    Ok(Stats {
        brands,
        models,
        cars,
    })
}

// ── Tests ──
