//! Database schema definitions and migrations
//!
//! This module contains the SQL schema for the episode store.

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Every episode ever discovered, keyed by its audio URL
CREATE TABLE IF NOT EXISTS episodes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    pub_date TEXT NOT NULL,
    title TEXT NOT NULL,
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_episodes_pub_date ON episodes(pub_date);
"#;

/// Initializes the database schema
///
/// Databases written by the notes-less variant of the scraper have an
/// `episodes` table without a `notes` column; it is added in place.
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;

    if !has_column(conn, "episodes", "notes")? {
        tracing::info!("Upgrading episodes table with a notes column");
        conn.execute_batch("ALTER TABLE episodes ADD COLUMN notes TEXT;")?;
    }

    Ok(())
}

/// Checks whether `table` has a column named `column`
fn has_column(conn: &Connection, table: &str, column: &str) -> Result<bool, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names.iter().any(|name| name == column))
}
