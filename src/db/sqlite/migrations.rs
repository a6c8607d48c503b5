//! SQLite database migrations

use crate::error::Result;
use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    run_migration(conn, "001_settings", CREATE_SETTINGS_TABLE)?;
    run_migration(conn, "002_display_settings", ADD_DISPLAY_SETTINGS)?;

    tracing::info!("Database migrations completed");
    Ok(())
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE name = ?)",
        [name],
        |row| row.get(0),
    )?;

    if !exists {
        tracing::info!("Running migration: {}", name);
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO migrations (name) VALUES (?)", [name])?;
    }

    Ok(())
}

const CREATE_SETTINGS_TABLE: &str = r#"
CREATE TABLE settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    api_base_url TEXT NOT NULL DEFAULT 'http://localhost:3000',
    staleness_threshold_hours REAL NOT NULL DEFAULT 6.0,
    bgn_per_eur REAL NOT NULL DEFAULT 1.96,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
INSERT OR IGNORE INTO settings (id) VALUES (1);
"#;

const ADD_DISPLAY_SETTINGS: &str = r#"
ALTER TABLE settings ADD COLUMN display_currency TEXT NOT NULL DEFAULT 'EUR';
ALTER TABLE settings ADD COLUMN history_days INTEGER NOT NULL DEFAULT 30;
"#;
