//! Database Connection and Setup
//!
//! Manages the SQLite database connection and migrations.

use libsql::{Builder, Connection, Database};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Database state wrapper
pub struct DbState {
    db: Mutex<Option<Database>>,
    conn: Mutex<Option<Connection>>,
}

impl DbState {
    pub fn new() -> Self {
        Self {
            db: Mutex::new(None),
            conn: Mutex::new(None),
        }
    }

    /// Get a connection, initializing if necessary
    pub async fn get_connection(&self) -> Result<Connection, String> {
        let guard = self.conn.lock().await;
        if let Some(conn) = &*guard {
            return Ok(conn.clone());
        }
        Err("Database not initialized".to_string())
    }
}

impl Default for DbState {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize database with path
pub async fn init_db(db_path: &PathBuf) -> Result<DbState, String> {
    let db_path_str = db_path.to_str().ok_or("Invalid DB path")?;

    let db = Builder::new_local(db_path_str)
        .build()
        .await
        .map_err(|e| format!("Failed to build db: {}", e))?;

    let conn = db.connect().map_err(|e| format!("Failed to connect: {}", e))?;

    // Run migrations
    run_migrations(&conn).await?;

    let state = DbState::new();
    *state.db.lock().await = Some(db);
    *state.conn.lock().await = Some(conn);

    Ok(state)
}

/// Check if a column exists in a table
async fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    if let Ok(mut rows) = conn.query(&query, ()).await {
        while let Ok(Some(row)) = rows.next().await {
            if let Ok(name) = row.get::<String>(1) {
                if name == column {
                    return true;
                }
            }
        }
    }
    false
}

/// Run database migrations
async fn run_migrations(conn: &Connection) -> Result<(), String> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS boards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at INTEGER
        )",
        (),
    )
    .await
    .map_err(|e| e.to_string())?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS columns (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            board_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            label TEXT NOT NULL,
            terminal INTEGER NOT NULL DEFAULT 0,
            position INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )
    .await
    .map_err(|e| e.to_string())?;

    // Card positions are REAL: fractional keys let a move update one row
    conn.execute(
        "CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            board_id INTEGER NOT NULL,
            column_id INTEGER NOT NULL,
            label TEXT NOT NULL,
            position REAL NOT NULL DEFAULT 1000.0,
            title TEXT NOT NULL,
            description TEXT,
            due_at INTEGER,
            created_at INTEGER,
            updated_at INTEGER
        )",
        (),
    )
    .await
    .map_err(|e| e.to_string())?;

    // Added after the initial schema shipped
    if !column_exists(conn, "cards", "assignee").await {
        conn.execute("ALTER TABLE cards ADD COLUMN assignee TEXT", ())
            .await
            .map_err(|e| format!("Failed to add assignee: {}", e))?;
    }

    // Indexes for the per-column card listings
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_cards_column ON cards(column_id)",
        (),
    )
    .await
    .map_err(|e| e.to_string())?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_columns_board ON columns(board_id)",
        (),
    )
    .await
    .map_err(|e| e.to_string())?;

    Ok(())
}
