//! Database migrations

use crate::error::Result;
use libsql::Connection;

/// Current schema version
const CURRENT_VERSION: i32 = 1;

/// Run all pending migrations
pub async fn run(conn: &Connection) -> Result<()> {
    let version = get_version(conn).await?;

    if version < 1 {
        migrate_v1(conn).await?;
    }

    Ok(())
}

/// Get the current schema version
async fn get_version(conn: &Connection) -> Result<i32> {
    let mut rows = conn
        .query(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            (),
        )
        .await?;

    let exists: bool = if let Some(row) = rows.next().await? {
        row.get::<i32>(0)? != 0
    } else {
        false
    };

    if !exists {
        return Ok(0);
    }

    let mut rows = conn
        .query("SELECT COALESCE(MAX(version), 0) FROM schema_version", ())
        .await?;

    let version: i32 = if let Some(row) = rows.next().await? {
        row.get(0)?
    } else {
        0
    };

    Ok(version)
}

/// Migration to version 1: shared collections and device state
async fn migrate_v1(conn: &Connection) -> Result<()> {
    conn.execute("BEGIN TRANSACTION", ()).await?;

    let statements = [
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            sync_code TEXT NOT NULL,
            name TEXT NOT NULL,
            avatar TEXT NOT NULL DEFAULT '',
            created_at INTEGER NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_users_sync_code ON users(sync_code)",
        // Participants are stored as an embedded JSON array
        "CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            sync_code TEXT NOT NULL,
            created_by TEXT NOT NULL,
            creator_name TEXT NOT NULL,
            creator_avatar TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL,
            type TEXT NOT NULL,
            participants TEXT NOT NULL DEFAULT '[]',
            created_at INTEGER NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_sessions_sync_date ON sessions(sync_code, date DESC, created_at DESC)",
        "CREATE TABLE IF NOT EXISTS custom_exercises (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sync_code TEXT NOT NULL,
            body_part TEXT NOT NULL,
            exercise_name TEXT NOT NULL,
            UNIQUE (sync_code, body_part, exercise_name)
        )",
        "CREATE TABLE IF NOT EXISTS reactions (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
            sync_code TEXT NOT NULL,
            user_id TEXT NOT NULL,
            user_name TEXT NOT NULL,
            user_avatar TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL,
            emoji TEXT NOT NULL,
            gif_url TEXT NOT NULL,
            gif_id TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )",
        "CREATE INDEX IF NOT EXISTS idx_reactions_session ON reactions(session_id, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_reactions_sync_code ON reactions(sync_code, created_at)",
        // Device-local state (not shared)
        "CREATE TABLE IF NOT EXISTS local_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        "INSERT INTO schema_version (version) VALUES (1)",
    ];

    for stmt in statements {
        if let Err(e) = conn.execute(stmt, ()).await {
            conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }
    }

    if let Err(e) = conn.execute("COMMIT", ()).await {
        conn.execute("ROLLBACK", ()).await.ok();
        return Err(e.into());
    }

    tracing::info!("Migrated database to version {CURRENT_VERSION}");
    Ok(())
}
