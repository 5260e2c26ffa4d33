use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

// ── Config ─────────────────────────────────────────────────────────

pub fn get_config(conn: &Connection, key: &str) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row(
        "SELECT value FROM app_config WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

pub fn set_config(conn: &Connection, key: &str, value: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO app_config (key, value, updated_at)
         VALUES (?1, ?2, datetime('now'))",
        params![key, value],
    )?;
    Ok(())
}

pub fn list_config(conn: &Connection) -> Result<Vec<(String, String)>, rusqlite::Error> {
    let mut stmt = conn.prepare("SELECT key, value FROM app_config ORDER BY key")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
    rows.collect()
}

// ── Boards ─────────────────────────────────────────────────────────

/// A helpdesk board: a main Asana project plus an optional archive project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Board {
    pub board_key: String,
    pub project_gid: String,
    pub archive_gid: Option<String>,
    pub display_name: Option<String>,
    pub added_at: String,
}

impl Board {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.board_key)
    }
}

pub fn add_board(
    conn: &Connection,
    board_key: &str,
    project_gid: &str,
    archive_gid: Option<&str>,
    display_name: Option<&str>,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO boards (board_key, project_gid, archive_gid, display_name, added_at)
         VALUES (?1, ?2, ?3, ?4, datetime('now'))",
        params![board_key, project_gid, archive_gid, display_name],
    )?;
    Ok(())
}

pub fn remove_board(conn: &Connection, board_key: &str) -> Result<bool, rusqlite::Error> {
    let count = conn.execute("DELETE FROM boards WHERE board_key = ?1", params![board_key])?;
    conn.execute("DELETE FROM task_cache WHERE board_key = ?1", params![board_key])?;
    Ok(count > 0)
}

fn board_from_row(row: &rusqlite::Row<'_>) -> Result<Board, rusqlite::Error> {
    Ok(Board {
        board_key: row.get(0)?,
        project_gid: row.get(1)?,
        archive_gid: row.get(2)?,
        display_name: row.get(3)?,
        added_at: row.get(4)?,
    })
}

pub fn get_board(conn: &Connection, board_key: &str) -> Result<Option<Board>, rusqlite::Error> {
    conn.query_row(
        "SELECT board_key, project_gid, archive_gid, display_name, added_at
         FROM boards WHERE board_key = ?1",
        params![board_key],
        board_from_row,
    )
    .optional()
}

pub fn list_boards(conn: &Connection) -> Result<Vec<Board>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT board_key, project_gid, archive_gid, display_name, added_at
         FROM boards ORDER BY board_key",
    )?;
    let rows = stmt.query_map([], board_from_row)?;
    rows.collect()
}

// ── Task cache ─────────────────────────────────────────────────────

/// Cached payload if it was written less than `ttl_secs` seconds ago.
pub fn get_cached_tasks(
    conn: &Connection,
    cache_key: &str,
    ttl_secs: u64,
) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row(
        "SELECT payload FROM task_cache
         WHERE cache_key = ?1 AND fetched_at > datetime('now', ?2)",
        params![cache_key, format!("-{ttl_secs} seconds")],
        |row| row.get(0),
    )
    .optional()
}

pub fn put_cached_tasks(
    conn: &Connection,
    cache_key: &str,
    board_key: &str,
    payload: &str,
    task_count: usize,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR REPLACE INTO task_cache (cache_key, board_key, payload, task_count, fetched_at)
         VALUES (?1, ?2, ?3, ?4, datetime('now'))",
        params![cache_key, board_key, payload, task_count as i64],
    )?;
    Ok(())
}

/// Delete cached pages for one board, or all of them. Returns rows removed.
pub fn clear_cache(conn: &Connection, board_key: Option<&str>) -> Result<usize, rusqlite::Error> {
    match board_key {
        Some(key) => conn.execute("DELETE FROM task_cache WHERE board_key = ?1", params![key]),
        None => conn.execute("DELETE FROM task_cache", []),
    }
}
