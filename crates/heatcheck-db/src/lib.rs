// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use heatcheck_app::{Session, User};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};

pub const APP_NAME: &str = "heatcheck";

const KEY_USER: &str = "user";
const KEY_TOKEN: &str = "token";
const SESSION_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

/// Persists the signed-in user and token across runs. Loaded once at
/// startup, written on login, cleared on logout.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create database directory {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_session_table(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }
        Ok(())
    }

    /// Corrupted or partial entries are removed and reported as no session.
    pub fn load_session(&self) -> Result<Option<Session>> {
        let user = self.get_raw(KEY_USER)?;
        let token = self.get_raw(KEY_TOKEN)?;
        let (Some(user), Some(token)) = (user, token) else {
            return Ok(None);
        };
        let (Value::Text(user), Value::Text(token)) = (user, token) else {
            warn!("stored session is not text; discarding");
            self.clear_session()?;
            return Ok(None);
        };

        if token.trim().is_empty() {
            warn!("stored session has an empty token; discarding");
            self.clear_session()?;
            return Ok(None);
        }

        match serde_json::from_str::<User>(&user) {
            Ok(user) => {
                debug!(user = %user.display_name(), "restored session");
                Ok(Some(Session { user, token }))
            }
            Err(error) => {
                warn!(%error, "stored user is not valid JSON; discarding session");
                self.clear_session()?;
                Ok(None)
            }
        }
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        if session.token.trim().is_empty() {
            bail!("refusing to store a session without a token");
        }
        let user = serde_json::to_string(&session.user).context("encode session user")?;
        let tx = self
            .conn
            .unchecked_transaction()
            .context("begin session transaction")?;
        put_raw(&tx, KEY_USER, &user)?;
        put_raw(&tx, KEY_TOKEN, &session.token)?;
        tx.commit().context("commit session")?;
        info!(user = %session.user.display_name(), "session saved");
        Ok(())
    }

    pub fn clear_session(&self) -> Result<()> {
        self.conn
            .execute(
                "DELETE FROM session WHERE key IN (?, ?)",
                params![KEY_USER, KEY_TOKEN],
            )
            .context("clear session")?;
        Ok(())
    }

    /// Raw column value; callers decide what a non-text value means.
    fn get_raw(&self, key: &str) -> Result<Option<Value>> {
        self.conn
            .query_row(
                "SELECT value FROM session WHERE key = ?",
                params![key],
                |row| row.get::<_, Value>(0),
            )
            .optional()
            .with_context(|| format!("read session {key}"))
    }
}

fn put_raw(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let now = now_rfc3339()?;
    conn.execute(
        "
        INSERT INTO session (key, value, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET
          value = excluded.value,
          updated_at = excluded.updated_at
        ",
        params![key, value, now],
    )
    .with_context(|| format!("upsert session {key}"))?;
    Ok(())
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("HEATCHECK_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set HEATCHECK_DB_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("heatcheck.db"))
}

/// Directory for log files, next to the database.
pub fn default_log_dir() -> Result<PathBuf> {
    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; pass --log-stderr to log to the terminal")
    })?;
    let dir = data_root.join(APP_NAME).join("logs");
    fs::create_dir_all(&dir)
        .with_context(|| format!("create log directory {}", dir.display()))?;
    Ok(dir)
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn has_session_table(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'session'",
            [],
            |row| row.get(0),
        )
        .context("inspect sqlite_master")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info('session')")
        .context("inspect session table")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("list session columns")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("collect session columns")?;

    for required in SESSION_COLUMNS {
        if !columns.iter().any(|column| column == required) {
            bail!(
                "session table is missing column `{required}`; delete the database file (see `heatcheck --print-path`) to start fresh"
            );
        }
    }
    Ok(())
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}

#[cfg(test)]
mod tests {
    use super::{has_session_table, now_rfc3339};
    use anyhow::Result;
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;

    #[test]
    fn timestamps_are_rfc3339() -> Result<()> {
        let now = now_rfc3339()?;
        assert!(OffsetDateTime::parse(&now, &Rfc3339).is_ok());
        Ok(())
    }

    #[test]
    fn bootstrap_is_idempotent() -> Result<()> {
        let store = super::Store::open_memory()?;
        assert!(!has_session_table(store.raw_connection())?);
        store.bootstrap()?;
        store.bootstrap()?;
        assert!(has_session_table(store.raw_connection())?);
        Ok(())
    }
}
