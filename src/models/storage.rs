use crate::models::Snippet;
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Persisted layout of `created_at`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const TAG_SEPARATOR: char = ',';

const SELECT_COLUMNS: &str = "SELECT id, title, tags, content, created_at FROM snippets";

const ORDER_NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("snippet with ID {0} not found")]
    NotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to create database directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Owner of the SQLite connection holding every snippet
#[derive(Debug)]
pub struct SnippetStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SnippetStore {
    /// Opens (or creates) the database at `path`, creating parent directories as needed.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| StorageError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        let store = Self {
            conn,
            path: Some(path.to_path_buf()),
        };
        store.ensure_schema()?;

        debug!(path = %path.display(), "opened snippet database");
        Ok(store)
    }

    /// In-memory database, mostly for tests.
    pub fn open_in_memory() -> StorageResult<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
            path: None,
        };
        store.ensure_schema()?;
        Ok(store)
    }

    fn ensure_schema(&self) -> StorageResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS snippets (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                title      TEXT,
                tags       TEXT,
                content    TEXT,
                created_at TEXT
            );",
        )?;
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Inserts a new row and returns the id SQLite assigned to it.
    pub fn save(&self, snippet: &Snippet) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO snippets (title, tags, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                snippet.title,
                encode_tags(&snippet.tags),
                snippet.content,
                encode_timestamp(&snippet.created_at),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!(id, title = %snippet.title, "saved snippet");
        Ok(id)
    }

    pub fn get_by_id(&self, id: i64) -> StorageResult<Snippet> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], snippet_from_row)
            .optional()?
            .ok_or(StorageError::NotFound(id))
    }

    /// Every snippet, newest first.
    pub fn list_all(&self) -> StorageResult<Vec<Snippet>> {
        let sql = format!("{SELECT_COLUMNS} {ORDER_NEWEST_FIRST}");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], snippet_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Case-insensitive substring search over title and content.
    ///
    /// Without a tag filter the raw tag string is searched as well. With one,
    /// results are limited to snippets carrying `tag_filter` as a whole tag:
    /// the stored comma list must start with it, end with it, contain it
    /// between two commas, or be exactly it. A filter of `go` therefore
    /// never matches a snippet tagged `golang`.
    pub fn search(&self, query: &str, tag_filter: &str) -> StorageResult<Vec<Snippet>> {
        let pattern = format!("%{}%", escape_like(&query.to_ascii_lowercase()));

        let snippets = if tag_filter.is_empty() {
            let sql = format!(
                r"{SELECT_COLUMNS}
                WHERE LOWER(COALESCE(title, '')) LIKE ?1 ESCAPE '\'
                   OR LOWER(COALESCE(tags, '')) LIKE ?1 ESCAPE '\'
                   OR LOWER(COALESCE(content, '')) LIKE ?1 ESCAPE '\'
                {ORDER_NEWEST_FIRST}"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(params![pattern], snippet_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()?
        } else {
            let tag = tag_filter.to_ascii_lowercase();
            let escaped = escape_like(&tag);
            let sql = format!(
                r"{SELECT_COLUMNS}
                WHERE (LOWER(COALESCE(title, '')) LIKE ?1 ESCAPE '\'
                       OR LOWER(COALESCE(content, '')) LIKE ?1 ESCAPE '\')
                  AND (LOWER(tags) LIKE ?2 ESCAPE '\'
                       OR LOWER(tags) LIKE ?3 ESCAPE '\'
                       OR LOWER(tags) LIKE ?4 ESCAPE '\'
                       OR LOWER(tags) = ?5)
                {ORDER_NEWEST_FIRST}"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(
                params![
                    pattern,
                    format!("{escaped},%"),
                    format!("%,{escaped},%"),
                    format!("%,{escaped}"),
                    tag,
                ],
                snippet_from_row,
            )?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        debug!(query, tag_filter, hits = snippets.len(), "searched snippets");
        Ok(snippets)
    }

    /// Rewrites title, tags and content. `id` and `created_at` are never touched.
    pub fn update(&self, snippet: &Snippet) -> StorageResult<()> {
        let changed = self.conn.execute(
            "UPDATE snippets SET title = ?1, tags = ?2, content = ?3 WHERE id = ?4",
            params![
                snippet.title,
                encode_tags(&snippet.tags),
                snippet.content,
                snippet.id,
            ],
        )?;

        if changed == 0 {
            return Err(StorageError::NotFound(snippet.id));
        }

        debug!(id = snippet.id, "updated snippet");
        Ok(())
    }

    pub fn delete(&self, id: i64) -> StorageResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM snippets WHERE id = ?1", params![id])?;

        if removed == 0 {
            return Err(StorageError::NotFound(id));
        }

        debug!(id, "deleted snippet");
        Ok(())
    }

    pub fn count(&self) -> StorageResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM snippets", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn snippet_from_row(row: &Row<'_>) -> rusqlite::Result<Snippet> {
    let tags: Option<String> = row.get(2)?;
    let created_at: Option<String> = row.get(4)?;

    Ok(Snippet {
        id: row.get(0)?,
        title: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        tags: decode_tags(tags.as_deref().unwrap_or_default()),
        content: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        created_at: decode_timestamp(created_at.as_deref().unwrap_or_default()),
    })
}

fn encode_tags(tags: &[String]) -> String {
    tags.join(",")
}

fn decode_tags(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(TAG_SEPARATOR).map(String::from).collect()
}

fn encode_timestamp(at: &DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Reads the fixed layout, then RFC 3339; anything else becomes "now".
fn decode_timestamp(raw: &str) -> DateTime<Utc> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return naive.and_utc();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }

    warn!(raw, "unreadable created_at, substituting current time");
    Utc::now()
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
