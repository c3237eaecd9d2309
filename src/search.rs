//! Full-text search over every text column, backed by an FTS5 table kept in sync by triggers.

use crate::error::AppError;
use crate::sql::{bind, bind_scalar, quoted, SqlValue};
use regex::Regex;
use serde::Serialize;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::sync::OnceLock;

pub const SEARCH_TABLE: &str = "text_search";

const TEXT_TYPE_MARKERS: &[&str] = &["TEXT", "CHAR", "CLOB", "VARCHAR"];

fn identifier_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok()).as_ref()
}

/// Names interpolated into DDL must be plain identifiers.
pub fn is_safe_identifier(name: &str) -> bool {
    identifier_re().is_some_and(|re| re.is_match(name))
}

/// Phrase query for FTS5 MATCH: the term in double quotes, embedded quotes doubled.
pub fn phrase_query(term: &str) -> String {
    format!("\"{}\"", term.replace('"', "\"\""))
}

fn is_text_type(declared: &str) -> bool {
    let upper = declared.to_ascii_uppercase();
    TEXT_TYPE_MARKERS.iter().any(|m| upper.contains(m))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextColumn {
    pub table: String,
    pub column: String,
}

impl TextColumn {
    fn trigger_prefix(&self) -> String {
        format!("{}_{}_{}", SEARCH_TABLE, self.table, self.column)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchHit {
    pub table_name: String,
    pub column_name: String,
    pub content: String,
    pub content_rowid: i64,
}

#[derive(Clone, Debug, Default)]
pub struct SearchQuery {
    pub term: String,
    pub table_name: Option<String>,
    pub column_name: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// Counts from the last rebuild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RebuildStats {
    pub columns: usize,
    pub rows: u64,
}

pub struct TextSearchManager;

impl TextSearchManager {
    /// Drop and recreate the index, copy existing text into it and install sync triggers.
    /// Runs in one transaction.
    pub async fn rebuild(pool: &SqlitePool) -> Result<RebuildStats, AppError> {
        let mut tx = pool.begin().await?;
        Self::drop_existing(&mut tx).await?;
        exec(
            &mut tx,
            &format!(
                "CREATE VIRTUAL TABLE {} USING fts5(table_name, column_name, content, content_rowid UNINDEXED)",
                SEARCH_TABLE
            ),
        )
        .await?;

        let columns = Self::text_columns(&mut tx).await?;
        let mut stats = RebuildStats {
            columns: columns.len(),
            rows: 0,
        };
        for c in &columns {
            let copy = format!(
                "INSERT INTO {fts} (table_name, column_name, content, content_rowid) \
                 SELECT ?, ?, {col}, rowid FROM {table} WHERE {col} IS NOT NULL",
                fts = SEARCH_TABLE,
                col = quoted(&c.column),
                table = quoted(&c.table),
            );
            tracing::debug!(sql = %copy, table = %c.table, column = %c.column, "query (tx)");
            let done = sqlx::query(&copy)
                .bind(c.table.as_str())
                .bind(c.column.as_str())
                .execute(&mut *tx)
                .await?;
            stats.rows += done.rows_affected();
            for sql in trigger_statements(c) {
                exec(&mut tx, &sql).await?;
            }
        }
        tx.commit().await?;
        tracing::info!(columns = stats.columns, rows = stats.rows, "full-text index rebuilt");
        Ok(stats)
    }

    async fn drop_existing(tx: &mut SqliteConnection) -> Result<(), AppError> {
        let triggers: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'trigger' AND name LIKE 'text_search%'",
        )
        .fetch_all(&mut *tx)
        .await?;
        for name in triggers {
            if !is_safe_identifier(&name) {
                tracing::warn!(trigger = %name, "skipping trigger with unexpected name");
                continue;
            }
            exec(tx, &format!("DROP TRIGGER IF EXISTS {}", quoted(&name))).await?;
        }
        exec(tx, &format!("DROP TABLE IF EXISTS {}", SEARCH_TABLE)).await
    }

    /// Every column of every base table whose declared type is textual.
    pub async fn text_columns(tx: &mut SqliteConnection) -> Result<Vec<TextColumn>, AppError> {
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' \
             AND name NOT LIKE 'sqlite_%' AND name NOT LIKE 'text_search%' ORDER BY name",
        )
        .fetch_all(&mut *tx)
        .await?;

        let mut out = Vec::new();
        for table in tables {
            if !is_safe_identifier(&table) {
                tracing::warn!(table = %table, "skipping table with unsafe name");
                continue;
            }
            let info = sqlx::query(&format!("PRAGMA table_info({})", quoted(&table)))
                .fetch_all(&mut *tx)
                .await?;
            for row in info {
                let column: String = row.try_get("name")?;
                let declared: String = row.try_get("type")?;
                if !is_text_type(&declared) {
                    continue;
                }
                if !is_safe_identifier(&column) {
                    tracing::warn!(table = %table, column = %column, "skipping column with unsafe name");
                    continue;
                }
                out.push(TextColumn {
                    table: table.clone(),
                    column,
                });
            }
        }
        Ok(out)
    }

    /// Phrase search ordered by FTS5 rank. Returns one page of hits and the total match count.
    pub async fn search(pool: &SqlitePool, q: &SearchQuery) -> Result<(Vec<SearchHit>, i64), AppError> {
        let term = q.term.trim();
        if term.is_empty() {
            return Err(AppError::Validation("query must not be empty".into()));
        }
        let mut filter = format!("FROM {} WHERE content MATCH ?", SEARCH_TABLE);
        let mut params = vec![SqlValue::Text(phrase_query(term))];
        if let Some(t) = q.table_name.as_deref().filter(|t| !t.is_empty()) {
            filter.push_str(" AND table_name = ?");
            params.push(SqlValue::from(t));
        }
        if let Some(c) = q.column_name.as_deref().filter(|c| !c.is_empty()) {
            filter.push_str(" AND column_name = ?");
            params.push(SqlValue::from(c));
        }

        let count_sql = format!("SELECT COUNT(*) {}", filter);
        tracing::debug!(sql = %count_sql, params = ?params, "query");
        let total: i64 = params
            .iter()
            .fold(sqlx::query_scalar(&count_sql), bind_scalar)
            .fetch_one(pool)
            .await
            .map_err(search_error)?;

        let page_sql = format!(
            "SELECT table_name, column_name, content, content_rowid {} ORDER BY rank LIMIT ? OFFSET ?",
            filter
        );
        params.push(SqlValue::Integer(q.limit));
        params.push(SqlValue::Integer(q.offset));
        tracing::debug!(sql = %page_sql, params = ?params, "query");
        let rows = params
            .iter()
            .fold(sqlx::query(&page_sql), bind)
            .fetch_all(pool)
            .await
            .map_err(search_error)?;

        let hits = rows
            .iter()
            .map(|r| {
                Ok(SearchHit {
                    table_name: r.try_get("table_name")?,
                    column_name: r.try_get("column_name")?,
                    content: r.try_get("content")?,
                    content_rowid: r.try_get("content_rowid")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(search_error)?;
        Ok((hits, total))
    }
}

fn search_error(e: sqlx::Error) -> AppError {
    match e {
        sqlx::Error::Database(db) => AppError::Search(db.message().to_string()),
        other => AppError::Search(other.to_string()),
    }
}

async fn exec(tx: &mut SqliteConnection, sql: &str) -> Result<(), AppError> {
    tracing::debug!(sql = %sql, "query (tx)");
    sqlx::query(sql).execute(&mut *tx).await?;
    Ok(())
}

/// Insert, update and delete triggers mirroring one column into the index.
/// Table and column names are literals in the trigger body; both were checked by `is_safe_identifier`.
pub fn trigger_statements(c: &TextColumn) -> [String; 3] {
    let prefix = c.trigger_prefix();
    let table = quoted(&c.table);
    let col = quoted(&c.column);
    let fts = SEARCH_TABLE;
    let (t, k) = (&c.table, &c.column);
    [
        format!(
            "CREATE TRIGGER {p} AFTER INSERT ON {table} WHEN NEW.{col} IS NOT NULL BEGIN \
             INSERT INTO {fts} (table_name, column_name, content, content_rowid) \
             VALUES ('{t}', '{k}', NEW.{col}, NEW.rowid); END",
            p = quoted(&format!("{}_insert", prefix)),
        ),
        format!(
            "CREATE TRIGGER {p} AFTER UPDATE OF {col} ON {table} BEGIN \
             DELETE FROM {fts} WHERE table_name = '{t}' AND column_name = '{k}' AND content_rowid = OLD.rowid; \
             INSERT INTO {fts} (table_name, column_name, content, content_rowid) \
             SELECT '{t}', '{k}', NEW.{col}, NEW.rowid WHERE NEW.{col} IS NOT NULL; END",
            p = quoted(&format!("{}_update", prefix)),
        ),
        format!(
            "CREATE TRIGGER {p} AFTER DELETE ON {table} BEGIN \
             DELETE FROM {fts} WHERE table_name = '{t}' AND column_name = '{k}' AND content_rowid = OLD.rowid; END",
            p = quoted(&format!("{}_delete", prefix)),
        ),
    ]
}
