//! Generic document repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide get/put/delete/scan/query-by-index over one table per document
//!   kind, with the same shape for every kind.
//! - Translate between store continuation keys and keyset pagination.
//!
//! # Invariants
//! - `put` is an upsert that overwrites the whole document.
//! - `delete` of a missing id succeeds.
//! - Pages are ordered by `id`; a continuation key is only returned when at
//!   least one more row exists after the page.
//! - A start key must have exactly the attribute shape the operation emits:
//!   `{Id, Table}` for scans, `{Id, Table, <index attribute>}` for index
//!   queries, with `Table` naming the table being read.
//! - Page sizes below 1 are read as 1.

use crate::db::DbError;
use crate::pagination::ContinuationKey;
use log::{debug, error, info};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use uuid::Uuid;

/// Attribute name of the primary key inside continuation keys.
pub const KEY_ATTRIBUTE: &str = "Id";
/// Attribute naming the table a continuation key was read from.
pub const TABLE_ATTRIBUTE: &str = "Table";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for document persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying store failure.
    Db(DbError),
    /// No document stored under the key.
    NotFound { kind: &'static str, id: Uuid },
    /// Stored document cannot be decoded or does not match its key.
    InvalidData(String),
    /// Continuation key does not belong to this operation.
    InvalidStartKey(String),
    /// Index name is not declared for the table.
    UnknownIndex { table: &'static str, index: String },
    /// Document could not be serialized for storage.
    Serialize(serde_json::Error),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted document: {message}"),
            Self::InvalidStartKey(message) => write!(f, "invalid start key: {message}"),
            Self::UnknownIndex { table, index } => {
                write!(f, "unknown index `{index}` on table `{table}`")
            }
            Self::Serialize(err) => write!(f, "failed to serialize document: {err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Equality index over one document attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryIndex {
    /// Name callers query by, e.g. `ArtistId-index`.
    pub name: &'static str,
    /// Document attribute name, also used inside continuation keys.
    pub attribute: &'static str,
    /// Materialized SQL column.
    pub column: &'static str,
}

/// A document kind stored in its own table.
pub trait Document: Serialize + DeserializeOwned {
    /// Human-readable kind used in errors and logs.
    const KIND: &'static str;
    const TABLE: &'static str;
    const INDEXES: &'static [SecondaryIndex] = &[];

    /// Primary key.
    fn key(&self) -> Uuid;

    /// Value materialized into `index.column`; `None` stores SQL NULL.
    fn index_value(&self, _index: &SecondaryIndex) -> Option<String> {
        None
    }
}

/// One page read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPage<D> {
    pub items: Vec<D>,
    pub count: u32,
    /// Where the next page resumes; `None` when nothing remains.
    pub last_evaluated_key: Option<ContinuationKey>,
}

/// Uniform store contract, one implementation per document kind.
pub trait Repository<D: Document> {
    /// Fetches one document; `RepoError::NotFound` when absent.
    fn get(&self, id: Uuid) -> RepoResult<D>;
    /// Inserts or fully overwrites one document.
    fn put(&self, document: &D) -> RepoResult<()>;
    /// Removes one document. Missing ids are not an error.
    fn delete(&self, id: Uuid) -> RepoResult<()>;
    /// Reads one page of the whole table. A `page_size` of 0 reads as 1.
    fn scan(&self, page_size: u32, start: Option<&ContinuationKey>) -> RepoResult<RepoPage<D>>;
    /// Reads one page of documents whose indexed attribute equals `value`.
    fn query_by_index(
        &self,
        index_name: &str,
        value: &str,
        page_size: u32,
        start: Option<&ContinuationKey>,
    ) -> RepoResult<RepoPage<D>>;
}

/// SQLite-backed document repository.
pub struct SqliteRepository<'conn, D> {
    conn: &'conn Connection,
    _document: PhantomData<fn() -> D>,
}

impl<D> Clone for SqliteRepository<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for SqliteRepository<'_, D> {}

impl<'conn, D: Document> SqliteRepository<'conn, D> {
    /// Constructs a repository after checking the table layout exists.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready::<D>(conn)?;
        Ok(Self {
            conn,
            _document: PhantomData,
        })
    }

    fn read_page(
        &self,
        sql: &str,
        bind_values: Vec<Value>,
        page_size: u32,
        index: Option<(&SecondaryIndex, &str)>,
    ) -> RepoResult<RepoPage<D>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let body: String = row.get(1)?;
            items.push(decode_document::<D>(&id, &body)?);
        }

        let has_more = items.len() > page_size as usize;
        items.truncate(page_size as usize);
        let last_evaluated_key = match items.last() {
            Some(last) if has_more => {
                let key = ContinuationKey::new()
                    .with(KEY_ATTRIBUTE, last.key().to_string())
                    .with(TABLE_ATTRIBUTE, D::TABLE);
                Some(match index {
                    Some((index, value)) => key.with(index.attribute, value),
                    None => key,
                })
            }
            _ => None,
        };

        Ok(RepoPage {
            count: items.len() as u32,
            items,
            last_evaluated_key,
        })
    }
}

impl<D: Document> Repository<D> for SqliteRepository<'_, D> {
    fn get(&self, id: Uuid) -> RepoResult<D> {
        let id_text = id.to_string();
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id, body FROM {} WHERE id = ?1;", D::TABLE))?;
        let mut rows = stmt.query([id_text.as_str()])?;
        match rows.next()? {
            Some(row) => {
                let body: String = row.get(1)?;
                debug!(
                    "event=repo_get module=repo status=ok table={} id={}",
                    D::TABLE,
                    id_text
                );
                decode_document(&id_text, &body)
            }
            None => {
                debug!(
                    "event=repo_get module=repo status=not_found table={} id={}",
                    D::TABLE,
                    id_text
                );
                Err(RepoError::NotFound { kind: D::KIND, id })
            }
        }
    }

    fn put(&self, document: &D) -> RepoResult<()> {
        let id_text = document.key().to_string();
        let body = serde_json::to_string(document).map_err(RepoError::Serialize)?;

        let mut columns = vec!["id", "body"];
        let mut bind_values = vec![Value::Text(id_text.clone()), Value::Text(body)];
        for index in D::INDEXES {
            columns.push(index.column);
            bind_values.push(document.index_value(index).map_or(Value::Null, Value::Text));
        }
        let placeholders = (1..=columns.len())
            .map(|position| format!("?{position}"))
            .collect::<Vec<_>>()
            .join(", ");
        let updates = columns[1..]
            .iter()
            .map(|column| format!("{column} = excluded.{column}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})
             ON CONFLICT(id) DO UPDATE SET {updates};",
            D::TABLE,
            columns.join(", "),
        );

        if let Err(err) = self.conn.execute(&sql, params_from_iter(bind_values)) {
            error!(
                "event=repo_put module=repo status=error table={} id={} error={}",
                D::TABLE,
                id_text,
                err
            );
            return Err(err.into());
        }

        info!(
            "event=repo_put module=repo status=ok table={} id={}",
            D::TABLE,
            id_text
        );
        Ok(())
    }

    fn delete(&self, id: Uuid) -> RepoResult<()> {
        let id_text = id.to_string();
        let removed = match self.conn.execute(
            &format!("DELETE FROM {} WHERE id = ?1;", D::TABLE),
            params![id_text],
        ) {
            Ok(removed) => removed,
            Err(err) => {
                error!(
                    "event=repo_delete module=repo status=error table={} id={} error={}",
                    D::TABLE,
                    id_text,
                    err
                );
                return Err(err.into());
            }
        };

        info!(
            "event=repo_delete module=repo status=ok table={} id={} removed={}",
            D::TABLE,
            id_text,
            removed
        );
        Ok(())
    }

    fn scan(&self, page_size: u32, start: Option<&ContinuationKey>) -> RepoResult<RepoPage<D>> {
        let page_size = page_size.max(1);
        let after = start.map(|key| start_id::<D>(key, &[])).transpose()?;
        let sql = format!(
            "SELECT id, body FROM {}
             WHERE (?1 IS NULL OR id > ?1)
             ORDER BY id ASC
             LIMIT ?2;",
            D::TABLE
        );
        let bind_values = vec![
            after.map_or(Value::Null, Value::Text),
            Value::Integer(i64::from(page_size) + 1),
        ];

        let page = self.read_page(&sql, bind_values, page_size, None)?;
        debug!(
            "event=repo_scan module=repo status=ok table={} page_size={} count={} has_more={}",
            D::TABLE,
            page_size,
            page.count,
            page.last_evaluated_key.is_some()
        );
        Ok(page)
    }

    fn query_by_index(
        &self,
        index_name: &str,
        value: &str,
        page_size: u32,
        start: Option<&ContinuationKey>,
    ) -> RepoResult<RepoPage<D>> {
        let page_size = page_size.max(1);
        let index = D::INDEXES
            .iter()
            .find(|index| index.name == index_name)
            .ok_or_else(|| RepoError::UnknownIndex {
                table: D::TABLE,
                index: index_name.to_string(),
            })?;

        let after = match start {
            Some(key) => {
                if key.get(index.attribute) != Some(value) {
                    return Err(RepoError::InvalidStartKey(format!(
                        "start key does not belong to `{}` = `{value}`",
                        index.name
                    )));
                }
                Some(start_id::<D>(key, &[index.attribute])?)
            }
            None => None,
        };

        let sql = format!(
            "SELECT id, body FROM {}
             WHERE {} = ?1
               AND (?2 IS NULL OR id > ?2)
             ORDER BY id ASC
             LIMIT ?3;",
            D::TABLE,
            index.column
        );
        let bind_values = vec![
            Value::Text(value.to_string()),
            after.map_or(Value::Null, Value::Text),
            Value::Integer(i64::from(page_size) + 1),
        ];

        let page = self.read_page(&sql, bind_values, page_size, Some((index, value)))?;
        debug!(
            "event=repo_query module=repo status=ok table={} index={} page_size={} count={} has_more={}",
            D::TABLE,
            index.name,
            page_size,
            page.count,
            page.last_evaluated_key.is_some()
        );
        Ok(page)
    }
}

/// Extracts the resume id from `key`, which must hold exactly `Id`, `Table`
/// and `extra_attributes`, with `Table` equal to `D::TABLE`.
fn start_id<D: Document>(key: &ContinuationKey, extra_attributes: &[&str]) -> RepoResult<String> {
    let expected = extra_attributes.len() + 2;
    let unexpected = key.attributes().find(|attribute| {
        *attribute != KEY_ATTRIBUTE
            && *attribute != TABLE_ATTRIBUTE
            && !extra_attributes.contains(attribute)
    });
    if key.len() != expected || unexpected.is_some() {
        return Err(RepoError::InvalidStartKey(
            "start key attributes do not match this operation".to_string(),
        ));
    }
    if key.get(TABLE_ATTRIBUTE) != Some(D::TABLE) {
        return Err(RepoError::InvalidStartKey(format!(
            "start key was not read from `{}`",
            D::TABLE
        )));
    }

    let raw = key
        .get(KEY_ATTRIBUTE)
        .ok_or_else(|| RepoError::InvalidStartKey(format!("missing `{KEY_ATTRIBUTE}`")))?;
    let id = Uuid::parse_str(raw)
        .map_err(|_| RepoError::InvalidStartKey(format!("`{KEY_ATTRIBUTE}` is not a uuid")))?;
    Ok(id.to_string())
}

fn decode_document<D: Document>(id_text: &str, body: &str) -> RepoResult<D> {
    let document: D = serde_json::from_str(body).map_err(|err| {
        RepoError::InvalidData(format!("{} `{id_text}` has undecodable body: {err}", D::KIND))
    })?;
    if document.key().to_string() != id_text {
        return Err(RepoError::InvalidData(format!(
            "{} `{id_text}` body carries id `{}`",
            D::KIND,
            document.key()
        )));
    }
    Ok(document)
}

fn ensure_table_ready<D: Document>(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, D::TABLE)? {
        return Err(RepoError::MissingRequiredTable(D::TABLE));
    }

    let required = ["id", "body"]
        .into_iter()
        .chain(D::INDEXES.iter().map(|index| index.column));
    for column in required {
        if !table_has_column(conn, D::TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: D::TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
