// Linked SQLite backend. Renders rows the way the sqlite3 shell does in list
// mode so both backends feed the same parser.

use std::path::Path;
use std::time::Duration;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use tracing::debug;

use super::{missing_database, StoreQuery, COLUMN_SEPARATOR};
use crate::error::QueryError;

#[derive(Debug, Clone, Copy)]
pub struct EmbeddedSqlite {
    busy_timeout: Duration,
}

impl EmbeddedSqlite {
    pub fn new(busy_timeout: Duration) -> Self {
        Self { busy_timeout }
    }
}

impl Default for EmbeddedSqlite {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

impl StoreQuery for EmbeddedSqlite {
    fn execute(&self, db_path: &Path, sql: &str) -> Result<String, QueryError> {
        if let Some(error) = missing_database(db_path) {
            return Err(error);
        }

        debug!(db = %db_path.display(), sql, "running embedded sqlite query");
        // Read-write so deletes work; never create a database that is not there.
        let conn = Connection::open_with_flags(
            db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(self.busy_timeout)?;

        let mut stmt = conn.prepare(sql)?;
        let column_count = stmt.column_count();
        if column_count == 0 {
            stmt.execute([])?;
            return Ok(String::new());
        }

        let mut rows = stmt.query([])?;
        let mut output = String::new();
        let mut fields = Vec::with_capacity(column_count);
        while let Some(row) = rows.next()? {
            fields.clear();
            for index in 0..column_count {
                fields.push(render_value(row.get_ref(index)?));
            }
            output.push_str(&fields.join(&COLUMN_SEPARATOR.to_string()));
            output.push('\n');
        }
        Ok(output)
    }
}

fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(number) => number.to_string(),
        ValueRef::Real(number) => number.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).replace('\n', ",")
        }
    }
}
