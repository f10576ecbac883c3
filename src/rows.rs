//! Cursor over a row source.
//!
//! [`Rows`] is the handle callers iterate: it owns the built [`Schema`]
//! and a [`RowSource`], and runs every cell through the conversion
//! pipeline on read. The source is either the remote paginated cursor or
//! an in-memory sequence captured by a reroute — the cursor does not care
//! which.

use log::debug;

use crate::error::Result;
use crate::remote::RemoteCursor;
use crate::schema::Schema;
use crate::value::Value;

/// Backing producer of raw rows: finite, lazily produced, not restartable.
pub(crate) enum RowSource {
    /// Captured nested rows; never suspends, closing is a no-op
    Memory(MemoryRows),
    /// Live paginated read from the service
    Remote(RemoteCursor),
}

impl RowSource {
    async fn next(&mut self) -> Result<Option<Vec<Value>>> {
        match self {
            RowSource::Memory(rows) => Ok(rows.next()),
            RowSource::Remote(cursor) => cursor.next().await,
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self {
            RowSource::Memory(_) => Ok(()),
            RowSource::Remote(cursor) => cursor.close().await,
        }
    }
}

/// In-memory row source over the captured values of a nested column.
pub(crate) struct MemoryRows {
    values: std::vec::IntoIter<Value>,
}

impl MemoryRows {
    pub(crate) fn new(values: Vec<Value>) -> Self {
        Self {
            values: values.into_iter(),
        }
    }

    fn next(&mut self) -> Option<Vec<Value>> {
        match self.values.next()? {
            Value::Array(cells) => Some(cells),
            // A bare value is a single-column record
            other => Some(vec![other]),
        }
    }
}

/// Live, sequential cursor over a row source.
///
/// Rows come out with every cell already converted: temporal cells
/// coerced, nested columns captured as tokens, column adaptors applied.
/// Column order matches [`Rows::column_names`] exactly.
pub struct Rows {
    schema: Schema,
    source: RowSource,
    closed: bool,
}

impl std::fmt::Debug for Rows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rows")
            .field("columns", &self.schema.column_names())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl Rows {
    pub(crate) fn new(schema: Schema, source: RowSource) -> Self {
        Self {
            schema,
            source,
            closed: false,
        }
    }

    /// Column names in result order.
    pub fn column_names(&self) -> &[String] {
        self.schema.column_names()
    }

    /// The result schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Produce the next converted row, or `None` at end of result.
    ///
    /// A conversion failure aborts the row being read and surfaces to the
    /// caller; the cursor itself stays usable, but whether to continue is
    /// the caller's decision.
    pub async fn next(&mut self) -> Result<Option<Vec<Value>>> {
        if self.closed {
            return Ok(None);
        }
        let Some(raw) = self.source.next().await? else {
            return Ok(None);
        };
        let mut converted = Vec::with_capacity(raw.len());
        for (index, value) in raw.into_iter().enumerate() {
            converted.push(self.schema.convert_column_value(index, value)?);
        }
        Ok(Some(converted))
    }

    /// Close the cursor, releasing any remote resources.
    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        debug!("[CURSOR] closed ({} columns)", self.schema.len());
        self.source.close().await
    }
}
