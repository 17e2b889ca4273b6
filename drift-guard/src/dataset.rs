//! In-memory columnar dataset consumed by the profiler.
//!
//! A [`Dataset`] is an ordered set of uniquely named [`Column`]s sharing a
//! common row count. Columns wrap Arrow arrays; a value is missing if and
//! only if the array marks it null. The upstream collaborator that
//! materializes query results is responsible for resolving its own
//! missing-value markers into Arrow nulls before handing the data over.
//!
//! Datasets are read-only: the profiler never mutates them, and two profiler
//! calls over independent datasets can run concurrently.

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::record_batch::RecordBatch;

use crate::error::{GuardError, GuardResult};

/// A named column of values backed by a single Arrow array.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    values: ArrayRef,
}

impl Column {
    /// Creates a column from a name and an Arrow array.
    pub fn new(name: impl Into<String>, values: ArrayRef) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The backing Arrow array.
    pub fn values(&self) -> &ArrayRef {
        &self.values
    }

    /// Number of rows, including nulls.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the column has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of rows marked null by the source.
    pub fn null_count(&self) -> usize {
        self.values.null_count()
    }
}

/// An ordered set of uniquely named columns sharing a common row count.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Dataset {
    /// Builds a dataset from columns, validating its structural invariants.
    ///
    /// Fails with [`GuardError::DuplicateColumn`] when two columns share a
    /// name, and with [`GuardError::RowCountMismatch`] when column lengths
    /// disagree. A dataset with no columns has zero rows.
    pub fn try_new(columns: Vec<Column>) -> GuardResult<Self> {
        let num_rows = columns.first().map(Column::len).unwrap_or(0);

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name().to_string()) {
                return Err(GuardError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != num_rows {
                return Err(GuardError::RowCountMismatch {
                    column: column.name().to_string(),
                    expected: num_rows,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, num_rows })
    }

    /// Builds a dataset from an Arrow record batch, preserving column order.
    pub fn from_record_batch(batch: &RecordBatch) -> GuardResult<Self> {
        let schema = batch.schema();
        let columns = batch
            .columns()
            .iter()
            .enumerate()
            .map(|(i, array)| Column::new(schema.field(i).name().clone(), Arc::clone(array)))
            .collect();
        Self::try_new(columns)
    }

    /// Number of rows shared by every column.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Iterates columns in their original order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }
}
