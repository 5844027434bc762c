//! Records common to two tables.
//!
//! Two records intersect when, ignoring their ids, their value sequences
//! have the same length and are equal position by position: same variant,
//! same payload, floats compared exactly. The store performs the match;
//! [`intersect`] states the same rule locally.

use crate::datatypes::{render_table, Column, Record, Value};
use crate::error::ValidationError;
use crate::store::Store;
use crate::ClientResult;

/// Whether two value sequences match under the intersection rule.
pub fn values_match(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

/// Whether two records intersect. Ids are not compared.
pub fn records_intersect(a: &Record, b: &Record) -> bool {
    values_match(&a.values, &b.values)
}

/// The records of `b` that match at least one record of `a`, in `b`'s order.
pub fn intersect(a: &[Record], b: &[Record]) -> Vec<Record> {
    b.iter()
        .filter(|rb| a.iter().any(|ra| records_intersect(ra, rb)))
        .cloned()
        .collect()
}

/// Checks that both table names are given and differ.
pub fn check_tables(table_a: &str, table_b: &str) -> Result<(), ValidationError> {
    if table_a.trim().is_empty() || table_b.trim().is_empty() {
        return Err(ValidationError::MissingIntersectionTable);
    }
    if table_a == table_b {
        return Err(ValidationError::SameIntersectionTable(table_a.to_string()));
    }
    Ok(())
}

/// Result of an intersection request. Display only; it never feeds back
/// into either source table except through an explicit save.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub table_a: String,
    pub table_b: String,
    /// Columns of `table_a` if known. Rows are assumed to share its arity.
    pub columns: Vec<Column>,
    pub rows: Vec<Record>,
}

impl Intersection {
    /// Name under which the result is saved as a new table.
    pub fn table_name(&self) -> String {
        format!("{}_{}_intersection", self.table_a, self.table_b)
    }

    pub fn render(&self) -> String {
        render_table(&self.columns, &self.rows)
    }
}

/// Validates the pair and asks the store for the intersecting records.
pub fn request<S: Store>(
    store: &S,
    table_a: &str,
    table_b: &str,
    columns: Vec<Column>,
) -> ClientResult<Intersection> {
    check_tables(table_a, table_b)?;
    let rows = store.intersection(table_a, table_b)?;
    Ok(Intersection {
        table_a: table_a.to_string(),
        table_b: table_b.to_string(),
        columns,
        rows,
    })
}
