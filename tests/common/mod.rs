#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::sync::Once;

use tabledb_client::datatypes::{Column, Record, Schema, TableDetails, Value};
use tabledb_client::intersection::intersect;
use tabledb_client::store::error::{StoreError, TransportError};
use tabledb_client::store::Store;
use tabledb_client::ClientResult;

static INIT: Once = Once::new();

/// Initialize tracing for test binaries. Safe to call multiple times.
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        use tracing_subscriber::fmt;
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_test_writer()
            .try_init();
    });
}

struct MemTable {
    schema: Schema,
    rows: Vec<Record>,
    next_id: u32,
}

/// In-memory store double. Validates rows the way the real store does and
/// counts every call so tests can assert that nothing was sent.
#[derive(Default)]
pub struct MemoryStore {
    tables: RefCell<BTreeMap<String, MemTable>>,
    calls: Cell<usize>,
    offline: Cell<bool>,
    refuse_next: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// Makes the next call fail with a store error carrying `message`.
    pub fn refuse_next(&self, message: &str) {
        *self.refuse_next.borrow_mut() = Some(message.to_string());
    }

    pub fn rows(&self, table: &str) -> Vec<Record> {
        self.tables
            .borrow()
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.borrow().contains_key(table)
    }

    fn enter(&self) -> ClientResult<()> {
        self.calls.set(self.calls.get() + 1);
        if self.offline.get() {
            return Err(TransportError::Unreachable("connection refused".to_string()).into());
        }
        if let Some(message) = self.refuse_next.borrow_mut().take() {
            return Err(refused(&message));
        }
        Ok(())
    }

    fn validate(schema: &Schema, values: &[Value]) -> ClientResult<()> {
        if values.len() != schema.columns.len() {
            return Err(refused("Row length does not match schema length"));
        }
        for (value, column) in values.iter().zip(&schema.columns) {
            if value.column_type() != column.column_type {
                return Err(refused("Value type does not match schema type"));
            }
        }
        Ok(())
    }
}

fn refused(message: &str) -> tabledb_client::ClientError {
    StoreError::Status {
        status: 500,
        message: message.to_string(),
    }
    .into()
}

impl Store for MemoryStore {
    fn health(&self) -> ClientResult<()> {
        self.enter()
    }

    fn list_tables(&self) -> ClientResult<Vec<String>> {
        self.enter()?;
        Ok(self.tables.borrow().keys().cloned().collect())
    }

    fn table_details(&self, table: &str) -> ClientResult<TableDetails> {
        self.enter()?;
        let tables = self.tables.borrow();
        let t = tables.get(table).ok_or_else(|| refused("Table not found"))?;
        Ok(TableDetails {
            schema: t.schema.clone(),
            rows: t.rows.clone(),
        })
    }

    fn create_table(&self, table: &str, columns: &[Column]) -> ClientResult<()> {
        self.enter()?;
        self.tables.borrow_mut().insert(
            table.to_string(),
            MemTable {
                schema: Schema::new(table, columns.to_vec()),
                rows: Vec::new(),
                next_id: 0,
            },
        );
        Ok(())
    }

    fn delete_table(&self, table: &str) -> ClientResult<()> {
        self.enter()?;
        self.tables
            .borrow_mut()
            .remove(table)
            .map(|_| ())
            .ok_or_else(|| refused("Table not found"))
    }

    fn create_record(&self, table: &str, values: &[Value]) -> ClientResult<Record> {
        self.enter()?;
        let mut tables = self.tables.borrow_mut();
        let t = tables.get_mut(table).ok_or_else(|| refused("Table not found"))?;
        Self::validate(&t.schema, values)?;
        let record = Record {
            id: t.next_id.to_string(),
            values: values.to_vec(),
        };
        t.next_id += 1;
        t.rows.push(record.clone());
        Ok(record)
    }

    fn update_record(&self, table: &str, id: &str, values: &[Value]) -> ClientResult<Record> {
        self.enter()?;
        let mut tables = self.tables.borrow_mut();
        let t = tables.get_mut(table).ok_or_else(|| refused("Table not found"))?;
        Self::validate(&t.schema, values)?;
        let row = t
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| refused("Row not found"))?;
        row.values = values.to_vec();
        Ok(row.clone())
    }

    fn delete_record(&self, table: &str, id: &str) -> ClientResult<()> {
        self.enter()?;
        let mut tables = self.tables.borrow_mut();
        let t = tables.get_mut(table).ok_or_else(|| refused("Table not found"))?;
        let before = t.rows.len();
        t.rows.retain(|r| r.id != id);
        if t.rows.len() == before {
            return Err(refused("Row not found"));
        }
        Ok(())
    }

    fn intersection(&self, table_a: &str, table_b: &str) -> ClientResult<Vec<Record>> {
        self.enter()?;
        let tables = self.tables.borrow();
        let a = tables.get(table_a).ok_or_else(|| refused("Table 1 not found"))?;
        let b = tables.get(table_b).ok_or_else(|| refused("Table 2 not found"))?;
        Ok(intersect(&a.rows, &b.rows))
    }
}
