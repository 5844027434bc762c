//! Operator session: builds record and table requests, sends them to the
//! store and keeps the local view in step with what the store reports.
//!
//! All state lives in [`Session`] and changes only through its methods.
//! A mutation never edits the cached records itself; on success the
//! selected table is fetched again in full, on failure nothing but the
//! notification queue changes.

use tracing::{info, warn};

use crate::coercion::{default_value, parse};
use crate::datatypes::{Column, ColumnType, Record, Schema, Value};
use crate::error::ValidationError;
use crate::intersection::{self, Intersection};
use crate::notify::NotificationQueue;
use crate::schema_cache::SchemaCache;
use crate::store::Store;
use crate::{validation_err, ClientResult};

/// Checks `values` against `schema` and fills unset cells with the column's
/// default. Set cells pass through unchanged; they are expected to come
/// from [`parse`] and are not checked against the column type here.
pub fn prepare_values(
    schema: &Schema,
    values: &[Option<Value>],
) -> Result<Vec<Value>, ValidationError> {
    if values.len() != schema.len() {
        return Err(ValidationError::ArityMismatch {
            expected: schema.len(),
            actual: values.len(),
        });
    }

    Ok(schema
        .columns
        .iter()
        .zip(values)
        .map(|(column, value)| match value {
            Some(value) => value.clone(),
            None => default_value(column.column_type),
        })
        .collect())
}

/// Cells of the record currently being edited.
#[derive(Debug, Clone, PartialEq)]
pub struct EditDraft {
    pub id: String,
    pub values: Vec<Option<Value>>,
}

/// Columns collected for a table that has not been created yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableBuilder {
    pub columns: Vec<Column>,
}

/// Whether the operator has confirmed an irreversible action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Yes,
    No,
}

impl From<bool> for Confirm {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirm::Yes
        } else {
            Confirm::No
        }
    }
}

pub struct Session<S> {
    store: S,
    connected: Option<bool>,
    tables: Vec<String>,
    selected: Option<SchemaCache>,
    new_draft: Vec<Option<Value>>,
    editing: Option<EditDraft>,
    builder: TableBuilder,
    intersection: Option<Intersection>,
    notifications: NotificationQueue,
}

impl<S: Store> Session<S> {
    pub fn new(store: S) -> Self {
        Session {
            store,
            connected: None,
            tables: Vec::new(),
            selected: None,
            new_draft: Vec::new(),
            editing: None,
            builder: TableBuilder::default(),
            intersection: None,
            notifications: NotificationQueue::default(),
        }
    }

    // ----------------------------- ACCESSORS ----------------------------- //

    pub fn store(&self) -> &S {
        &self.store
    }

    /// `None` until the first health check.
    pub fn connected(&self) -> Option<bool> {
        self.connected
    }

    pub fn tables(&self) -> &[String] {
        &self.tables
    }

    pub fn selected(&self) -> Option<&SchemaCache> {
        self.selected.as_ref()
    }

    pub fn new_draft(&self) -> &[Option<Value>] {
        &self.new_draft
    }

    pub fn editing(&self) -> Option<&EditDraft> {
        self.editing.as_ref()
    }

    pub fn builder(&self) -> &TableBuilder {
        &self.builder
    }

    pub fn intersection(&self) -> Option<&Intersection> {
        self.intersection.as_ref()
    }

    pub fn notifications(&mut self) -> &mut NotificationQueue {
        &mut self.notifications
    }

    // ------------------------- STORE CONNECTION ------------------------- //

    /// Pings the store and records whether it answered.
    pub fn check_health(&mut self) -> bool {
        let result = self.store.health();
        self.connected = Some(result.is_ok());
        match result {
            Ok(()) => true,
            Err(err) => {
                self.notifications.error(&err);
                false
            }
        }
    }

    pub fn refresh_tables(&mut self) -> ClientResult<()> {
        let result = self.store.list_tables();
        let tables = self.report(result)?;
        self.tables = tables;
        Ok(())
    }

    /// Makes `table` the selected table, replacing the cached schema and
    /// records and discarding every draft. On failure the previous
    /// selection stays as it was.
    pub fn select_table(&mut self, table: &str) -> ClientResult<()> {
        let result = self.store.table_details(table);
        let details = self.report(result)?;

        let cache = SchemaCache::from_details(table, details);
        self.new_draft = vec![None; cache.columns().len()];
        self.editing = None;
        self.selected = Some(cache);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.new_draft.clear();
        self.editing = None;
    }

    // ------------------------------ DRAFTS ------------------------------ //

    /// Sets one cell of the new-record draft from operator text.
    pub fn set_draft_text(&mut self, column: usize, text: &str) -> ClientResult<()> {
        let column_type = self.column_type(column)?;
        self.new_draft[column] = Some(parse(column_type, text));
        Ok(())
    }

    /// Loads the record `id` of the selected table into the edit draft.
    pub fn begin_edit(&mut self, id: &str) -> ClientResult<()> {
        let values = self
            .require_selection()?
            .record(id)
            .map(|record| record.values.clone());
        let Some(values) = values else {
            return self.report(validation_err!(UnknownRecord(id.to_string())));
        };

        self.editing = Some(EditDraft {
            id: id.to_string(),
            values: values.into_iter().map(Some).collect(),
        });
        Ok(())
    }

    /// Sets one cell of the edit draft from operator text.
    pub fn set_edit_text(&mut self, column: usize, text: &str) -> ClientResult<()> {
        let column_type = self.column_type(column)?;
        let Some(draft) = self.editing.as_mut() else {
            return self.report(validation_err!(NotEditing));
        };
        if let Some(cell) = draft.values.get_mut(column) {
            *cell = Some(parse(column_type, text));
        }
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn add_builder_column(&mut self, name: &str, column_type: ColumnType) -> ClientResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return self.report(validation_err!(EmptyName));
        }
        self.builder.columns.push(Column::new(name, column_type));
        Ok(())
    }

    pub fn clear_builder(&mut self) {
        self.builder = TableBuilder::default();
    }

    // ----------------------------- RECORDS ----------------------------- //

    /// Creates a record in the selected table. On success the table is
    /// fetched again and the new-record draft is cleared; on failure the
    /// draft is left as it was.
    pub fn create_record(&mut self, values: &[Option<Value>]) -> ClientResult<Record> {
        let cache = self.require_selection()?;
        let table = cache.table().to_string();
        let prepared = prepare_values(cache.schema(), values);
        let prepared = self.report(prepared.map_err(Into::into))?;

        let result = self.store.create_record(&table, &prepared);
        let record = self.report(result)?;
        info!(table = %table, id = %record.id, "record created");
        self.notifications
            .info(format!("created record {} in {table}", record.id));

        self.new_draft = vec![None; self.new_draft.len()];
        self.reload(&table);
        Ok(record)
    }

    /// Submits the new-record draft.
    pub fn submit_draft(&mut self) -> ClientResult<Record> {
        let values = self.new_draft.clone();
        self.create_record(&values)
    }

    /// Replaces the values of record `id` in the selected table. The edit
    /// draft is dropped only once the store accepts the update.
    pub fn update_record(&mut self, id: &str, values: &[Option<Value>]) -> ClientResult<Record> {
        let cache = self.require_selection()?;
        let table = cache.table().to_string();
        let prepared = prepare_values(cache.schema(), values);
        let prepared = self.report(prepared.map_err(Into::into))?;

        let result = self.store.update_record(&table, id, &prepared);
        let record = self.report(result)?;
        info!(table = %table, id = %id, "record updated");
        self.notifications.info(format!("updated record {id} in {table}"));

        self.editing = None;
        self.reload(&table);
        Ok(record)
    }

    /// Submits the edit draft.
    pub fn submit_edit(&mut self) -> ClientResult<Record> {
        let Some(draft) = self.editing.clone() else {
            return self.report(validation_err!(NotEditing));
        };
        self.update_record(&draft.id, &draft.values)
    }

    /// Deletes record `id` from the selected table. Nothing is sent unless
    /// `confirm` is [`Confirm::Yes`].
    pub fn delete_record(&mut self, id: &str, confirm: Confirm) -> ClientResult<()> {
        let table = self.require_selection()?.table().to_string();
        if confirm != Confirm::Yes {
            return self.report(validation_err!(NotConfirmed));
        }

        let result = self.store.delete_record(&table, id);
        self.report(result)?;
        info!(table = %table, id = %id, "record deleted");
        self.notifications.info(format!("deleted record {id} from {table}"));

        if self.editing.as_ref().is_some_and(|draft| draft.id == id) {
            self.editing = None;
        }
        self.reload(&table);
        Ok(())
    }

    // ------------------------------ TABLES ------------------------------ //

    /// Creates a table and clears the builder. Blank names and empty column
    /// lists are rejected without contacting the store.
    pub fn create_table(&mut self, name: &str, columns: &[Column]) -> ClientResult<()> {
        self.send_create_table(name, columns)?;
        self.clear_builder();
        self.reload_tables();
        Ok(())
    }

    fn send_create_table(&mut self, name: &str, columns: &[Column]) -> ClientResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return self.report(validation_err!(EmptyName));
        }
        if columns.is_empty() {
            return self.report(validation_err!(NoColumns));
        }
        if columns.iter().any(|c| c.name.trim().is_empty()) {
            return self.report(validation_err!(EmptyName));
        }

        let result = self.store.create_table(name, columns);
        self.report(result)?;
        info!(table = %name, columns = columns.len(), "table created");
        self.notifications.info(format!("created table {name}"));
        Ok(())
    }

    /// Creates a table named `name` from the builder's columns.
    pub fn submit_builder(&mut self, name: &str) -> ClientResult<()> {
        let columns = self.builder.columns.clone();
        self.create_table(name, &columns)
    }

    /// Deletes a table. Nothing is sent unless `confirm` is [`Confirm::Yes`].
    pub fn delete_table(&mut self, name: &str, confirm: Confirm) -> ClientResult<()> {
        if name.trim().is_empty() {
            return self.report(validation_err!(EmptyName));
        }
        if confirm != Confirm::Yes {
            return self.report(validation_err!(NotConfirmed));
        }

        let result = self.store.delete_table(name);
        self.report(result)?;
        info!(table = %name, "table deleted");
        self.notifications.info(format!("deleted table {name}"));

        self.clear_selection();
        self.reload_tables();
        Ok(())
    }

    // --------------------------- INTERSECTION --------------------------- //

    /// Asks the store for the records common to `table_a` and `table_b`.
    /// The previous result is replaced only when the request succeeds.
    pub fn intersect(&mut self, table_a: &str, table_b: &str) -> ClientResult<&Intersection> {
        let columns = self
            .selected
            .as_ref()
            .filter(|cache| cache.table() == table_a)
            .map(|cache| cache.columns().to_vec())
            .unwrap_or_default();

        let result = intersection::request(&self.store, table_a, table_b, columns);
        let found = self.report(result)?;
        self.notifications.info(format!(
            "found {} matching rows in {table_a} and {table_b}",
            found.rows.len()
        ));

        Ok(&*self.intersection.insert(found))
    }

    /// Saves the last intersection as table `<a>_<b>_intersection`, using
    /// the columns of the first table. Every row is checked against those
    /// columns before anything is created. The table builder is left alone.
    pub fn save_intersection_as_table(&mut self) -> ClientResult<String> {
        let Some(found) = self.intersection.clone().filter(|i| !i.rows.is_empty()) else {
            return self.report(validation_err!(NothingToSave));
        };

        let columns = if found.columns.is_empty() {
            let result = self.store.table_details(&found.table_a);
            self.report(result)?.schema.columns
        } else {
            found.columns.clone()
        };

        let name = found.table_name();
        let schema = Schema::new(&name, columns.clone());
        let rows = found
            .rows
            .iter()
            .map(|row| {
                let values: Vec<Option<Value>> = row.values.iter().cloned().map(Some).collect();
                prepare_values(&schema, &values)
            })
            .collect::<Result<Vec<_>, _>>();
        let rows = self.report(rows.map_err(Into::into))?;

        self.send_create_table(&name, &columns)?;
        self.reload_tables();
        for values in &rows {
            let result = self.store.create_record(&name, values);
            self.report(result)?;
        }
        info!(table = %name, rows = found.rows.len(), "intersection saved");

        self.intersection = None;
        Ok(name)
    }

    // ------------------------------ HELPERS ------------------------------ //

    /// Queues an error notification for a failed result and hands the
    /// result back unchanged.
    fn report<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(err) = &result {
            self.notifications.error(err);
        }
        result
    }

    /// Refetches `table` after a mutation the store already accepted and
    /// replaces the cache only. Drafts belong to the mutation that owns
    /// them. A failed refetch is reported but does not undo the mutation's
    /// success.
    fn reload(&mut self, table: &str) {
        let result = self.store.table_details(table);
        let Ok(details) = self.report(result) else {
            warn!(table = %table, "refetch after mutation failed");
            return;
        };

        let cache = SchemaCache::from_details(table, details);
        if cache.columns().len() != self.new_draft.len() {
            self.new_draft.resize(cache.columns().len(), None);
        }
        self.selected = Some(cache);
    }

    fn reload_tables(&mut self) {
        if self.refresh_tables().is_err() {
            warn!("table list refresh failed");
        }
    }

    fn require_selection(&mut self) -> ClientResult<&SchemaCache> {
        match self.selected {
            Some(ref cache) => Ok(cache),
            None => {
                let err = ValidationError::NoTableSelected.into();
                self.notifications.error(&err);
                Err(err)
            }
        }
    }

    fn column_type(&mut self, column: usize) -> ClientResult<ColumnType> {
        let columns = self.require_selection()?.columns();
        let len = columns.len();
        let found = columns.get(column).map(|c| c.column_type);
        match found {
            Some(column_type) => Ok(column_type),
            None => self.report(validation_err!(ColumnOutOfRange { index: column, len })),
        }
    }
}
