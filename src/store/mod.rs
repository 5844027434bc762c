//! Access to the external table store.
//!
//! The store owns schemas, records and intersection matching; this crate
//! only reaches it through the operations of [`Store`].

pub mod error;
mod http;

pub use http::HttpStore;

use crate::datatypes::{Column, Record, TableDetails, Value};
use crate::ClientResult;

/// One method per store endpoint. Every call is a single blocking request
/// that runs to completion; implementations never retry.
pub trait Store {
    /// Pings the store. `Ok` means it answered with a success status.
    fn health(&self) -> ClientResult<()>;

    fn list_tables(&self) -> ClientResult<Vec<String>>;

    /// Schema and every record of `table`.
    fn table_details(&self, table: &str) -> ClientResult<TableDetails>;

    fn create_table(&self, table: &str, columns: &[Column]) -> ClientResult<()>;

    fn delete_table(&self, table: &str) -> ClientResult<()>;

    fn create_record(&self, table: &str, values: &[Value]) -> ClientResult<Record>;

    fn update_record(&self, table: &str, id: &str, values: &[Value]) -> ClientResult<Record>;

    fn delete_record(&self, table: &str, id: &str) -> ClientResult<()>;

    /// Records of `table_b` whose values match a record of `table_a`.
    fn intersection(&self, table_a: &str, table_b: &str) -> ClientResult<Vec<Record>>;
}
