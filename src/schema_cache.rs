//! The selected table's schema and records, exactly as last fetched.

use crate::datatypes::{Column, ColumnType, Record, Schema, TableDetails};

/// Snapshot of one table. It is only ever replaced as a whole, never
/// patched, so it always reflects a single response from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaCache {
    table: String,
    schema: Schema,
    records: Vec<Record>,
}

impl SchemaCache {
    pub fn from_details(table: impl Into<String>, details: TableDetails) -> Self {
        SchemaCache {
            table: table.into(),
            schema: details.schema,
            records: details.rows,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn columns(&self) -> &[Column] {
        &self.schema.columns
    }

    pub fn column_types(&self) -> impl Iterator<Item = ColumnType> + '_ {
        self.schema.columns.iter().map(|c| c.column_type)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::datatypes::Value;

    #[test]
    fn test_lookup() {
        let details = TableDetails {
            schema: Schema::new("people", vec![Column::new("age", ColumnType::Integer)]),
            rows: vec![
                Record {
                    id: "0".to_string(),
                    values: vec![Value::Integer(3)],
                },
                Record {
                    id: "7".to_string(),
                    values: vec![Value::Integer(9)],
                },
            ],
        };
        let cache = SchemaCache::from_details("people", details);

        assert_eq!(cache.table(), "people");
        assert_eq!(cache.column_types().collect::<Vec<_>>(), vec![ColumnType::Integer]);
        assert_eq!(cache.record("7").map(|r| &r.values[0]), Some(&Value::Integer(9)));
        assert!(cache.record("1").is_none());
    }
}
