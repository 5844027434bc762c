//! Typed values, column definitions and the records exchanged with the store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of column types a table can declare. On the wire a
/// column type is its snake_case name (`"integer"`, `"money_range"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Real,
    Char,
    String,
    Money,
    MoneyRange,
}

impl ColumnType {
    pub const ALL: [ColumnType; 6] = [
        ColumnType::Integer,
        ColumnType::Real,
        ColumnType::Char,
        ColumnType::String,
        ColumnType::Money,
        ColumnType::MoneyRange,
    ];
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "Integer",
            ColumnType::Real => "Real",
            ColumnType::Char => "Char",
            ColumnType::String => "String",
            ColumnType::Money => "Money",
            ColumnType::MoneyRange => "MoneyRange",
        };
        f.write_str(name)
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" => Ok(ColumnType::Integer),
            "real" => Ok(ColumnType::Real),
            "char" => Ok(ColumnType::Char),
            "string" => Ok(ColumnType::String),
            "money" => Ok(ColumnType::Money),
            "money_range" | "moneyrange" => Ok(ColumnType::MoneyRange),
            other => Err(format!("unknown column type: `{other}`")),
        }
    }
}

/// A single typed cell. Exactly one variant is ever populated; the
/// "empty/unset" editor state is modelled as `Option<Value>::None` and never
/// reaches the store.
///
/// Serializes externally tagged, e.g. `{"Integer": 42}` or
/// `{"MoneyRange": [1.5, 2.0]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Real(f64),
    /// Holds at most one character; the default is the empty string.
    Char(String),
    String(String),
    Money(f64),
    MoneyRange(f64, f64),
}

impl Value {
    /// The column type this value may be stored under.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Integer(_) => ColumnType::Integer,
            Value::Real(_) => ColumnType::Real,
            Value::Char(_) => ColumnType::Char,
            Value::String(_) => ColumnType::String,
            Value::Money(_) => ColumnType::Money,
            Value::MoneyRange(_, _) => ColumnType::MoneyRange,
        }
    }

    /// Renders the value as cell text. Never fails.
    ///
    /// `Real` uses the shortest text that parses back to the same `f64`;
    /// `Money` and both ends of a `MoneyRange` are fixed to two decimals and
    /// therefore lose any further precision.
    pub fn format(&self) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Real(r) => r.to_string(),
            Value::Char(c) => c.chars().next().map(String::from).unwrap_or_default(),
            Value::String(s) => s.clone(),
            Value::Money(m) => format!("{m:.2}"),
            Value::MoneyRange(min, max) => format!("{min:.2},{max:.2}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Formats an editor cell, rendering the unset sentinel as empty text.
pub fn format_cell(value: Option<&Value>) -> String {
    value.map(Value::format).unwrap_or_default()
}

/// Renders `records` under a header of `columns`, one tab-separated line
/// per record with the id first. An empty `columns` slice omits the header.
pub fn render_table(columns: &[Column], records: &[Record]) -> String {
    let mut out = String::new();

    if !columns.is_empty() {
        out.push_str("id");
        for column in columns {
            out.push('\t');
            out.push_str(&column.name);
        }
        out.push('\n');
    }

    for record in records {
        out.push_str(&record.id);
        for value in &record.values {
            out.push('\t');
            out.push_str(&value.format());
        }
        out.push('\n');
    }

    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Column {
            name: name.into(),
            column_type,
        }
    }
}

/// Ordered column definitions. Order matters: record values are positional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub name: String,
    pub columns: Vec<Column>,
}

impl Schema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Schema {
            name: name.into(),
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A stored row. `id` is assigned by the store and never invented locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub values: Vec<Value>,
}

/// Body of create/update record requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordPayload {
    pub values: Vec<Value>,
}

/// Response of the table list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableList {
    pub tables: Vec<String>,
}

/// Response of the table details endpoint: the schema plus every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableDetails {
    pub schema: Schema,
    pub rows: Vec<Record>,
}
