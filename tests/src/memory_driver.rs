use crate::ExecLog;

use keel_core::driver::{Driver, Operation, Response};
use keel_core::schema::NamingConvention;
use keel_core::stmt::{Key, Row, Value};
use keel_core::Result;

use async_trait::async_trait;

use indexmap::IndexMap;
use std::sync::{Arc, Mutex};

/// Keeps tables in memory and logs every operation it executes. Clones share
/// the same tables and log.
#[derive(Debug, Clone, Default)]
pub struct MemoryDriver {
    naming: NamingConvention,
    tables: Arc<Mutex<IndexMap<String, Table>>>,
    ops: Arc<Mutex<Vec<Operation>>>,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Row>,

    /// Last generated serial value
    serial: i64,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_naming(naming: NamingConvention) -> Self {
        Self {
            naming,
            ..Self::default()
        }
    }

    /// Stores a row directly, bypassing the log. Integer `id` values advance
    /// the table's serial counter.
    pub fn insert_row<K>(&self, table: &str, row: impl IntoIterator<Item = (K, Value)>)
    where
        K: Into<String>,
    {
        let row: Row = row.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(table.to_string()).or_default();

        if let Some(Value::Integer(id)) = row.get("id") {
            table.serial = table.serial.max(*id);
        }

        table.rows.push(row);
    }

    /// A copy of every row in `table`
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map(|table| table.rows.clone())
            .unwrap_or_default()
    }

    pub fn log(&self) -> ExecLog {
        ExecLog::new(self.ops.clone())
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    fn naming_convention(&self) -> NamingConvention {
        self.naming
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        self.ops.lock().unwrap().push(op.clone());

        let mut tables = self.tables.lock().unwrap();
        let table = tables.entry(op.table().to_string()).or_default();

        Ok(match op {
            Operation::GetByKey(op) => Response::values(
                table
                    .rows
                    .iter()
                    .filter(|row| matches(row, &op.key_fields, &op.key))
                    .take(1)
                    .map(|row| project(row, &op.select))
                    .collect(),
            ),
            Operation::LoadFields(op) => {
                let fields = op
                    .key_fields
                    .iter()
                    .chain(&op.fields)
                    .cloned()
                    .collect::<Vec<_>>();

                Response::values(
                    table
                        .rows
                        .iter()
                        .filter(|row| op.keys.iter().any(|key| matches(row, &op.key_fields, key)))
                        .map(|row| project(row, &fields))
                        .collect(),
                )
            }
            Operation::Insert(op) => {
                let mut row = op.values;

                if let Some(field) = op.serial {
                    if row.get(&field).map_or(true, Value::is_null) {
                        table.serial += 1;
                        row.insert(field, Value::Integer(table.serial));
                    }
                }

                table.rows.push(row.clone());
                Response::values(vec![row])
            }
            Operation::UpdateByKey(op) => {
                match table
                    .rows
                    .iter_mut()
                    .find(|row| matches(row, &op.key_fields, &op.key))
                {
                    Some(row) => {
                        row.extend(op.assignments);
                        Response::count(1)
                    }
                    None => Response::count(0),
                }
            }
        })
    }
}

fn matches(row: &Row, key_fields: &[String], key: &Key) -> bool {
    key_fields
        .iter()
        .zip(key)
        .all(|(field, value)| row.get(field).unwrap_or(&Value::Null) == value)
}

fn project(row: &Row, fields: &[String]) -> Row {
    fields
        .iter()
        .map(|field| (field.clone(), row.get(field).cloned().unwrap_or_default()))
        .collect()
}
