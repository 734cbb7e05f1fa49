use super::Operation;
use crate::stmt::Row;

#[derive(Debug, Clone)]
pub struct Insert {
    /// Which table to insert into
    pub table: String,

    /// Field values of the new record
    pub values: Row,

    /// Field the driver generates a value for when `values` has none
    pub serial: Option<String>,
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
