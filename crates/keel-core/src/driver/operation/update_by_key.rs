use super::Operation;
use crate::stmt::{Key, Row};

#[derive(Debug, Clone)]
pub struct UpdateByKey {
    /// Which table to update
    pub table: String,

    pub key_fields: Vec<String>,

    /// Which record to update
    pub key: Key,

    /// Fields to assign
    pub assignments: Row,
}

impl From<UpdateByKey> for Operation {
    fn from(value: UpdateByKey) -> Self {
        Self::UpdateByKey(value)
    }
}
