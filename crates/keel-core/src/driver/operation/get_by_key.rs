use super::Operation;
use crate::stmt::Key;

#[derive(Debug, Clone)]
pub struct GetByKey {
    /// Which table to get from
    pub table: String,

    /// Fields the key values are matched against
    pub key_fields: Vec<String>,

    /// Which key to fetch
    pub key: Key,

    /// Which fields to select
    pub select: Vec<String>,
}

impl From<GetByKey> for Operation {
    fn from(value: GetByKey) -> Self {
        Self::GetByKey(value)
    }
}
