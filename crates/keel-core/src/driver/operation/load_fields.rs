use super::Operation;
use crate::stmt::Key;

/// Loads `fields` for every record in `keys`. Returned rows carry the key
/// fields so callers can match them back to their records; keys with no
/// record produce no row.
#[derive(Debug, Clone)]
pub struct LoadFields {
    pub table: String,
    pub key_fields: Vec<String>,
    pub keys: Vec<Key>,
    pub fields: Vec<String>,
}

impl From<LoadFields> for Operation {
    fn from(value: LoadFields) -> Self {
        Self::LoadFields(value)
    }
}
