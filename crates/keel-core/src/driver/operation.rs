mod get_by_key;
pub use get_by_key::GetByKey;

mod insert;
pub use insert::Insert;

mod load_fields;
pub use load_fields::LoadFields;

mod update_by_key;
pub use update_by_key::UpdateByKey;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Get a single record by key
    GetByKey(GetByKey),

    /// Load a set of fields for several records at once
    LoadFields(LoadFields),

    /// Create a new record
    Insert(Insert),

    /// Update a record by key
    UpdateByKey(UpdateByKey),
}

impl Operation {
    pub fn table(&self) -> &str {
        match self {
            Self::GetByKey(op) => &op.table,
            Self::LoadFields(op) => &op.table,
            Self::Insert(op) => &op.table,
            Self::UpdateByKey(op) => &op.table,
        }
    }

    pub fn is_get_by_key(&self) -> bool {
        matches!(self, Self::GetByKey(_))
    }

    pub fn is_load_fields(&self) -> bool {
        matches!(self, Self::LoadFields(_))
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Self::Insert(_))
    }

    pub fn is_update_by_key(&self) -> bool {
        matches!(self, Self::UpdateByKey(_))
    }
}
