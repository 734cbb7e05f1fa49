mod num;

mod ty;
pub use ty::{Constants, Type};

mod value;
pub use value::Value;

use indexmap::IndexMap;

/// A record as exchanged with a driver: storage field name to value.
pub type Row = IndexMap<String, Value>;

/// The ordered key values identifying a record.
pub type Key = Vec<Value>;
