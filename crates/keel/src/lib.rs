pub mod db;
pub use db::Db;

mod entity;
pub use entity::Entity;

mod instance;
pub use instance::Instance;

mod loaded_set;

pub mod relation;
pub use relation::BelongsTo;

pub use keel_core::{driver, schema, stmt, Driver, Error, Result, Schema};
