//! Application-level schema

mod accessor;
pub use accessor::{Accessors, ReadFn, Reader, WriteFn, Writer};

mod attribute_store;
pub use attribute_store::AttributeStore;

mod fk;
pub use fk::{ForeignKey, ForeignKeyField};

mod hooks;
pub(crate) use hooks::Hooks;
pub use hooks::{InferValidations, RegisterSerialization};

mod model;
pub use model::{Model, ModelId};

mod property;
pub use property::{
    DefaultValue, IndexOption, IndexRef, Lazy, LazyOption, Length, Property, PropertyOptions,
    DEFAULT_LENGTH, DEFAULT_PRECISION, DEFAULT_SCALE,
};

mod property_set;
pub use property_set::PropertySet;

mod relation;
pub use relation::{ManyToOne, RelationshipOptions};

mod resource;
pub use resource::Resource;

mod type_registry;
pub use type_registry::{CustomType, TypeRef, TypeRegistry};

mod visibility;
pub use visibility::Visibility;
