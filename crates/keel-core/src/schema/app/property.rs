mod options;
pub use options::{IndexOption, LazyOption, Length, PropertyOptions};

use super::{ModelId, Resource, TypeRef, TypeRegistry, Visibility};
use crate::schema::{Name, NamingConvention};
use crate::stmt::{Type, Value};
use crate::{Error, Result};

use std::{fmt, sync::Arc};

/// Length given to string-like properties that do not declare one.
pub const DEFAULT_LENGTH: u64 = 50;

/// Scale given to fractional properties that do not declare one.
pub const DEFAULT_SCALE: u32 = 10;

/// Precision given to fractional properties that do not declare one.
pub const DEFAULT_PRECISION: u32 = 0;

/// Describes one declared attribute of a model: its type, storage mapping,
/// and how it is read and written on a resource.
#[derive(Debug, Clone)]
pub struct Property {
    /// Model the property is declared on
    pub model: ModelId,

    /// Name of the property, without any trailing `?`
    pub name: String,

    /// Storage field name override
    pub storage_name: Option<String>,

    /// Type as declared
    pub ty: TypeRef,

    /// Primitive the declared type resolves to
    pub primitive: Type,

    pub reader_visibility: Visibility,
    pub writer_visibility: Visibility,

    pub lazy: Lazy,
    pub nullable: bool,
    pub key: bool,
    pub serial: bool,
    pub unique: bool,

    /// Indexes the property takes part in
    pub indexes: Vec<IndexRef>,

    /// Set for string-like primitives
    pub length: Option<u64>,

    /// Set for fractional primitives
    pub scale: Option<u32>,

    /// Set for fractional primitives
    pub precision: Option<u32>,

    pub default: Option<DefaultValue>,

    /// When `false`, validation inference skips this property.
    pub auto_validation: bool,
}

/// Whether a property loads with the record or on first access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lazy {
    Eager,

    /// Loaded on first access, together with every other property in the
    /// same group.
    Group(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexRef {
    pub name: String,
    pub unique: bool,
}

#[derive(Clone)]
pub enum DefaultValue {
    Value(Value),
    Computed(Arc<dyn Fn(&dyn Resource, &Property) -> Value + Send + Sync>),
}

impl Property {
    pub(crate) fn new(
        model: ModelId,
        model_name: &Name,
        name: &str,
        ty: TypeRef,
        options: PropertyOptions,
        types: &TypeRegistry,
    ) -> Result<Property> {
        let invalid = |reason: String| {
            Error::invalid_property_definition(model_name.upper_camel_case(), name, reason)
        };

        let Some(primitive) = types.resolve(&ty) else {
            return Err(invalid(format!("unsupported type `{ty}`")));
        };
        let custom = types.custom(&ty);

        let serial = options.serial.unwrap_or(false);
        let key = options.key.unwrap_or(false) || serial;

        if serial && primitive != Type::Integer {
            return Err(invalid(format!("serial property must be an Integer, not `{ty}`")));
        }

        if let Some(Length::Range(min, max)) = options.length {
            if min > max {
                return Err(invalid(format!("length range {min}..={max} is empty")));
            }
        }

        let lazy = match options.lazy {
            _ if key => Lazy::Eager,
            Some(LazyOption::Enabled(false)) => Lazy::Eager,
            Some(LazyOption::Enabled(true)) => Lazy::Group(Lazy::DEFAULT_GROUP.to_string()),
            Some(LazyOption::Group(group)) => Lazy::Group(group),
            None if primitive == Type::Text || custom.is_some_and(|c| c.lazy) => {
                Lazy::Group(Lazy::DEFAULT_GROUP.to_string())
            }
            None => Lazy::Eager,
        };

        let default = match options.default {
            Some(default) => Some(default),
            None if primitive == Type::Discriminator => Some(DefaultValue::Value(Value::Class(
                model_name.upper_camel_case(),
            ))),
            None => None,
        };

        let has_default = match &default {
            Some(DefaultValue::Value(value)) => !value.is_null(),
            Some(DefaultValue::Computed(_)) => true,
            None => false,
        };

        let nullable = if key {
            false
        } else {
            options.nullable.unwrap_or(!has_default)
        };

        let length = primitive.is_string_like().then(|| {
            options
                .length
                .map(Length::max)
                .or(custom.and_then(|c| c.length))
                .unwrap_or(DEFAULT_LENGTH)
        });

        let (scale, precision) = if primitive.is_fractional() {
            (
                Some(options.scale.unwrap_or(DEFAULT_SCALE)),
                Some(options.precision.unwrap_or(DEFAULT_PRECISION)),
            )
        } else {
            (None, None)
        };

        let mut indexes = vec![];
        for (option, unique) in [(&options.index, false), (&options.unique_index, true)] {
            if let Some(option) = option {
                indexes.extend(
                    option
                        .names(name)
                        .into_iter()
                        .map(|name| IndexRef { name, unique }),
                );
            }
        }

        Ok(Property {
            model,
            name: name.to_string(),
            storage_name: options.field,
            ty,
            primitive,
            reader_visibility: options.reader.or(options.accessor).unwrap_or_default(),
            writer_visibility: options.writer.or(options.accessor).unwrap_or_default(),
            lazy,
            nullable,
            key,
            serial,
            unique: options.unique.unwrap_or(key),
            indexes,
            length,
            scale,
            precision,
            default,
            auto_validation: options.auto_validation.unwrap_or(true),
        })
    }

    /// Storage field name under the given naming convention.
    pub fn field(&self, naming: NamingConvention) -> String {
        match &self.storage_name {
            Some(name) => name.clone(),
            None => naming.field_name(&self.name),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.lazy, Lazy::Group(_))
    }

    pub fn lazy_group(&self) -> Option<&str> {
        match &self.lazy {
            Lazy::Eager => None,
            Lazy::Group(group) => Some(group),
        }
    }

    /// Name of the predicate alias generated for boolean properties.
    pub fn predicate_name(&self) -> Option<String> {
        self.primitive
            .is_bool()
            .then(|| format!("{}?", self.name))
    }

    /// Reads the property from `resource`.
    ///
    /// A new resource with no value yet gets the default, which is stored
    /// back as if it had been assigned.
    pub fn get(&self, resource: &mut dyn Resource) -> Result<Value> {
        self.check(&*resource)?;

        if let Some(value) = resource.attributes().get(&self.name) {
            return Ok(value.clone());
        }

        if !resource.is_new() {
            return Ok(Value::Null);
        }

        let default = self.default_for(&*resource);
        if default.is_null() {
            return Ok(default);
        }

        self.set(resource, default)?;
        Ok(resource
            .attributes()
            .get(&self.name)
            .cloned()
            .unwrap_or_default())
    }

    /// Coerces `value` and stores it on `resource`, marking it dirty.
    pub fn set(&self, resource: &mut dyn Resource, value: Value) -> Result<()> {
        self.check(&*resource)?;

        let value = self.typecast(value, &resource.schema().types)?;

        if self.key
            && value.is_null()
            && resource
                .attributes()
                .get(&self.name)
                .is_some_and(|current| !current.is_null())
        {
            return Err(Error::invalid_argument_kind(
                "non-null key value",
                format!("null for `{}`", self.name),
            ));
        }

        resource.attributes_mut().set(&self.name, value);
        Ok(())
    }

    pub fn typecast(&self, value: Value, types: &TypeRegistry) -> Result<Value> {
        types.cast(&self.primitive, value)
    }

    pub fn default_for(&self, resource: &dyn Resource) -> Value {
        match &self.default {
            None => Value::Null,
            Some(DefaultValue::Value(value)) => value.clone(),
            Some(DefaultValue::Computed(f)) => f(resource, self),
        }
    }

    fn check(&self, resource: &dyn Resource) -> Result<()> {
        if resource.model_id() == self.model {
            return Ok(());
        }

        let schema = resource.schema();
        Err(Error::type_mismatch(
            schema.model_name(self.model),
            schema.model_name(resource.model_id()),
        ))
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.model == other.model && self.name == other.name
    }
}

impl Eq for Property {}

impl std::hash::Hash for Property {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.model.hash(state);
        self.name.hash(state);
    }
}

impl Lazy {
    pub const DEFAULT_GROUP: &'static str = "default";
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}
