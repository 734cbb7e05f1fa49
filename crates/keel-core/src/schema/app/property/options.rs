use super::DefaultValue;
use crate::schema::app::{Resource, Visibility};
use crate::stmt::Value;
use crate::{Error, Result};

use serde::{Deserialize, Deserializer};
use std::{ops::RangeInclusive, sync::Arc};

/// Options accepted when declaring a property.
///
/// Every field is optional; unset fields fall back to defaults derived from
/// the property's type and the other options. When options arrive as data
/// (see [`PropertyOptions::from_json`]) only these keys are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyOptions {
    /// Sets both reader and writer visibility.
    pub accessor: Option<Visibility>,
    pub reader: Option<Visibility>,
    pub writer: Option<Visibility>,

    /// `true`, `false`, or the name of a lazy-load group.
    pub lazy: Option<LazyOption>,

    #[serde(default, deserialize_with = "literal_default")]
    pub default: Option<DefaultValue>,

    pub key: Option<bool>,
    pub serial: Option<bool>,

    /// Storage field name override.
    pub field: Option<String>,

    pub length: Option<Length>,
    pub index: Option<IndexOption>,
    pub unique_index: Option<IndexOption>,
    pub unique: Option<bool>,
    pub nullable: Option<bool>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub auto_validation: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LazyOption {
    Enabled(bool),
    Group(String),
}

/// A maximum length, or an inclusive `[min, max]` range of lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Length {
    Exact(u64),
    Range(u64, u64),
}

/// `true` indexes the property on its own; a name (or several) places it in
/// the named, possibly composite, indexes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IndexOption {
    Enabled(bool),
    Name(String),
    Names(Vec<String>),
}

impl PropertyOptions {
    /// Keys accepted in data-driven declarations.
    pub const KEYS: &'static [&'static str] = &[
        "accessor",
        "reader",
        "writer",
        "lazy",
        "default",
        "key",
        "serial",
        "field",
        "length",
        "index",
        "unique_index",
        "unique",
        "nullable",
        "precision",
        "scale",
        "auto_validation",
    ];

    pub fn new() -> Self {
        <Self as Default>::default()
    }

    /// Reads options for `model::property` from a JSON object.
    pub fn from_json(model: &str, property: &str, value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = &value else {
            return Err(Error::invalid_argument_kind("option map", value.to_string()));
        };

        if let Some(key) = map.keys().find(|key| !Self::KEYS.contains(&key.as_str())) {
            return Err(Error::invalid_property_definition(
                model,
                property,
                format!("unknown option `{key}`"),
            ));
        }

        serde_json::from_value(value)
            .map_err(|err| Error::invalid_property_definition(model, property, err.to_string()))
    }

    pub fn accessor(mut self, visibility: Visibility) -> Self {
        self.accessor = Some(visibility);
        self
    }

    pub fn reader(mut self, visibility: Visibility) -> Self {
        self.reader = Some(visibility);
        self
    }

    pub fn writer(mut self, visibility: Visibility) -> Self {
        self.writer = Some(visibility);
        self
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = Some(LazyOption::Enabled(lazy));
        self
    }

    pub fn lazy_group(mut self, group: impl Into<String>) -> Self {
        self.lazy = Some(LazyOption::Group(group.into()));
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Value(value.into()));
        self
    }

    /// Computes the default from the resource and the property at the time
    /// it is first needed.
    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn Resource, &super::Property) -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Computed(Arc::new(f)));
        self
    }

    pub fn key(mut self, key: bool) -> Self {
        self.key = Some(key);
        self
    }

    pub fn serial(mut self, serial: bool) -> Self {
        self.serial = Some(serial);
        self
    }

    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.field = Some(name.into());
        self
    }

    pub fn length(mut self, length: impl Into<Length>) -> Self {
        self.length = Some(length.into());
        self
    }

    pub fn index(mut self, index: impl Into<IndexOption>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn unique_index(mut self, index: impl Into<IndexOption>) -> Self {
        self.unique_index = Some(index.into());
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn auto_validation(mut self, enabled: bool) -> Self {
        self.auto_validation = Some(enabled);
        self
    }
}

impl Length {
    pub fn max(self) -> u64 {
        match self {
            Self::Exact(max) | Self::Range(_, max) => max,
        }
    }
}

impl From<u64> for Length {
    fn from(value: u64) -> Self {
        Self::Exact(value)
    }
}

impl From<RangeInclusive<u64>> for Length {
    fn from(value: RangeInclusive<u64>) -> Self {
        Self::Range(*value.start(), *value.end())
    }
}

impl IndexOption {
    /// Index names this option places the property in. `true` uses the
    /// property's own name.
    pub fn names(&self, property: &str) -> Vec<String> {
        match self {
            Self::Enabled(true) => vec![property.to_string()],
            Self::Enabled(false) => vec![],
            Self::Name(name) => vec![name.clone()],
            Self::Names(names) => names.clone(),
        }
    }
}

impl From<bool> for IndexOption {
    fn from(value: bool) -> Self {
        Self::Enabled(value)
    }
}

impl From<&str> for IndexOption {
    fn from(value: &str) -> Self {
        Self::Name(value.to_string())
    }
}

impl From<Vec<&str>> for IndexOption {
    fn from(value: Vec<&str>) -> Self {
        Self::Names(value.into_iter().map(String::from).collect())
    }
}

fn literal_default<'de, D>(deserializer: D) -> std::result::Result<Option<DefaultValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(Some(DefaultValue::Value(value.into())))
}
