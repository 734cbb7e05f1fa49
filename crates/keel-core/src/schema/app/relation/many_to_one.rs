use crate::driver::{operation::GetByKey, Driver};
use crate::schema::app::{ForeignKey, Model, ModelId, Resource};
use crate::schema::{Mapping, Name, RepositoryName};
use crate::stmt::{Key, Row, Value};
use crate::{Error, Result, Schema};

use serde::{Deserialize, Deserializer};
use std::future::Future;

/// A many-to-one relationship from a child model to its parent.
#[derive(Debug, Clone)]
pub struct ManyToOne {
    /// Name of the association on the child
    pub name: String,

    /// Child model, which holds the foreign key
    pub source: ModelId,

    /// Parent model. Resolved from `target_name` when the schema is built.
    pub target: ModelId,

    /// Class name of the parent model
    pub target_name: String,

    /// Repository context the relationship was declared in
    pub repository: RepositoryName,

    /// Whether the child may exist without a parent
    pub nullable: bool,

    /// Child key properties paired with parent key properties
    pub foreign_key: ForeignKey,

    pub options: RelationshipOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipOptions {
    pub class_name: Option<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub child_key: Option<Vec<String>>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub parent_key: Option<Vec<String>>,

    pub nullable: Option<bool>,
}

impl ManyToOne {
    pub(crate) fn new(
        name: &str,
        source: ModelId,
        repository: RepositoryName,
        options: RelationshipOptions,
    ) -> Self {
        let target_name = match &options.class_name {
            Some(class_name) => class_name.clone(),
            None => Name::new(name).upper_camel_case(),
        };

        Self {
            name: name.to_string(),
            source,
            target: ModelId::placeholder(),
            target_name,
            repository,
            nullable: options.nullable.unwrap_or(true),
            foreign_key: ForeignKey::default(),
            options,
        }
    }

    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }

    /// Current values of the child key properties. Unset values are null.
    pub fn child_key(&self, child: &dyn Resource) -> Key {
        self.foreign_key
            .source_names()
            .map(|name| child.attributes().get(name).cloned().unwrap_or_default())
            .collect()
    }

    /// Values of the parent key properties on `parent`.
    pub fn parent_key(&self, parent: &dyn Resource) -> Key {
        self.foreign_key
            .target_names()
            .map(|name| parent.attributes().get(name).cloned().unwrap_or_default())
            .collect()
    }

    /// Fetches the parent row for `child`. `mapping` and `driver` must belong
    /// to the relationship's repository.
    pub fn get_parent<'a>(
        &'a self,
        schema: &'a Schema,
        mapping: &'a Mapping,
        driver: &'a dyn Driver,
        child: &dyn Resource,
    ) -> impl Future<Output = Result<Option<Row>>> + Send + 'a {
        let key = self.child_key(child);
        self.lookup(schema, mapping, driver, key)
    }

    /// Fetches the parent row identified by `key`, a child key as returned by
    /// [`ManyToOne::child_key`]. A key with any null value has no parent and
    /// does not reach storage.
    pub async fn lookup(
        &self,
        schema: &Schema,
        mapping: &Mapping,
        driver: &dyn Driver,
        key: Key,
    ) -> Result<Option<Row>> {
        if key.is_empty() || key.iter().any(Value::is_null) {
            log::debug!("{}: child key is unset; no parent", self.name);
            return Ok(None);
        }

        let target = self.target(schema);
        let table = mapping.model(self.target);

        let key_fields = table.fields(self.foreign_key.target_names())?;
        let select = table.fields(
            target
                .properties(&self.repository)
                .defaults()
                .map(|property| property.name.as_str()),
        )?;

        log::debug!(
            "{}: loading {} key={:?}",
            self.name,
            target.name.upper_camel_case(),
            key
        );

        let op = GetByKey {
            table: table.storage_name.clone(),
            key_fields,
            key,
            select,
        };

        let rows = driver.exec(op.into()).await?.rows.into_values()?;
        Ok(rows.into_iter().next())
    }

    /// Copies the parent key into the child key properties, or nulls them
    /// when there is no parent.
    pub fn attach_parent(
        &self,
        child: &mut dyn Resource,
        parent: Option<&dyn Resource>,
    ) -> Result<()> {
        let schema = child.schema();

        if child.model_id() != self.source {
            return Err(Error::type_mismatch(
                schema.model_name(self.source),
                schema.model_name(child.model_id()),
            ));
        }

        let values = match parent {
            Some(parent) if parent.model_id() != self.target => {
                return Err(Error::type_mismatch(
                    schema.model_name(self.target),
                    schema.model_name(parent.model_id()),
                ));
            }
            Some(parent) => self.parent_key(parent),
            None => vec![Value::Null; self.foreign_key.fields.len()],
        };

        let properties = self
            .foreign_key
            .fields
            .iter()
            .map(|field| {
                field
                    .source(schema, self.source, &self.repository)
                    .cloned()
                    .ok_or_else(|| {
                        Error::undefined_accessor(schema.model_name(self.source), &field.source)
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        for (property, value) in properties.iter().zip(values) {
            property.set(child, value)?;
        }

        Ok(())
    }
}

impl RelationshipOptions {
    pub const KEYS: &'static [&'static str] = &["class_name", "child_key", "parent_key", "nullable"];

    pub fn new() -> Self {
        Self::default()
    }

    /// Reads options for `model::name` from a JSON object.
    pub fn from_json(model: &str, name: &str, value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = &value else {
            return Err(Error::invalid_argument_kind("option map", value.to_string()));
        };

        if let Some(key) = map.keys().find(|key| !Self::KEYS.contains(&key.as_str())) {
            return Err(Error::invalid_property_definition(
                model,
                name,
                format!("unknown option `{key}`"),
            ));
        }

        serde_json::from_value(value)
            .map_err(|err| Error::invalid_property_definition(model, name, err.to_string()))
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn child_key<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.child_key = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn parent_key<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.parent_key = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(Some(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    }))
}
