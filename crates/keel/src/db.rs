mod builder;
pub use builder::Builder;

use crate::instance::Record;
use crate::{loaded_set::LoadedSet, Instance, Result};

use keel_core::driver::operation::{GetByKey, Insert, LoadFields, UpdateByKey};
use keel_core::schema::app::ModelId;
use keel_core::schema::{Mapping, RepositoryName};
use keel_core::stmt::{Key, Row, Value};
use keel_core::{Driver, Error, Schema};

use indexmap::IndexMap;
use std::sync::Arc;

/// Shared state between all `Db` clones.
#[derive(Debug)]
pub(crate) struct Shared {
    schema: Arc<Schema>,
    repositories: IndexMap<RepositoryName, Repository>,
}

#[derive(Debug)]
struct Repository {
    driver: Arc<dyn Driver>,
    mapping: Mapping,
}

/// A handle bound to one repository context. Cloning is cheap; every clone
/// shares the schema and drivers.
#[derive(Debug, Clone)]
pub struct Db {
    shared: Arc<Shared>,
    repository: RepositoryName,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.shared.schema
    }

    /// Name of the repository this handle operates in.
    pub fn repository_name(&self) -> &RepositoryName {
        &self.repository
    }

    /// Returns a handle operating in the named repository.
    pub fn repository(&self, name: impl Into<RepositoryName>) -> Result<Db> {
        let name = name.into();

        if !self.shared.repositories.contains_key(&name) {
            return Err(Error::invalid_argument_kind(
                "registered repository",
                name.to_string(),
            ));
        }

        Ok(Db {
            shared: self.shared.clone(),
            repository: name,
        })
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.current().driver
    }

    pub fn mapping(&self) -> &Mapping {
        &self.current().mapping
    }

    /// A new, unsaved instance of `model`.
    pub fn instance(&self, model: &str) -> Result<Instance> {
        let model = self.model_id(model)?;
        Ok(Instance::new(
            self.shared.schema.clone(),
            model,
            self.repository.clone(),
        ))
    }

    /// Loads the `model` record with a single-valued key.
    pub async fn get(&self, model: &str, key: impl Into<Value>) -> Result<Option<Instance>> {
        self.get_by_key(model, vec![key.into()]).await
    }

    pub async fn get_by_key(&self, model: &str, key: Key) -> Result<Option<Instance>> {
        let model = self.model_id(model)?;
        let schema = self.shared.schema.clone();
        let properties = schema.properties(model, &self.repository);
        let table = self.mapping().model(model);

        let key_fields = table.fields(properties.key().map(|property| property.name.as_str()))?;
        self.check_key(model, &key_fields, &key)?;

        let op = GetByKey {
            table: table.storage_name.clone(),
            key_fields,
            key,
            select: table.fields(properties.defaults().map(|property| property.name.as_str()))?,
        };

        log::debug!("get {} key={:?}", schema.model_name(model), op.key);

        let rows = self.driver().exec(op.into()).await?.rows.into_values()?;
        Ok(rows.into_iter().next().map(|row| self.hydrate(model, row)))
    }

    /// Loads every `model` record in `keys`. The returned instances load
    /// lazy properties together.
    pub async fn all(&self, model: &str, keys: Vec<Key>) -> Result<Vec<Instance>> {
        let model = self.model_id(model)?;
        let schema = self.shared.schema.clone();
        let properties = schema.properties(model, &self.repository);
        let table = self.mapping().model(model);

        let key_fields = table.fields(properties.key().map(|property| property.name.as_str()))?;
        for key in &keys {
            self.check_key(model, &key_fields, key)?;
        }

        let op = LoadFields {
            table: table.storage_name.clone(),
            key_fields,
            keys,
            fields: table.fields(properties.defaults().map(|property| property.name.as_str()))?,
        };

        log::debug!("load {} keys={:?}", schema.model_name(model), op.keys);

        let rows = self.driver().exec(op.into()).await?.rows.into_values()?;
        let mut instances = rows
            .into_iter()
            .map(|row| self.hydrate(model, row))
            .collect::<Vec<_>>();

        let set = Arc::new(LoadedSet::new(
            instances.iter().map(Instance::key).collect(),
        ));
        for instance in &mut instances {
            instance.record.loaded_set = Some(set.clone());
        }

        Ok(instances)
    }

    pub async fn save(&self, instance: &mut Instance) -> Result<()> {
        instance.save(self).await
    }

    /// Builds a persisted instance from a storage row.
    pub(crate) fn hydrate(&self, model: ModelId, row: Row) -> Instance {
        let table = self.mapping().model(model);
        let mut instance = Instance::new(
            self.shared.schema.clone(),
            model,
            self.repository.clone(),
        );

        for (field, value) in row {
            if let Some(property) = table.property(&field) {
                instance.record.attributes.load(property, value);
            }
        }

        instance.record.persisted = true;
        instance
    }

    pub(crate) async fn insert(&self, record: &mut Record) -> Result<()> {
        let schema = self.shared.schema.clone();
        let properties = schema.properties(record.model, &self.repository);
        let table = self.mapping().model(record.model);

        let mut values = Row::new();
        let mut serial = None;

        for property in properties.iter() {
            let value = property.get(record)?;
            let field = property.field(self.mapping().naming);

            if property.serial && value.is_null() {
                serial = Some(field);
            } else if !value.is_null() || record.attributes.is_loaded(&property.name) {
                values.insert(field, value);
            }
        }

        log::debug!(
            "insert {} into `{}`",
            schema.model_name(record.model),
            table.storage_name
        );

        let op = Insert {
            table: table.storage_name.clone(),
            values,
            serial,
        };

        let rows = self.driver().exec(op.into()).await?.rows.into_values()?;
        for (field, value) in rows.into_iter().next().unwrap_or_default() {
            if let Some(property) = table.property(&field) {
                record.attributes.load(property, value);
            }
        }

        record.persisted = true;
        record.repository = self.repository.clone();
        record.attributes.clear_dirty();
        Ok(())
    }

    pub(crate) async fn update(&self, record: &mut Record) -> Result<()> {
        let schema = self.shared.schema.clone();
        let properties = schema.properties(record.model, &self.repository);
        let table = self.mapping().model(record.model);

        let mut assignments = Row::new();
        for name in record.attributes.dirty() {
            if let (Some(field), Some(value)) = (table.field(name), record.attributes.get(name)) {
                assignments.insert(field.to_string(), value.clone());
            }
        }

        if assignments.is_empty() {
            return Ok(());
        }

        let key = record.key();
        let op = UpdateByKey {
            table: table.storage_name.clone(),
            key_fields: table.fields(properties.key().map(|property| property.name.as_str()))?,
            key: key.clone(),
            assignments,
        };

        log::debug!("update {} key={key:?}", schema.model_name(record.model));

        let count = self.driver().exec(op.into()).await?.rows.into_count()?;
        if count == 0 {
            return Err(Error::record_not_found(format!(
                "{} key={key:?}",
                schema.model_name(record.model)
            )));
        }

        record.attributes.clear_dirty();
        Ok(())
    }

    /// Loads the lazy group `name` belongs to into `record`, sharing one
    /// query across the record's loaded set.
    pub(crate) async fn load_lazy(&self, record: &mut Record, name: &str) -> Result<()> {
        let schema = self.shared.schema.clone();
        let properties = schema.properties(record.model, &self.repository);
        let table = self.mapping().model(record.model);

        let group = properties.lazy_load_context(name);
        if group.is_empty() {
            return Ok(());
        }

        let fields = table.fields(group.iter().map(|property| property.name.as_str()))?;
        let key = record.key();

        let set = record
            .loaded_set
            .get_or_insert_with(|| Arc::new(LoadedSet::new(vec![key.clone()])))
            .clone();

        let row = match set.cached(&key, &fields) {
            Some(row) => {
                log::trace!("lazy load of `{name}` served from the loaded set");
                row
            }
            None => {
                let key_fields =
                    table.fields(properties.key().map(|property| property.name.as_str()))?;

                let op = LoadFields {
                    table: table.storage_name.clone(),
                    key_fields: key_fields.clone(),
                    keys: set.keys().to_vec(),
                    fields: fields.clone(),
                };

                log::debug!(
                    "lazy load {:?} for {} {} records",
                    fields,
                    set.keys().len(),
                    schema.model_name(record.model)
                );

                let rows = self.driver().exec(op.into()).await?.rows.into_values()?;
                set.fill(&key_fields, rows);
                set.cached(&key, &fields).unwrap_or_default()
            }
        };

        for (property, field) in group.iter().zip(&fields) {
            if !record.attributes.is_loaded(&property.name) {
                let value = row.get(field).cloned().unwrap_or_default();
                record.attributes.load(&property.name, value);
            }
        }

        Ok(())
    }

    fn current(&self) -> &Repository {
        &self.shared.repositories[&self.repository]
    }

    fn model_id(&self, name: &str) -> Result<ModelId> {
        self.shared
            .schema
            .model_by_name(name)
            .map(|model| model.id)
            .ok_or_else(|| Error::invalid_argument_kind("declared model name", name))
    }

    fn check_key(&self, model: ModelId, key_fields: &[String], key: &Key) -> Result<()> {
        if key_fields.len() == key.len() {
            return Ok(());
        }

        Err(Error::invalid_argument_kind(
            "key matching the model's key",
            format!("{key:?} for {}", self.shared.schema.model_name(model)),
        ))
    }
}
