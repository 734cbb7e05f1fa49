use crate::{loaded_set::LoadedSet, BelongsTo, Db, Result};

use keel_core::schema::app::{
    AttributeStore, ManyToOne, Model, ModelId, Property, Reader, Resource,
};
use keel_core::schema::RepositoryName;
use keel_core::stmt::{Key, Value};
use keel_core::{Error, Schema};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

/// A record of a declared model, along with the relationship proxies it has
/// touched.
pub struct Instance {
    pub(crate) record: Record,
    associations: IndexMap<String, BelongsTo>,
}

/// The state shared with the schema layer through [`Resource`].
pub(crate) struct Record {
    pub(crate) schema: Arc<Schema>,
    pub(crate) model: ModelId,

    /// Repository the record was loaded from or last saved to
    pub(crate) repository: RepositoryName,

    pub(crate) attributes: AttributeStore,
    pub(crate) persisted: bool,
    pub(crate) loaded_set: Option<Arc<LoadedSet>>,
}

impl Record {
    pub(crate) fn key(&self) -> Key {
        self.schema
            .properties(self.model, &self.repository)
            .key()
            .map(|property| {
                self.attributes
                    .get(&property.name)
                    .cloned()
                    .unwrap_or_default()
            })
            .collect()
    }
}

impl Resource for Record {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn model_id(&self) -> ModelId {
        self.model
    }

    fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.attributes
    }

    fn is_new(&self) -> bool {
        !self.persisted
    }
}

impl Instance {
    pub(crate) fn new(schema: Arc<Schema>, model: ModelId, repository: RepositoryName) -> Self {
        Self {
            record: Record {
                schema,
                model,
                repository,
                attributes: AttributeStore::new(),
                persisted: false,
                loaded_set: None,
            },
            associations: IndexMap::new(),
        }
    }

    pub fn model(&self) -> &Model {
        self.record.schema.model(self.record.model)
    }

    pub fn model_id(&self) -> ModelId {
        self.record.model
    }

    pub fn model_name(&self) -> String {
        self.record.schema.model_name(self.record.model)
    }

    pub fn repository(&self) -> &RepositoryName {
        &self.record.repository
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.record.attributes
    }

    pub fn is_new(&self) -> bool {
        !self.record.persisted
    }

    /// Values of the key properties. Unset values are null.
    pub fn key(&self) -> Key {
        self.record.key()
    }

    /// Calls the public reader `name`, loading its lazy group first when
    /// needed.
    pub async fn get(&mut self, db: &Db, name: &str) -> Result<Value> {
        let reader = self
            .model()
            .accessors(&self.record.repository)
            .public_reader(name)
            .cloned()
            .ok_or_else(|| Error::undefined_accessor(self.model_name(), name))?;

        self.read(db, &reader).await
    }

    /// Calls the public writer `name`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let writer = self
            .model()
            .accessors(&self.record.repository)
            .public_writer(name)
            .cloned()
            .ok_or_else(|| Error::undefined_accessor(self.model_name(), name))?;

        writer.call(&mut self.record, value.into())
    }

    /// Reads a property regardless of its reader's visibility.
    pub async fn attribute_get(&mut self, db: &Db, name: &str) -> Result<Value> {
        let property = self.property(name)?;
        self.ensure_loaded(db, name).await?;
        property.get(&mut self.record)
    }

    /// Writes a property regardless of its writer's visibility.
    pub fn attribute_set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.property(name)?.set(&mut self.record, value.into())
    }

    /// The parent reached through relationship `name`, loading it on first
    /// access. `None` when the child has no parent.
    pub async fn association(&mut self, db: &Db, name: &str) -> Result<Option<&mut BelongsTo>> {
        let relationship = self.relationship(name)?;
        let Instance {
            record,
            associations,
        } = self;

        let proxy = proxy(associations, record, relationship);
        let found = proxy.resolve_for(db, record).await?.is_some();

        Ok(found.then_some(proxy))
    }

    /// The proxy for relationship `name`, without loading the parent.
    pub fn belongs_to(&mut self, name: &str) -> Result<&mut BelongsTo> {
        let relationship = self.relationship(name)?;
        Ok(proxy(&mut self.associations, &self.record, relationship))
    }

    /// Assigns the parent of relationship `name`. A parent that has not been
    /// saved yet is attached when this instance is saved.
    pub fn set_association(&mut self, name: &str, parent: Option<Instance>) -> Result<()> {
        let relationship = self.relationship(name)?;
        let Instance {
            record,
            associations,
        } = self;

        associations
            .entry(relationship.name.clone())
            .or_insert_with(|| BelongsTo::new(relationship))
            .replace(record, parent)
    }

    /// Saves pending parents, then inserts or updates this record in the
    /// repository `db` operates in.
    pub async fn save(&mut self, db: &Db) -> Result<()> {
        let Instance {
            record,
            associations,
        } = self;

        for proxy in associations.values_mut() {
            proxy.save(db, record).await?;
        }

        if record.persisted {
            db.update(record).await
        } else {
            db.insert(record).await
        }
    }

    async fn read(&mut self, db: &Db, reader: &Reader) -> Result<Value> {
        if let Some(property) = &reader.property {
            self.ensure_loaded(db, property).await?;
        }

        reader.call(&mut self.record)
    }

    async fn ensure_loaded(&mut self, db: &Db, name: &str) -> Result<()> {
        if !self.record.persisted || self.record.attributes.is_loaded(name) {
            return Ok(());
        }

        db.repository(&self.record.repository)?
            .load_lazy(&mut self.record, name)
            .await
    }

    fn property(&self, name: &str) -> Result<Arc<Property>> {
        self.record
            .schema
            .properties(self.record.model, &self.record.repository)
            .get(name)
            .cloned()
            .ok_or_else(|| Error::undefined_accessor(self.model_name(), name))
    }

    fn relationship(&self, name: &str) -> Result<Arc<ManyToOne>> {
        self.record
            .schema
            .relationships(self.record.model, &self.record.repository)
            .get(name)
            .cloned()
            .ok_or_else(|| Error::undefined_accessor(self.model_name(), name))
    }
}

/// Returns the proxy for `relationship`, creating it on first use, with its
/// child key brought up to date.
fn proxy<'a>(
    associations: &'a mut IndexMap<String, BelongsTo>,
    record: &Record,
    relationship: Arc<ManyToOne>,
) -> &'a mut BelongsTo {
    let proxy = associations
        .entry(relationship.name.clone())
        .or_insert_with(|| BelongsTo::new(relationship));

    proxy.sync_child_key(record);
    proxy
}

impl Resource for Instance {
    fn schema(&self) -> &Schema {
        &self.record.schema
    }

    fn model_id(&self) -> ModelId {
        self.record.model
    }

    fn attributes(&self) -> &AttributeStore {
        &self.record.attributes
    }

    fn attributes_mut(&mut self) -> &mut AttributeStore {
        &mut self.record.attributes
    }

    fn is_new(&self) -> bool {
        !self.record.persisted
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("model", &self.model_name())
            .field("repository", &self.record.repository)
            .field("persisted", &self.record.persisted)
            .field("attributes", &self.record.attributes)
            .field("associations", &self.associations)
            .finish()
    }
}
