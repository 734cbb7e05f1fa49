use super::{Accessors, Hooks, ManyToOne, Property, PropertySet, Reader};
use crate::schema::{Name, RepositoryName};

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

#[derive(Debug, Clone)]
pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model
    pub name: Name,

    /// Storage name override. Without one, the repository's naming
    /// convention derives it from `name`.
    pub storage_name: Option<String>,

    /// Readers and writers exposed by the model, per repository
    accessors: IndexMap<RepositoryName, Accessors>,

    properties: IndexMap<RepositoryName, PropertySet>,

    relationships: IndexMap<RepositoryName, IndexMap<String, Arc<ManyToOne>>>,

    pub(crate) hooks: Hooks,
}

#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ModelId(pub usize);

impl Model {
    pub(crate) fn new(id: ModelId, name: Name) -> Self {
        let mut properties = IndexMap::new();
        properties.insert(RepositoryName::DEFAULT, PropertySet::default());

        let mut relationships = IndexMap::new();
        relationships.insert(RepositoryName::DEFAULT, IndexMap::new());

        let mut accessors = IndexMap::new();
        accessors.insert(RepositoryName::DEFAULT, Accessors::default());

        Self {
            id,
            name,
            storage_name: None,
            accessors,
            properties,
            relationships,
            hooks: Hooks::default(),
        }
    }

    /// Properties in the given repository context. Repositories without
    /// their own declarations use the default repository's.
    pub fn properties(&self, repository: &RepositoryName) -> &PropertySet {
        self.properties
            .get(repository)
            .unwrap_or_else(|| &self.properties[&RepositoryName::DEFAULT])
    }

    /// Readers and writers in the given repository context, with the same
    /// fallback as [`Model::properties`].
    pub fn accessors(&self, repository: &RepositoryName) -> &Accessors {
        self.accessors
            .get(repository)
            .unwrap_or_else(|| &self.accessors[&RepositoryName::DEFAULT])
    }

    pub fn property(&self, repository: &RepositoryName, name: &str) -> Option<&Arc<Property>> {
        self.properties(repository).get(name)
    }

    /// Relationships in the given repository context, with the same fallback
    /// as [`Model::properties`].
    pub fn relationships(&self, repository: &RepositoryName) -> &IndexMap<String, Arc<ManyToOne>> {
        self.relationships
            .get(repository)
            .unwrap_or_else(|| &self.relationships[&RepositoryName::DEFAULT])
    }

    pub fn relationship(&self, repository: &RepositoryName, name: &str) -> Option<&Arc<ManyToOne>> {
        self.relationships(repository).get(name)
    }

    /// Repositories with their own property declarations.
    pub fn repositories(&self) -> impl Iterator<Item = &RepositoryName> + '_ {
        self.properties.keys()
    }

    /// Adds `property` in `repository` and binds its accessors there.
    ///
    /// The first declaration in a non-default repository starts from a copy
    /// of the default properties and accessors. Declarations in the default
    /// repository also reach every other repository that has not declared
    /// the name itself.
    pub(crate) fn add_property(&mut self, repository: &RepositoryName, property: Arc<Property>) {
        if repository.is_default() {
            for (name, set) in &mut self.properties {
                if name.is_default() || !set.contains(&property.name) {
                    set.insert(property.clone());
                    self.accessors[name].bind_property(&property);
                }
            }
        } else {
            if !self.properties.contains_key(repository) {
                let properties = self.properties[&RepositoryName::DEFAULT].clone();
                let accessors = self.accessors[&RepositoryName::DEFAULT].clone();
                self.properties.insert(repository.clone(), properties);
                self.accessors.insert(repository.clone(), accessors);
            }

            self.properties[repository].insert(property.clone());
            self.accessors[repository].bind_property(&property);
        }
    }

    /// Defines `reader` in every repository.
    pub(crate) fn define_reader(&mut self, reader: Reader) {
        for accessors in self.accessors.values_mut() {
            accessors.define_reader(reader.clone());
        }
    }

    pub(crate) fn add_relationship(&mut self, relationship: ManyToOne) {
        self.relationships
            .entry(relationship.repository.clone())
            .or_default()
            .insert(relationship.name.clone(), Arc::new(relationship));
    }

    /// Relationships declared in any repository.
    pub(crate) fn declared_relationships(&self) -> impl Iterator<Item = &Arc<ManyToOne>> + '_ {
        self.relationships.values().flat_map(|set| set.values())
    }

    pub(crate) fn relationships_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut Arc<ManyToOne>> + '_ {
        self.relationships.values_mut().flat_map(|set| set.values_mut())
    }
}

impl ModelId {
    pub(crate) const fn placeholder() -> Self {
        Self(usize::MAX)
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}

impl From<&Self> for ModelId {
    fn from(src: &Self) -> Self {
        *src
    }
}

impl fmt::Debug for ModelId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ModelId({})", self.0)
    }
}
