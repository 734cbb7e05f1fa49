pub mod app;
use app::{ManyToOne, Model, ModelId, PropertySet, TypeRegistry};

mod builder;
pub use builder::{Builder, ModelBuilder};

pub mod mapping;
pub use mapping::{Mapping, NamingConvention};

mod name;
pub use name::Name;

mod repository;
pub use repository::RepositoryName;

use indexmap::IndexMap;
use std::sync::Arc;

/// Every declared model, along with the type registry their properties
/// resolve against. Built once and read-only afterwards.
#[derive(Debug, Default)]
pub struct Schema {
    pub models: IndexMap<ModelId, Model>,
    pub types: TypeRegistry,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Get a model by ID
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }

    /// Finds a model by class name, e.g. `BlogPost`.
    pub fn model_by_name(&self, name: &str) -> Option<&Model> {
        let name = Name::new(name).upper_camel_case();
        self.models()
            .find(|model| model.name.upper_camel_case() == name)
    }

    /// Class name of a model, for messages.
    pub fn model_name(&self, id: ModelId) -> String {
        match self.models.get(&id) {
            Some(model) => model.name.upper_camel_case(),
            None => format!("{id:?}"),
        }
    }

    pub fn properties(&self, model: impl Into<ModelId>, repository: &RepositoryName) -> &PropertySet {
        self.model(model).properties(repository)
    }

    pub fn relationships(
        &self,
        model: impl Into<ModelId>,
        repository: &RepositoryName,
    ) -> &IndexMap<String, Arc<ManyToOne>> {
        self.model(model).relationships(repository)
    }
}
