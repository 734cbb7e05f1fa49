use super::{ModelId, Property};
use crate::Schema;
use crate::schema::RepositoryName;

use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ForeignKey {
    pub fields: Vec<ForeignKeyField>,
}

#[derive(Debug, Clone)]
pub struct ForeignKeyField {
    /// The property on the child model acting as the foreign key
    pub source: String,

    /// The property on the parent model this key maps to
    pub target: String,
}

impl ForeignKey {
    pub fn source_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|field| field.source.as_str())
    }

    pub fn target_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|field| field.target.as_str())
    }
}

impl ForeignKeyField {
    pub fn source<'a>(
        &self,
        schema: &'a Schema,
        model: ModelId,
        repository: &RepositoryName,
    ) -> Option<&'a Arc<Property>> {
        schema.properties(model, repository).get(&self.source)
    }

    pub fn target<'a>(
        &self,
        schema: &'a Schema,
        model: ModelId,
        repository: &RepositoryName,
    ) -> Option<&'a Arc<Property>> {
        schema.properties(model, repository).get(&self.target)
    }
}
