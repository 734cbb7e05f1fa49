use super::{app::ModelId, Name, RepositoryName, Schema};
use crate::{err, Result};

use heck::ToSnakeCase;
use indexmap::IndexMap;

/// How a repository derives storage names from declared names.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingConvention {
    /// `BlogPost` is stored as `blog_posts`; `publishedOn` as `published_on`.
    #[default]
    Underscored,

    /// Names are stored as declared.
    Identity,
}

/// Storage names of every model and property for one repository.
#[derive(Debug, Clone)]
pub struct Mapping {
    pub repository: RepositoryName,
    pub naming: NamingConvention,
    models: IndexMap<ModelId, Model>,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub id: ModelId,

    /// Table or collection name
    pub storage_name: String,

    /// Property name to storage field name
    fields: IndexMap<String, String>,
}

impl NamingConvention {
    pub fn field_name(self, name: &str) -> String {
        match self {
            Self::Underscored => name.to_snake_case(),
            Self::Identity => name.to_string(),
        }
    }

    pub fn storage_name(self, model: &Name) -> String {
        match self {
            Self::Underscored => {
                let mut parts = model.parts.clone();
                if let Some(last) = parts.last_mut() {
                    *last = pluralizer::pluralize(last, 2, false);
                }
                parts.join("_")
            }
            Self::Identity => model.upper_camel_case(),
        }
    }
}

impl Mapping {
    pub fn new(schema: &Schema, repository: RepositoryName, naming: NamingConvention) -> Self {
        let models = schema
            .models()
            .map(|model| {
                let storage_name = match &model.storage_name {
                    Some(name) => name.clone(),
                    None => naming.storage_name(&model.name),
                };

                let fields = model
                    .properties(&repository)
                    .iter()
                    .map(|property| (property.name.clone(), property.field(naming)))
                    .collect();

                let mapping = Model {
                    id: model.id,
                    storage_name,
                    fields,
                };

                (model.id, mapping)
            })
            .collect();

        Self {
            repository,
            naming,
            models,
        }
    }

    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        self.models.get(&id.into()).expect("invalid model ID")
    }
}

impl Model {
    pub fn field(&self, property: &str) -> Option<&str> {
        self.fields.get(property).map(String::as_str)
    }

    /// Storage fields for several properties, in order.
    pub fn fields<'a>(&self, properties: impl IntoIterator<Item = &'a str>) -> Result<Vec<String>> {
        properties
            .into_iter()
            .map(|property| {
                self.field(property)
                    .map(String::from)
                    .ok_or_else(|| err!("`{}` has no storage field for `{property}`", self.storage_name))
            })
            .collect()
    }

    /// The property stored under `field`.
    pub fn property(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(_, stored)| *stored == field)
            .map(|(property, _)| property.as_str())
    }
}
