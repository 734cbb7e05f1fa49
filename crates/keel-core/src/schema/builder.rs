use super::{name, Name, RepositoryName, Schema};
use crate::schema::app::{
    CustomType, ForeignKey, ForeignKeyField, InferValidations, ManyToOne, Model, ModelId,
    Property, PropertyOptions, Reader, RegisterSerialization, RelationshipOptions, Resource,
    TypeRef, TypeRegistry, Visibility,
};
use crate::stmt::Value;
use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    models: IndexMap<ModelId, Model>,
    types: TypeRegistry,
}

/// Declares the members of one model.
pub struct ModelBuilder<'a> {
    model: &'a mut Model,
    types: &'a TypeRegistry,
    repository: RepositoryName,
}

/// A relationship resolved against its target, waiting to be applied.
struct Resolution {
    model: ModelId,
    repository: RepositoryName,
    name: String,
    target: ModelId,
    fields: Vec<ForeignKeyField>,

    /// Child key properties to declare, with their types
    missing: Vec<(String, TypeRef)>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_type(&mut self, custom: CustomType) -> &mut Self {
        self.types.register(custom);
        self
    }

    /// Declares (or reopens) the model named `name`.
    pub fn model<F>(&mut self, name: &str, f: F) -> Result<ModelId>
    where
        F: FnOnce(&mut ModelBuilder<'_>) -> Result<()>,
    {
        let name = Name::new(name::identifier(name)?);

        let existing = self
            .models
            .values()
            .find(|model| model.name == name)
            .map(|model| model.id);

        let id = match existing {
            Some(id) => id,
            None => {
                let id = ModelId(self.models.len());
                self.models.insert(id, Model::new(id, name));
                id
            }
        };

        let mut builder = ModelBuilder {
            model: &mut self.models[&id],
            types: &self.types,
            repository: RepositoryName::DEFAULT,
        };

        f(&mut builder)?;
        Ok(id)
    }

    /// Resolves relationship targets and foreign keys, declaring child key
    /// properties that do not exist yet.
    pub fn build(mut self) -> Result<Schema> {
        for model in self.models.values() {
            self.types.register_constant(model.name.upper_camel_case());
        }

        let mut resolutions = vec![];

        for model in self.models.values() {
            for relationship in model.declared_relationships() {
                resolutions.push(self.resolve(model, relationship)?);
            }
        }

        let Builder { models, types } = &mut self;

        for resolution in resolutions {
            let model = &mut models[&resolution.model];

            for (name, ty) in resolution.missing {
                let nullable = model
                    .relationship(&resolution.repository, &resolution.name)
                    .map(|relationship| relationship.nullable)
                    .unwrap_or(true);

                let options = PropertyOptions::new().nullable(nullable).index(true);
                log::debug!(
                    "declaring child key `{}::{name}` for `{}`",
                    model.name.upper_camel_case(),
                    resolution.name
                );
                declare(model, types, &resolution.repository, &name, ty, options)?;
            }

            if let Some(relationship) = model.relationships_mut().find(|relationship| {
                relationship.repository == resolution.repository
                    && relationship.name == resolution.name
            }) {
                let relationship = Arc::make_mut(relationship);
                relationship.target = resolution.target;
                relationship.foreign_key = ForeignKey {
                    fields: resolution.fields,
                };
            }
        }

        log::debug!("built schema with {} models", self.models.len());

        Ok(Schema {
            models: self.models,
            types: self.types,
        })
    }

    fn resolve(&self, model: &Model, relationship: &ManyToOne) -> Result<Resolution> {
        let context = || {
            format!(
                "relationship `{}::{}`",
                model.name.upper_camel_case(),
                relationship.name
            )
        };

        let Some(target) = self
            .models
            .values()
            .find(|candidate| candidate.name.upper_camel_case() == relationship.target_name)
        else {
            return Err(Error::invalid_schema(format!(
                "{} references a model that was not registered: `{}`",
                context(),
                relationship.target_name
            )));
        };

        let parent_properties = target.properties(&relationship.repository);
        let parent_key = match &relationship.options.parent_key {
            Some(names) => names
                .iter()
                .map(|name| {
                    parent_properties.get(name).cloned().ok_or_else(|| {
                        Error::invalid_schema(format!(
                            "{} names unknown parent key `{}::{name}`",
                            context(),
                            target.name.upper_camel_case()
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            None => parent_properties.key().cloned().collect(),
        };

        if parent_key.is_empty() {
            return Err(Error::invalid_schema(format!(
                "{} targets `{}`, which has no key",
                context(),
                target.name.upper_camel_case()
            )));
        }

        let child_key = match &relationship.options.child_key {
            Some(names) => names.clone(),
            None => parent_key
                .iter()
                .map(|property| format!("{}_{}", relationship.name, property.name))
                .collect(),
        };

        if child_key.len() != parent_key.len() {
            return Err(Error::invalid_schema(format!(
                "{} has {} child key properties for {} parent key properties",
                context(),
                child_key.len(),
                parent_key.len()
            )));
        }

        let child_properties = model.properties(&relationship.repository);
        let mut fields = vec![];
        let mut missing = vec![];

        for (source, parent) in child_key.into_iter().zip(&parent_key) {
            if !child_properties.contains(&source) {
                missing.push((source.clone(), TypeRef::Primitive(parent.primitive)));
            }

            fields.push(ForeignKeyField {
                source,
                target: parent.name.clone(),
            });
        }

        Ok(Resolution {
            model: model.id,
            repository: relationship.repository.clone(),
            name: relationship.name.clone(),
            target: target.id,
            fields,
            missing,
        })
    }
}

impl ModelBuilder<'_> {
    pub fn id(&self) -> ModelId {
        self.model.id
    }

    pub fn name(&self) -> &Name {
        &self.model.name
    }

    /// Declarations that follow apply to `repository`.
    pub fn repository(&mut self, repository: impl Into<RepositoryName>) -> &mut Self {
        self.repository = repository.into();
        self
    }

    pub fn storage_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.model.storage_name = Some(name.into());
        self
    }

    pub fn infer_validations(&mut self, hook: impl InferValidations + 'static) -> &mut Self {
        self.model.hooks.validations = Some(Arc::new(hook));
        self
    }

    pub fn register_serialization(&mut self, hook: impl RegisterSerialization + 'static) -> &mut Self {
        self.model.hooks.serialization = Some(Arc::new(hook));
        self
    }

    /// Defines a reader directly on the model.
    pub fn reader<F>(&mut self, name: &str, visibility: Visibility, f: F) -> Result<&mut Self>
    where
        F: Fn(&mut dyn Resource) -> Result<Value> + Send + Sync + 'static,
    {
        name::identifier(name)?;
        self.model.define_reader(Reader::new(name, visibility, f));
        Ok(self)
    }

    pub fn property(
        &mut self,
        name: &str,
        ty: impl Into<TypeRef>,
        options: PropertyOptions,
    ) -> Result<Arc<Property>> {
        declare(self.model, self.types, &self.repository, name, ty.into(), options)
    }

    /// Like [`ModelBuilder::property`], with options given as a JSON object.
    pub fn property_from_json(
        &mut self,
        name: &str,
        ty: impl Into<TypeRef>,
        options: serde_json::Value,
    ) -> Result<Arc<Property>> {
        let options =
            PropertyOptions::from_json(&self.model.name.upper_camel_case(), name, options)?;
        self.property(name, ty, options)
    }

    /// Declares a many-to-one relationship. The target is resolved when the
    /// schema is built.
    pub fn belongs_to(&mut self, name: &str, options: RelationshipOptions) -> Result<&mut Self> {
        let name = name::identifier(name)?;
        let relationship = ManyToOne::new(name, self.model.id, self.repository.clone(), options);
        self.model.add_relationship(relationship);
        Ok(self)
    }

    pub fn belongs_to_from_json(
        &mut self,
        name: &str,
        options: serde_json::Value,
    ) -> Result<&mut Self> {
        let options =
            RelationshipOptions::from_json(&self.model.name.upper_camel_case(), name, options)?;
        self.belongs_to(name, options)
    }
}

fn declare(
    model: &mut Model,
    types: &TypeRegistry,
    repository: &RepositoryName,
    name: &str,
    ty: TypeRef,
    options: PropertyOptions,
) -> Result<Arc<Property>> {
    let name = name::identifier(name)?;
    let property = Arc::new(Property::new(model.id, &model.name, name, ty, options, types)?);

    model.add_property(repository, property.clone());
    model.hooks.property_declared(&model.name, &property);

    log::trace!(
        "declared `{}::{}` ({}) in {repository}",
        model.name.upper_camel_case(),
        property.name,
        property.primitive
    );

    Ok(property)
}
