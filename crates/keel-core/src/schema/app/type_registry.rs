use crate::stmt::{Constants, Type, Value};
use crate::Result;

use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// The declared type of a property: either a primitive or the name of a
/// registered custom type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Type),
    Named(String),
}

/// A user-registered type that ultimately resolves to a primitive.
#[derive(Debug, Clone)]
pub struct CustomType {
    pub name: String,

    /// What this type is built on. May name another custom type.
    pub primitive: TypeRef,

    /// Properties of this type are lazy unless declared otherwise.
    pub lazy: bool,

    /// Default length for properties of this type.
    pub length: Option<u64>,
}

/// Custom types and the named constants that class-like values resolve
/// against.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    custom: IndexMap<String, CustomType>,
    constants: IndexSet<String>,
}

impl TypeRef {
    pub fn as_primitive(&self) -> Option<Type> {
        match self {
            Self::Primitive(ty) => Some(*ty),
            Self::Named(_) => None,
        }
    }
}

impl From<Type> for TypeRef {
    fn from(value: Type) -> Self {
        Self::Primitive(value)
    }
}

impl From<&str> for TypeRef {
    fn from(value: &str) -> Self {
        match Type::from_name(value) {
            Some(ty) => Self::Primitive(ty),
            None => Self::Named(value.to_string()),
        }
    }
}

impl From<String> for TypeRef {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(ty) => ty.fmt(f),
            Self::Named(name) => f.write_str(name),
        }
    }
}

impl CustomType {
    pub fn new(name: impl Into<String>, primitive: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            primitive: primitive.into(),
            lazy: false,
            length: None,
        }
    }

    pub fn lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    pub fn length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, custom: CustomType) -> &mut Self {
        self.constants.insert(custom.name.clone());
        self.custom.insert(custom.name.clone(), custom);
        self
    }

    pub fn register_constant(&mut self, name: impl Into<String>) -> &mut Self {
        self.constants.insert(name.into());
        self
    }

    /// Returns the custom type `ty` names, if it names one.
    pub fn custom(&self, ty: &TypeRef) -> Option<&CustomType> {
        match ty {
            TypeRef::Named(name) => self.custom.get(name),
            TypeRef::Primitive(_) => None,
        }
    }

    /// Follows custom type definitions down to a primitive. Returns `None`
    /// for unknown names and for definitions that loop.
    pub fn resolve(&self, ty: &TypeRef) -> Option<Type> {
        let mut current = ty;

        for _ in 0..=self.custom.len() {
            match current {
                TypeRef::Primitive(ty) => return Some(*ty),
                TypeRef::Named(name) => current = &self.custom.get(name)?.primitive,
            }
        }

        None
    }

    pub fn supports(&self, ty: &TypeRef) -> bool {
        self.resolve(ty).is_some()
    }

    pub fn cast(&self, ty: &Type, value: Value) -> Result<Value> {
        ty.cast(value, self)
    }
}

impl Constants for TypeRegistry {
    fn resolve_constant(&self, name: &str) -> Option<String> {
        let name = name.trim().trim_start_matches("::");
        self.constants.get(name).cloned()
    }
}
