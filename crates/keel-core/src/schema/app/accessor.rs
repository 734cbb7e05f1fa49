use super::{Property, Resource, Visibility};
use crate::stmt::Value;
use crate::Result;

use indexmap::IndexMap;
use std::{fmt, sync::Arc};

pub type ReadFn = Arc<dyn Fn(&mut dyn Resource) -> Result<Value> + Send + Sync>;
pub type WriteFn = Arc<dyn Fn(&mut dyn Resource, Value) -> Result<()> + Send + Sync>;

/// A named reader on a model.
#[derive(Clone)]
pub struct Reader {
    pub name: String,
    pub visibility: Visibility,

    /// The property this reader was generated for. `None` for readers
    /// defined directly on the model.
    pub property: Option<String>,

    func: ReadFn,
}

#[derive(Clone)]
pub struct Writer {
    pub name: String,
    pub visibility: Visibility,
    pub property: Option<String>,
    func: WriteFn,
}

/// The readers and writers a model exposes.
#[derive(Clone, Default)]
pub struct Accessors {
    readers: IndexMap<String, Reader>,
    writers: IndexMap<String, Writer>,
}

impl Reader {
    pub fn new<F>(name: impl Into<String>, visibility: Visibility, f: F) -> Self
    where
        F: Fn(&mut dyn Resource) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            visibility,
            property: None,
            func: Arc::new(f),
        }
    }

    pub fn call(&self, resource: &mut dyn Resource) -> Result<Value> {
        (self.func)(resource)
    }
}

impl Writer {
    pub fn call(&self, resource: &mut dyn Resource, value: Value) -> Result<()> {
        (self.func)(resource, value)
    }
}

impl Accessors {
    pub fn reader(&self, name: &str) -> Option<&Reader> {
        self.readers.get(name)
    }

    pub fn writer(&self, name: &str) -> Option<&Writer> {
        self.writers.get(name)
    }

    /// Returns the reader only if it may be called from outside the model.
    pub fn public_reader(&self, name: &str) -> Option<&Reader> {
        self.reader(name)
            .filter(|reader| reader.visibility.is_public())
    }

    pub fn public_writer(&self, name: &str) -> Option<&Writer> {
        self.writer(name)
            .filter(|writer| writer.visibility.is_public())
    }

    pub fn readers(&self) -> impl Iterator<Item = &Reader> + '_ {
        self.readers.values()
    }

    pub(crate) fn define_reader(&mut self, reader: Reader) {
        self.readers.insert(reader.name.clone(), reader);
    }

    /// Generates the reader and writer for `property`, plus a `name?` alias
    /// for booleans unless a reader by that name was defined on the model.
    pub(crate) fn bind_property(&mut self, property: &Arc<Property>) {
        let read: ReadFn = {
            let property = property.clone();
            Arc::new(move |resource| property.get(resource))
        };

        let write: WriteFn = {
            let property = property.clone();
            Arc::new(move |resource, value| property.set(resource, value))
        };

        let reader = Reader {
            name: property.name.clone(),
            visibility: property.reader_visibility,
            property: Some(property.name.clone()),
            func: read,
        };

        if let Some(alias) = property.predicate_name() {
            let taken = self
                .readers
                .get(&alias)
                .is_some_and(|existing| existing.property.is_none());

            if !taken {
                self.define_reader(Reader {
                    name: alias,
                    ..reader.clone()
                });
            }
        }

        self.define_reader(reader);
        self.writers.insert(
            property.name.clone(),
            Writer {
                name: property.name.clone(),
                visibility: property.writer_visibility,
                property: Some(property.name.clone()),
                func: write,
            },
        );
    }
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reader")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("property", &self.property)
            .finish()
    }
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writer")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("property", &self.property)
            .finish()
    }
}

impl fmt::Debug for Accessors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessors")
            .field("readers", &self.readers.keys().collect::<Vec<_>>())
            .field("writers", &self.writers.keys().collect::<Vec<_>>())
            .finish()
    }
}
