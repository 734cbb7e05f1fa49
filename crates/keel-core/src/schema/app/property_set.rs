use super::Property;

use indexmap::IndexMap;
use std::sync::Arc;

/// The ordered properties of a model within one repository.
#[derive(Debug, Clone, Default)]
pub struct PropertySet {
    properties: IndexMap<String, Arc<Property>>,
}

impl PropertySet {
    pub fn get(&self, name: &str) -> Option<&Arc<Property>> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Arc<Property>> + '_ {
        self.properties.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.properties.keys().map(String::as_str)
    }

    /// Properties making up the key, in declaration order.
    pub fn key(&self) -> impl Iterator<Item = &Arc<Property>> + '_ {
        self.iter().filter(|property| property.key)
    }

    /// Properties loaded with the record.
    pub fn defaults(&self) -> impl Iterator<Item = &Arc<Property>> + '_ {
        self.iter().filter(|property| !property.is_lazy())
    }

    /// Properties in the named lazy-load group.
    pub fn lazy_context<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a Arc<Property>> + 'a {
        self.iter()
            .filter(move |property| property.lazy_group() == Some(group))
    }

    /// Properties loaded together with `name` when it is first read. An
    /// eager property loads alone.
    pub fn lazy_load_context(&self, name: &str) -> Vec<&Arc<Property>> {
        let Some(property) = self.get(name) else {
            return vec![];
        };

        match property.lazy_group() {
            Some(group) => self.lazy_context(group).collect(),
            None => vec![property],
        }
    }

    /// Non-unique indexes, by name, with their properties in declaration order.
    pub fn indexes(&self) -> IndexMap<String, Vec<String>> {
        self.collect_indexes(false)
    }

    pub fn unique_indexes(&self) -> IndexMap<String, Vec<String>> {
        self.collect_indexes(true)
    }

    pub(crate) fn insert(&mut self, property: Arc<Property>) {
        self.properties.insert(property.name.clone(), property);
    }

    fn collect_indexes(&self, unique: bool) -> IndexMap<String, Vec<String>> {
        let mut indexes = IndexMap::<String, Vec<String>>::new();

        for property in self.iter() {
            for index in property.indexes.iter().filter(|index| index.unique == unique) {
                indexes
                    .entry(index.name.clone())
                    .or_default()
                    .push(property.name.clone());
            }
        }

        indexes
    }
}
