use super::{AttributeStore, ModelId};
use crate::Schema;

/// A record instance as seen by the schema layer.
///
/// Property and relationship descriptors operate on resources through this
/// trait, so the schema never depends on a particular runtime representation.
pub trait Resource {
    fn schema(&self) -> &Schema;

    fn model_id(&self) -> ModelId;

    fn attributes(&self) -> &AttributeStore;

    fn attributes_mut(&mut self) -> &mut AttributeStore;

    /// `true` until the resource has been persisted.
    fn is_new(&self) -> bool;
}
