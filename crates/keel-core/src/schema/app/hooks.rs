use super::Property;
use crate::schema::Name;

use std::{fmt, sync::Arc};

/// Called for every property declared on a model that opted in, unless the
/// property disables `auto_validation`.
pub trait InferValidations: Send + Sync {
    fn infer_validations(&self, model: &Name, property: &Property);
}

/// Called for every property declared on a model that opted in.
pub trait RegisterSerialization: Send + Sync {
    fn register_serialization(&self, model: &Name, property: &Property);
}

#[derive(Clone, Default)]
pub(crate) struct Hooks {
    pub(crate) validations: Option<Arc<dyn InferValidations>>,
    pub(crate) serialization: Option<Arc<dyn RegisterSerialization>>,
}

impl Hooks {
    pub(crate) fn property_declared(&self, model: &Name, property: &Property) {
        if let Some(hook) = &self.validations {
            if property.auto_validation {
                hook.infer_validations(model, property);
            }
        }

        if let Some(hook) = &self.serialization {
            hook.register_serialization(model, property);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("validations", &self.validations.is_some())
            .field("serialization", &self.serialization.is_some())
            .finish()
    }
}
