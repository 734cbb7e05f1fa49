use super::Error;
use crate::stmt::{Type, Value};

/// Error when a value cannot be parsed into a calendar primitive.
#[derive(Debug)]
pub(super) struct TypeCoercionError {
    value: Value,
    to_type: Type,
}

impl std::error::Error for TypeCoercionError {}

impl core::fmt::Display for TypeCoercionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot coerce {:?} to {}",
            self.value.to_string(),
            self.to_type
        )
    }
}

impl Error {
    /// Creates a type coercion error.
    pub fn type_coercion(value: Value, to_type: &Type) -> Error {
        Error::from(super::ErrorKind::TypeCoercion(TypeCoercionError {
            value,
            to_type: to_type.clone(),
        }))
    }

    /// Returns `true` if this error is a type coercion error.
    pub fn is_type_coercion(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::TypeCoercion(_)))
    }
}
