use super::Error;

/// Error when a descriptor is used with a resource of another model.
#[derive(Debug)]
pub(super) struct TypeMismatchError {
    expected: Box<str>,
    actual: Box<str>,
}

impl std::error::Error for TypeMismatchError {}

impl core::fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "type mismatch: expected a `{}` resource, got `{}`",
            self.expected, self.actual
        )
    }
}

impl Error {
    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TypeMismatch(TypeMismatchError {
            expected: expected.into().into(),
            actual: actual.into().into(),
        }))
    }

    /// Returns `true` if this error is a type mismatch error.
    pub fn is_type_mismatch(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::TypeMismatch(_)))
    }
}
