use super::Error;

/// Error when a class reference names no registered constant.
#[derive(Debug)]
pub(super) struct UnresolvedConstantError {
    name: Box<str>,
}

impl std::error::Error for UnresolvedConstantError {}

impl core::fmt::Display for UnresolvedConstantError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "uninitialized constant `{}`", self.name)
    }
}

impl Error {
    /// Creates an unresolved constant error.
    pub fn unresolved_constant(name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnresolvedConstant(
            UnresolvedConstantError {
                name: name.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an unresolved constant error.
    pub fn is_unresolved_constant(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnresolvedConstant(_)))
    }
}
