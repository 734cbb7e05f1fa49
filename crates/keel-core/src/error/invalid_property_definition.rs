use super::Error;

/// Error when a property declaration cannot be accepted.
///
/// This occurs when:
/// - The declared type is not supported by the type registry
/// - An option key is not recognized
/// - A visibility token is invalid
///
/// These errors abort model declaration.
#[derive(Debug)]
pub(super) struct InvalidPropertyDefinition {
    model: Box<str>,
    property: Box<str>,
    reason: Box<str>,
}

impl std::error::Error for InvalidPropertyDefinition {}

impl core::fmt::Display for InvalidPropertyDefinition {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid property definition `{}::{}`: {}",
            self.model, self.property, self.reason
        )
    }
}

impl Error {
    /// Creates an invalid property definition error.
    pub fn invalid_property_definition(
        model: impl Into<String>,
        property: impl Into<String>,
        reason: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::InvalidPropertyDefinition(
            InvalidPropertyDefinition {
                model: model.into().into(),
                property: property.into().into(),
                reason: reason.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an invalid property definition error.
    pub fn is_invalid_property_definition(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidPropertyDefinition(_)))
    }
}
