use super::Error;

/// Error when an argument is of the wrong structural category.
///
/// Raised at call boundaries when an identifier token, a recognized option
/// map, or a schema-bound resource was required and something else was
/// supplied.
#[derive(Debug)]
pub(super) struct InvalidArgumentKind {
    expected: &'static str,
    found: Box<str>,
}

impl std::error::Error for InvalidArgumentKind {}

impl core::fmt::Display for InvalidArgumentKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid argument: expected {}, got {}",
            self.expected, self.found
        )
    }
}

impl Error {
    /// Creates an invalid argument kind error.
    pub fn invalid_argument_kind(expected: &'static str, found: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidArgumentKind(InvalidArgumentKind {
            expected,
            found: found.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid argument kind error.
    pub fn is_invalid_argument_kind(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidArgumentKind(_)))
    }
}
