use super::Error;

/// Error when a public accessor call names no public accessor.
///
/// Accessors bound with protected or private visibility are reported the
/// same way as missing ones.
#[derive(Debug)]
pub(super) struct UndefinedAccessor {
    model: Box<str>,
    name: Box<str>,
}

impl std::error::Error for UndefinedAccessor {}

impl core::fmt::Display for UndefinedAccessor {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "undefined public accessor `{}` for `{}`",
            self.name, self.model
        )
    }
}

impl Error {
    /// Creates an undefined accessor error.
    pub fn undefined_accessor(model: impl Into<String>, name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UndefinedAccessor(UndefinedAccessor {
            model: model.into().into(),
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an undefined accessor error.
    pub fn is_undefined_accessor(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UndefinedAccessor(_)))
    }
}
