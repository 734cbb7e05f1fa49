use std::{borrow::Cow, fmt};

/// Names a repository context. Schema lookups and storage operations always
/// happen within one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(Cow<'static, str>);

impl RepositoryName {
    pub const DEFAULT: RepositoryName = RepositoryName(Cow::Borrowed("default"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }
}

impl Default for RepositoryName {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<&str> for RepositoryName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RepositoryName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&RepositoryName> for RepositoryName {
    fn from(value: &RepositoryName) -> Self {
        value.clone()
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
