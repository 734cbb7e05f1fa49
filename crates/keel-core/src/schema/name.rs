use crate::{Error, Result};

use heck::{ToSnakeCase, ToUpperCamelCase};

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    pub fn new(src: &str) -> Self {
        let snake = src.to_snake_case();
        let parts = snake.split('_').map(String::from).collect();
        Self { parts }
    }

    pub fn upper_camel_case(&self) -> String {
        self.snake_case().to_upper_camel_case()
    }

    pub fn snake_case(&self) -> String {
        self.parts.join("_")
    }
}

/// Validates a declared name as a bare identifier token, stripping one
/// trailing `?` (the predicate form of a boolean accessor).
pub(crate) fn identifier(src: &str) -> Result<&str> {
    let name = src.strip_suffix('?').unwrap_or(src);
    let mut chars = name.chars();

    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if !valid {
        return Err(Error::invalid_argument_kind(
            "identifier",
            format!("{src:?}"),
        ));
    }

    Ok(name)
}
