use super::{num, Value};
use crate::{Error, Result};

use jiff::civil;
use std::fmt;

/// A property primitive. This is the closed set of storage primitives every
/// declared type, built-in or custom, must resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Short string
    String,

    /// Long text
    Text,

    /// Floating point number
    Float,

    /// Integer
    Integer,

    /// Arbitrary-precision decimal
    Decimal,

    /// Calendar date
    Date,

    /// Wall-clock time
    Time,

    /// Combined date and time
    DateTime,

    /// Opaque binary or object value
    Object,

    /// Reference to a named type constant
    Class,

    /// Single-table inheritance discriminator
    Discriminator,
}

/// Resolves class references while coercing.
pub trait Constants {
    /// Returns the canonical name of the constant named `name`, if any.
    fn resolve_constant(&self, name: &str) -> Option<String>;
}

/// Tokens recognized as truthy when coercing to `Bool`.
const TRUTHY: [&str; 3] = ["true", "1", "t"];

impl Type {
    pub const ALL: [Type; 12] = [
        Type::Bool,
        Type::String,
        Type::Text,
        Type::Float,
        Type::Integer,
        Type::Decimal,
        Type::Date,
        Type::Time,
        Type::DateTime,
        Type::Object,
        Type::Class,
        Type::Discriminator,
    ];

    /// The token naming this primitive in declarations.
    pub fn name(&self) -> &'static str {
        match self {
            Type::Bool => "Boolean",
            Type::String => "String",
            Type::Text => "Text",
            Type::Float => "Float",
            Type::Integer => "Integer",
            Type::Decimal => "Decimal",
            Type::Date => "Date",
            Type::Time => "Time",
            Type::DateTime => "DateTime",
            Type::Object => "Object",
            Type::Class => "Class",
            Type::Discriminator => "Discriminator",
        }
    }

    pub fn from_name(name: &str) -> Option<Type> {
        Type::ALL.into_iter().find(|ty| ty.name() == name)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    /// String-like primitives carry a length.
    pub fn is_string_like(&self) -> bool {
        matches!(self, Self::String | Self::Class)
    }

    /// Fractional primitives carry a scale and precision.
    pub fn is_fractional(&self) -> bool {
        matches!(self, Self::Decimal | Self::Float)
    }

    pub fn is_class_like(&self) -> bool {
        matches!(self, Self::Class | Self::Discriminator)
    }

    /// Coerces `value` into this primitive.
    ///
    /// Values that already satisfy the primitive, and nulls, are returned
    /// unchanged. `Bool` is the exception: it re-evaluates every input and
    /// turns null into `false`.
    pub fn cast(&self, value: Value, constants: &dyn Constants) -> Result<Value> {
        if self.is_bool() {
            return Ok(Value::Bool(match value {
                Value::Bool(v) => v,
                other => {
                    let token = other.to_string().to_lowercase();
                    TRUTHY.contains(&token.as_str())
                }
            }));
        }

        if value.is_null() || value.is_a(self) {
            return Ok(value);
        }

        Ok(match self {
            Type::String | Type::Text => Value::String(value.to_string()),
            Type::Integer => Value::Integer(num::parse_integer_prefix(&value.to_string())),
            Type::Float => Value::Float(num::parse_float_prefix(&value.to_string())),
            Type::Decimal => Value::Decimal(num::parse_decimal_prefix(&value.to_string())),
            Type::Date => match value {
                Value::DateTime(v) => Value::Date(v.date()),
                value => Value::Date(self.parse_calendar(value)?),
            },
            Type::Time => match value {
                Value::DateTime(v) => Value::Time(v.time()),
                value => Value::Time(self.parse_calendar(value)?),
            },
            Type::DateTime => match value {
                Value::Date(v) => Value::DateTime(v.to_datetime(civil::Time::midnight())),
                value => Value::DateTime(self.parse_calendar(value)?),
            },
            Type::Class | Type::Discriminator => {
                let name = value.to_string();
                match constants.resolve_constant(&name) {
                    Some(resolved) => Value::Class(resolved),
                    None => return Err(Error::unresolved_constant(name)),
                }
            }
            Type::Bool | Type::Object => unreachable!("handled above; ty={self:?}"),
        })
    }

    fn parse_calendar<T: std::str::FromStr>(&self, value: Value) -> Result<T> {
        let src = value.to_string();
        src.trim()
            .parse()
            .map_err(|_| Error::type_coercion(value, self))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
