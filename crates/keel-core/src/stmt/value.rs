use super::Type;

use jiff::civil;
use rust_decimal::Decimal;
use std::fmt;

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Null value
    #[default]
    Null,

    /// Boolean value
    Bool(bool),

    /// String value, used for both `String` and `Text` primitives
    String(String),

    /// Signed 64-bit integer
    Integer(i64),

    /// 64-bit floating point number
    Float(f64),

    /// Arbitrary-precision decimal
    Decimal(Decimal),

    /// Calendar date
    Date(civil::Date),

    /// Wall-clock time
    Time(civil::Time),

    /// Calendar date and wall-clock time
    DateTime(civil::DateTime),

    /// Opaque bytes
    Bytes(Vec<u8>),

    /// A resolved reference to a named type constant
    Class(String),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_integer(&self) -> i64 {
        match self {
            Self::Integer(v) => *v,
            _ => panic!("expected Value::Integer; actual={self:#?}"),
        }
    }

    #[track_caller]
    pub fn expect_string(&self) -> &str {
        match self {
            Self::String(v) => v,
            _ => panic!("expected Value::String; actual={self:#?}"),
        }
    }

    /// Returns `true` when the value already satisfies `ty`, so coercing it
    /// would not change it.
    pub fn is_a(&self, ty: &Type) -> bool {
        match self {
            Self::Null => false,
            _ if *ty == Type::Object => true,
            Self::Bool(_) => *ty == Type::Bool,
            Self::String(_) => matches!(ty, Type::String | Type::Text),
            Self::Integer(_) => *ty == Type::Integer,
            Self::Float(_) => *ty == Type::Float,
            Self::Decimal(_) => *ty == Type::Decimal,
            Self::Date(_) => *ty == Type::Date,
            Self::Time(_) => *ty == Type::Time,
            Self::DateTime(_) => *ty == Type::DateTime,
            Self::Bytes(_) => false,
            Self::Class(_) => matches!(ty, Type::Class | Type::Discriminator),
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Stringifies the value. Null renders as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(v) => v.fmt(f),
            Self::String(v) => f.write_str(v),
            Self::Integer(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
            Self::Decimal(v) => v.fmt(f),
            Self::Date(v) => v.fmt(f),
            Self::Time(v) => v.fmt(f),
            Self::DateTime(v) => v.fmt(f),
            Self::Bytes(v) => f.write_str(&String::from_utf8_lossy(v)),
            Self::Class(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::Integer(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::Integer(src.into())
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::Float(src)
    }
}

impl From<Decimal> for Value {
    fn from(src: Decimal) -> Self {
        Self::Decimal(src)
    }
}

impl From<civil::Date> for Value {
    fn from(src: civil::Date) -> Self {
        Self::Date(src)
    }
}

impl From<civil::Time> for Value {
    fn from(src: civil::Time) -> Self {
        Self::Time(src)
    }
}

impl From<civil::DateTime> for Value {
    fn from(src: civil::DateTime) -> Self {
        Self::DateTime(src)
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Self: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::from(value),
            None => Self::Null,
        }
    }
}

/// Literal defaults arrive as JSON when declarations are loaded from data.
impl From<serde_json::Value> for Value {
    fn from(src: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match src {
            Json::Null => Self::Null,
            Json::Bool(v) => Self::Bool(v),
            Json::Number(n) => match n.as_i64() {
                Some(v) => Self::Integer(v),
                None => Self::Float(n.as_f64().unwrap_or_default()),
            },
            Json::String(v) => Self::String(v),
            other => Self::String(other.to_string()),
        }
    }
}
