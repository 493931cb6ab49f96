//! Placeholder types and the values they decode to.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

/// The declared type of a path placeholder.
///
/// The set is closed: a placeholder is either free text or one of the
/// scalar types below.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ParamType {
    /// Any non-empty text, `{name}` or `{name:str}`.
    Str,
    /// A signed 64-bit integer, `{name:int}`.
    Int,
    /// A 64-bit float, `{name:float}`.
    Float,
    /// A boolean, `{name:bool}`.
    Bool,
}

impl ParamType {
    /// Returns the name used for this type in a route pattern.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::Str => "str",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::Bool => "bool",
        }
    }

    /// Converts the raw text of a path segment to a value of this type.
    ///
    /// Returns `None` if the text is not a valid representation of the
    /// type. Floats must be finite: `NaN` and `inf` are rejected.
    pub fn parse(&self, raw: &str) -> Option<ParamValue> {
        match self {
            ParamType::Str => Some(ParamValue::Str(raw.to_string())),
            ParamType::Int => raw.parse().ok().map(ParamValue::Int),
            ParamType::Float => raw
                .parse()
                .ok()
                .filter(|v: &f64| v.is_finite())
                .map(ParamValue::Float),
            ParamType::Bool => parse_bool(raw).map(ParamValue::Bool),
        }
    }

    /// A short human readable message for a value that failed to parse.
    pub(crate) fn error_message(&self) -> &'static str {
        match self {
            ParamType::Str => "Input should be a valid string",
            ParamType::Int => {
                "Input should be a valid integer, unable to parse string as an integer"
            }
            ParamType::Float => {
                "Input should be a valid number, unable to parse string as a number"
            }
            ParamType::Bool => "Input should be a valid boolean, unable to interpret input",
        }
    }

    /// The machine readable error type for a value that failed to parse.
    pub(crate) fn error_type(&self) -> &'static str {
        match self {
            ParamType::Str => "string_type",
            ParamType::Int => "int_parsing",
            ParamType::Float => "float_parsing",
            ParamType::Bool => "bool_parsing",
        }
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "str" => Ok(ParamType::Str),
            "int" => Ok(ParamType::Int),
            "float" => Ok(ParamType::Float),
            "bool" => Ok(ParamType::Bool),
            _ => Err(()),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Some(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Some(false),
        _ => None,
    }
}

/// A decoded placeholder value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Free text.
    Str(String),
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A boolean.
    Bool(bool),
}

impl ParamValue {
    /// Returns the type this value was decoded as.
    pub fn ty(&self) -> ParamType {
        match self {
            ParamValue::Str(_) => ParamType::Str,
            ParamValue::Int(_) => ParamType::Int,
            ParamValue::Float(_) => ParamType::Float,
            ParamValue::Bool(_) => ParamType::Bool,
        }
    }

    /// Returns the text if this is a `Str` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int` value.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the float if this is a `Float` value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Float(n) => write!(f, "{}", n),
            ParamValue::Bool(b) => write!(f, "{}", b),
        }
    }
}
