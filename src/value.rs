use crate::error::ValueError;
use serde::Deserialize;
use std::{collections::HashMap, fmt::Display};

pub type Array = Vec<Value>;
pub type Object = HashMap<String, Value>;

/// A node of a parsed document.
///
/// Integers keep their signedness: literals written with a `-` are
/// [`Value::Int`], every other integer literal is [`Value::UInt`].
#[derive(Debug, PartialEq, Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    UInt(u64),
    Int(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Array(Array),
    Object(Object),
}

/// The alternative a [`Value`] currently holds.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Type {
    Undefined,
    UInt,
    Int,
    Float,
    Bool,
    String,
    Array,
    Object,
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Undefined => "undefined",
            Self::UInt => "unsigned integer",
            Self::Int => "signed integer",
            Self::Float => "float",
            Self::Bool => "boolean",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };

        write!(f, "{}", name)
    }
}

impl Value {
    pub fn value_type(&self) -> Type {
        match self {
            Self::Undefined => Type::Undefined,
            Self::UInt(_) => Type::UInt,
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
            Self::Bool(_) => Type::Bool,
            Self::String(_) => Type::String,
            Self::Array(_) => Type::Array,
            Self::Object(_) => Type::Object,
        }
    }

    pub fn is(&self, value_type: Type) -> bool {
        self.value_type() == value_type
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// The error for asking this value to be something it is not.
    pub(crate) fn mismatch(&self, expected: &'static str) -> ValueError {
        match self {
            Self::Undefined => ValueError::Undefined { expected },
            other => ValueError::Mismatch {
                expected,
                found: other.value_type(),
            },
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Self::Bool(b) => Ok(*b),
            _ => Err(self.mismatch("a boolean")),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Self::String(s) => Ok(s),
            _ => Err(self.mismatch("a string")),
        }
    }

    pub fn as_array(&self) -> Result<&Array, ValueError> {
        match self {
            Self::Array(array) => Ok(array),
            _ => Err(self.mismatch("an array")),
        }
    }

    pub fn as_object(&self) -> Result<&Object, ValueError> {
        match self {
            Self::Object(object) => Ok(object),
            _ => Err(self.mismatch("an object")),
        }
    }

    /// Mutable array view. An undefined value becomes an empty array first.
    pub fn as_array_mut(&mut self) -> Result<&mut Array, ValueError> {
        if self.is_undefined() {
            *self = Self::Array(Array::new());
        }

        match self {
            Self::Array(array) => Ok(array),
            other => Err(other.mismatch("an array")),
        }
    }

    /// Mutable object view. An undefined value becomes an empty object first.
    pub fn as_object_mut(&mut self) -> Result<&mut Object, ValueError> {
        if self.is_undefined() {
            *self = Self::Object(Object::new());
        }

        match self {
            Self::Object(object) => Ok(object),
            other => Err(other.mismatch("an object")),
        }
    }

    pub fn get(&self, key: &str) -> Result<&Value, ValueError> {
        self.as_object()?
            .get(key)
            .ok_or_else(|| ValueError::MissingKey(key.to_string()))
    }

    /// The slot for `key`, inserting an undefined value when missing.
    pub fn entry(&mut self, key: &str) -> Result<&mut Value, ValueError> {
        Ok(self
            .as_object_mut()?
            .entry(key.to_string())
            .or_default())
    }

    pub fn at(&self, index: usize) -> Result<&Value, ValueError> {
        let array = self.as_array()?;

        array.get(index).ok_or(ValueError::IndexOutOfBounds {
            index,
            len: array.len(),
        })
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut Value, ValueError> {
        let array = self.as_array_mut()?;
        let len = array.len();

        array
            .get_mut(index)
            .ok_or(ValueError::IndexOutOfBounds { index, len })
    }

    /// Converts into any deserializable type.
    ///
    /// ```
    /// use lumen::Value;
    ///
    /// let ports = Value::from(vec![80u64, 443]);
    ///
    /// assert_eq!(ports.extract::<Vec<u16>>().unwrap(), vec![80, 443]);
    /// assert!(ports.extract::<Vec<bool>>().is_err());
    /// ```
    pub fn extract<'de, T: Deserialize<'de>>(&'de self) -> Result<T, ValueError> {
        T::deserialize(self)
    }

    pub fn extract_or<'de, T: Deserialize<'de>>(&'de self, default: T) -> T {
        self.extract().unwrap_or(default)
    }
}

macro_rules! from_primitive {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

from_primitive!(UInt as u64: u8, u16, u32, u64);
from_primitive!(Int as i64: i8, i16, i32, i64);
from_primitive!(Float as f64: f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Object(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

macro_rules! eq_scalar {
    ($($ty:ty),*) => {
        $(
            impl PartialEq<$ty> for Value {
                fn eq(&self, other: &$ty) -> bool {
                    self.extract::<$ty>().map_or(false, |value| value == *other)
                }
            }
        )*
    };
}

eq_scalar!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64, bool);

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        matches!(self, Self::String(s) if s == other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self == other.as_str()
    }
}
