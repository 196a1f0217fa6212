//! Typed extraction: `&Value` is a serde [`Deserializer`], so any
//! `Deserialize` type can be pulled out of a tree with the coercions the
//! language allows between its numeric alternatives.

use crate::error::ValueError;
use crate::value::{Array, Object, Value};
use serde::de::{
    value::{MapDeserializer, SeqDeserializer, StrDeserializer},
    Deserializer, IntoDeserializer, Visitor,
};
use serde::forward_to_deserialize_any;

impl Value {
    /// Unsigned requests only accept unsigned values.
    fn unsigned(&self, expected: &'static str) -> Result<u64, ValueError> {
        match self {
            Self::UInt(n) => Ok(*n),
            _ => Err(self.mismatch(expected)),
        }
    }

    /// Signed requests accept unsigned values reinterpreted as `i64`.
    fn signed(&self, expected: &'static str) -> Result<i64, ValueError> {
        match self {
            Self::Int(n) => Ok(*n),
            Self::UInt(n) => Ok(*n as i64),
            _ => Err(self.mismatch(expected)),
        }
    }

    fn float(&self, expected: &'static str) -> Result<f64, ValueError> {
        match self {
            Self::UInt(n) => Ok(*n as f64),
            Self::Int(n) => Ok(*n as f64),
            Self::Float(n) => Ok(*n),
            _ => Err(self.mismatch(expected)),
        }
    }
}

fn narrow<S: Copy + ToString, T: TryFrom<S>>(n: S, expected: &'static str) -> Result<T, ValueError> {
    T::try_from(n).map_err(|_| ValueError::OutOfRange {
        value: n.to_string(),
        expected,
    })
}

fn visit_array<'de, V: Visitor<'de>>(array: &'de Array, visitor: V) -> Result<V::Value, ValueError> {
    let mut seq = SeqDeserializer::<_, ValueError>::new(array.iter());
    let value = visitor.visit_seq(&mut seq)?;
    seq.end()?;

    Ok(value)
}

fn visit_object<'de, V: Visitor<'de>>(
    object: &'de Object,
    visitor: V,
) -> Result<V::Value, ValueError> {
    let mut map = MapDeserializer::<_, ValueError>::new(
        object.iter().map(|(key, value)| (key.as_str(), value)),
    );
    let value = visitor.visit_map(&mut map)?;
    map.end()?;

    Ok(value)
}

macro_rules! deserialize_unsigned {
    ($($method:ident => $visit:ident: $ty:ty),*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
                let n = self.unsigned(stringify!($ty))?;
                visitor.$visit(narrow::<u64, $ty>(n, stringify!($ty))?)
            }
        )*
    };
}

macro_rules! deserialize_signed {
    ($($method:ident => $visit:ident: $ty:ty),*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
                let n = self.signed(stringify!($ty))?;
                visitor.$visit(narrow::<i64, $ty>(n, stringify!($ty))?)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for &'de Value {
    type Error = ValueError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        match self {
            Value::Undefined => Err(self.mismatch("a value")),
            Value::UInt(n) => visitor.visit_u64(*n),
            Value::Int(n) => visitor.visit_i64(*n),
            Value::Float(n) => visitor.visit_f64(*n),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::String(s) => visitor.visit_borrowed_str(s),
            Value::Array(array) => visit_array(array, visitor),
            Value::Object(object) => visit_object(object, visitor),
        }
    }

    deserialize_unsigned! {
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64
    }

    deserialize_signed! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        visitor.visit_f32(self.float("f32")? as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        visitor.visit_f64(self.float("f64")?)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        visitor.visit_bool(self.as_bool()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        let mut chars = self.as_str().map_err(|_| self.mismatch("a character"))?.chars();

        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(self.mismatch("a character")),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        match self {
            Value::String(s) => visitor.visit_borrowed_str(s),
            _ => Err(self.mismatch("a string")),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        match self {
            Value::Undefined => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        match self {
            Value::Array(array) => visit_array(array, visitor),
            _ => Err(self.mismatch("an array")),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        match self {
            Value::Object(object) => visit_object(object, visitor),
            _ => Err(self.mismatch("an object")),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        self.deserialize_map(visitor)
    }

    /// Only unit variants, named by a string.
    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ValueError> {
        match self {
            Value::String(s) => {
                let variant: StrDeserializer<ValueError> = s.as_str().into_deserializer();
                visitor.visit_enum(variant)
            }
            _ => Err(self.mismatch("a variant name")),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ValueError> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bytes byte_buf unit unit_struct identifier
    }
}

impl<'de> IntoDeserializer<'de, ValueError> for &'de Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}
