//! Generic Value Model
//!
//! A small, closed, JSON-like value tree that any typed behavior field is
//! converted into before it is embedded in an exported document.
//!
//! # Overview
//!
//! - [`Value`]: the tagged variant (`Null | Bool | Number | Text | List | Map`)
//! - [`ValueMap`]: insertion-ordered `Text -> Value` mapping
//! - [`ToValue`]: the single conversion entry point
//!
//! Numbers are always stored as `f64`. Vectors and colors become maps with
//! named components (`x,y,z,w` / `r,g,b,a`) rather than bare lists, so that a
//! consumer can tell a vector from an arbitrary array.
//!
//! ```rust,ignore
//! use sylva_core::value::{ToValue, Value};
//!
//! let v = glam::Vec2::new(1.0, 2.0).to_value();
//! assert_eq!(v.get("y").and_then(Value::as_f64), Some(2.0));
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use glam::{DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, Quat, UVec2, UVec3, UVec4, Vec2, Vec3, Vec3A, Vec4};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

use crate::color::Color;

/// Insertion-ordered mapping used for [`Value::Map`].
pub type ValueMap = IndexMap<String, Value>;

/// Largest integer magnitude an `f64` represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A format-agnostic, acyclic value tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Map(ValueMap),
}

// -------------------- Constructors --------------------

impl Value {
    #[inline]
    #[must_use]
    pub fn text<S: Into<String>>(s: S) -> Self {
        Value::Text(s.into())
    }

    /// Canonical textual name of an enumerated value.
    #[inline]
    #[must_use]
    pub fn symbol(name: impl fmt::Display) -> Self {
        Value::Text(name.to_string())
    }

    /// Builds a map of named numeric components, e.g. `[("x", 1.0), ("y", 2.0)]`.
    #[must_use]
    pub fn components<const N: usize>(components: [(&str, f64); N]) -> Self {
        Value::Map(
            components
                .into_iter()
                .map(|(name, v)| (name.to_string(), Value::Number(v)))
                .collect(),
        )
    }
}

// -------------------- Accessors --------------------

impl Value {
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short lowercase name of the variant, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Looks up `key` when this value is a map.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Number(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "{v:?}"),
            Value::List(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// -------------------- From impls --------------------

impl From<bool> for Value {
    #[inline]
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                #[inline]
                fn from(v: $t) -> Self {
                    Value::Number(v as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<&str> for Value {
    #[inline]
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Vec<Value>> for Value {
    #[inline]
    fn from(v: Vec<Value>) -> Self {
        Value::List(v)
    }
}

impl From<ValueMap> for Value {
    #[inline]
    fn from(v: ValueMap) -> Self {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    #[inline]
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// -------------------- JSON conversion --------------------

impl Value {
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(v) => JsonValue::Bool(*v),
            Value::Number(v) => number_to_json(*v),
            Value::Text(v) => JsonValue::String(v.clone()),
            Value::List(v) => JsonValue::Array(v.iter().map(Value::to_json_value).collect()),
            Value::Map(v) => JsonValue::Object(
                v.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect::<JsonMap<String, JsonValue>>(),
            ),
        }
    }

    #[must_use]
    pub fn from_json_value(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(v) => Value::Bool(v),
            JsonValue::Number(v) => v.as_f64().map_or(Value::Null, Value::Number),
            JsonValue::String(v) => Value::Text(v),
            JsonValue::Array(values) => {
                Value::List(values.into_iter().map(Value::from_json_value).collect())
            }
            JsonValue::Object(object) => Value::Map(
                object
                    .into_iter()
                    .map(|(k, v)| (k, Value::from_json_value(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for JsonValue {
    fn from(value: Value) -> Self {
        value.to_json_value()
    }
}

/// Integral values inside the exactly-representable range are written as JSON
/// integers so that `5.0` round-trips as `5`.
fn is_integral(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER
}

fn number_to_json(v: f64) -> JsonValue {
    if is_integral(v) {
        return JsonValue::Number(JsonNumber::from(v as i64));
    }
    JsonNumber::from_f64(v).map_or(JsonValue::Null, JsonValue::Number)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Number(v) if is_integral(*v) => serializer.serialize_i64(*v as i64),
            Value::Number(v) if v.is_finite() => serializer.serialize_f64(*v),
            // NaN and infinities have no JSON form.
            Value::Number(_) => serializer.serialize_unit(),
            Value::Text(v) => serializer.serialize_str(v),
            Value::List(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

// ============================================================================
// ToValue
// ============================================================================

/// Conversion of a typed value into the generic [`Value`] tree.
///
/// Conversion is total. Types without a dedicated implementation are exposed
/// through [`FieldRef::Opaque`](crate::behavior::FieldRef::Opaque) and rendered
/// as text.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for () {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Null
    }
}

impl ToValue for bool {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! impl_to_value_number {
    ($($t:ty),* $(,)?) => {
        $(
            impl ToValue for $t {
                #[inline]
                fn to_value(&self) -> Value {
                    Value::Number(*self as f64)
                }
            }
        )*
    };
}

impl_to_value_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl ToValue for char {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for str {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

impl ToValue for String {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ToValue for Cow<'_, str> {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Text(self.to_string())
    }
}

// --- Vectors & colors ---

impl ToValue for Vec2 {
    fn to_value(&self) -> Value {
        Value::components([("x", f64::from(self.x)), ("y", f64::from(self.y))])
    }
}

impl ToValue for Vec3 {
    fn to_value(&self) -> Value {
        Value::components([
            ("x", f64::from(self.x)),
            ("y", f64::from(self.y)),
            ("z", f64::from(self.z)),
        ])
    }
}

impl ToValue for Vec3A {
    fn to_value(&self) -> Value {
        Vec3::from(*self).to_value()
    }
}

impl ToValue for Vec4 {
    fn to_value(&self) -> Value {
        Value::components([
            ("x", f64::from(self.x)),
            ("y", f64::from(self.y)),
            ("z", f64::from(self.z)),
            ("w", f64::from(self.w)),
        ])
    }
}

impl ToValue for Quat {
    fn to_value(&self) -> Value {
        Value::components([
            ("x", f64::from(self.x)),
            ("y", f64::from(self.y)),
            ("z", f64::from(self.z)),
            ("w", f64::from(self.w)),
        ])
    }
}

impl ToValue for DVec2 {
    fn to_value(&self) -> Value {
        Value::components([("x", self.x), ("y", self.y)])
    }
}

impl ToValue for DVec3 {
    fn to_value(&self) -> Value {
        Value::components([("x", self.x), ("y", self.y), ("z", self.z)])
    }
}

impl ToValue for DVec4 {
    fn to_value(&self) -> Value {
        Value::components([("x", self.x), ("y", self.y), ("z", self.z), ("w", self.w)])
    }
}

macro_rules! impl_to_value_int_vector {
    ($($t:ty => [$($c:ident),+]),* $(,)?) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::components([$((stringify!($c), f64::from(self.$c))),+])
                }
            }
        )*
    };
}

impl_to_value_int_vector!(
    IVec2 => [x, y],
    IVec3 => [x, y, z],
    IVec4 => [x, y, z, w],
    UVec2 => [x, y],
    UVec3 => [x, y, z],
    UVec4 => [x, y, z, w],
);

impl ToValue for Color {
    fn to_value(&self) -> Value {
        Value::components([
            ("r", f64::from(self.r)),
            ("g", f64::from(self.g)),
            ("b", f64::from(self.b)),
            ("a", f64::from(self.a)),
        ])
    }
}

// --- Wrappers ---

impl<T: ToValue + ?Sized> ToValue for &T {
    #[inline]
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    #[inline]
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Rc<T> {
    #[inline]
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    #[inline]
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    #[inline]
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

// --- Sequences ---

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: ToValue> ToValue for VecDeque<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

// --- Mappings ---

impl<K: AsRef<str>, T: ToValue> ToValue for BTreeMap<K, T> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.to_value()))
                .collect(),
        )
    }
}

impl<K: AsRef<str>, T: ToValue, S> ToValue for HashMap<K, T, S> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.to_value()))
                .collect(),
        )
    }
}

impl<K: AsRef<str>, T: ToValue, S> ToValue for IndexMap<K, T, S> {
    fn to_value(&self) -> Value {
        Value::Map(
            self.iter()
                .map(|(k, v)| (k.as_ref().to_string(), v.to_value()))
                .collect(),
        )
    }
}

/// Implements [`ToValue`] for field-less enums, rendering each variant as its
/// canonical name (the `Debug` name of the variant).
///
/// ```rust,ignore
/// #[derive(Debug)]
/// enum Team { Red, Blue }
/// sylva_core::impl_symbol_value!(Team);
/// ```
#[macro_export]
macro_rules! impl_symbol_value {
    ($($t:ty),+ $(,)?) => {
        $(
            impl $crate::value::ToValue for $t {
                fn to_value(&self) -> $crate::value::Value {
                    $crate::value::Value::symbol(::std::format_args!("{:?}", self))
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_serialize_as_integers() {
        let json = serde_json::to_string(&Value::Number(5.0)).unwrap();
        assert_eq!(json, "5");
        let json = serde_json::to_string(&Value::Number(0.25)).unwrap();
        assert_eq!(json, "0.25");
    }

    #[test]
    fn non_finite_numbers_serialize_as_null() {
        let json = serde_json::to_string(&Value::Number(f64::NAN)).unwrap();
        assert_eq!(json, "null");
        assert_eq!(Value::Number(f64::INFINITY).to_json_value(), JsonValue::Null);
    }

    #[test]
    fn map_serialization_keeps_insertion_order() {
        let mut map = ValueMap::new();
        map.insert("zeta".into(), Value::from(1));
        map.insert("alpha".into(), Value::from(2));
        let json = serde_json::to_string(&Value::Map(map)).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":2}"#);
    }

    #[test]
    fn json_round_trip_preserves_structure() {
        let source = serde_json::json!({"a": [1, true, null], "b": {"c": "d"}});
        let value = Value::from_json_value(source.clone());
        assert_eq!(value.to_json_value(), source);
    }
}
