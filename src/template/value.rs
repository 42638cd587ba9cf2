use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::borrow::Cow;
use std::fmt;

use super::format;
use super::hole::Sigil;

/// Runtime value captured by a hole.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Char(char),
    Str(String),
    Seq(Vec<Value>),
    Object {
        type_name: Option<String>,
        fields: Vec<(String, Value)>,
    },
    /// Opaque value pre-rendered through its `Display` impl.
    Display(String),
}

impl Value {
    pub fn display(value: impl fmt::Display) -> Self {
        Value::Display(value.to_string())
    }

    pub fn object<I, K, V>(type_name: Option<&str>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Object {
            type_name: type_name.map(str::to_string),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Seq(_) => "sequence",
            Value::Object { .. } => "object",
            Value::Display(_) => "display",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{}", format::float_to_string(*v)),
            Value::Char(c) => write!(f, "{c}"),
            Value::Str(s) | Value::Display(s) => write!(f, "{s}"),
            Value::Seq(items) => {
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Object { type_name, fields } => {
                if fields.is_empty() {
                    return write!(f, "{}", type_name.as_deref().unwrap_or("{ }"));
                }
                write!(f, "{{ ")?;
                for (idx, (key, value)) in fields.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                write!(f, " }}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::UInt(v) => serializer.serialize_u64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Char(c) => serializer.serialize_char(*c),
            Value::Str(s) | Value::Display(s) => serializer.serialize_str(s),
            Value::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object { type_name, fields } => {
                let extra = usize::from(type_name.is_some());
                let mut map = serializer.serialize_map(Some(fields.len() + extra))?;
                if let Some(name) = type_name {
                    map.serialize_entry("$type", name)?;
                }
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

macro_rules! value_from_int {
    ($variant:ident as $target:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value as $target)
                }
            }

            impl From<&$ty> for Value {
                fn from(value: &$ty) -> Self {
                    Value::$variant(*value as $target)
                }
            }
        )*
    };
}

value_from_int!(Int as i64: i8, i16, i32, i64, isize);
value_from_int!(UInt as u64: u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        // Go through the shortest decimal form so 0.1f32 stays 0.1.
        Value::Float(value.to_string().parse().unwrap_or(value as f64))
    }
}

impl From<&f32> for Value {
    fn from(value: &f32) -> Self {
        Value::from(*value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&f64> for Value {
    fn from(value: &f64) -> Self {
        Value::Float(*value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&bool> for Value {
    fn from(value: &bool) -> Self {
        Value::Bool(*value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<Cow<'_, str>> for Value {
    fn from(value: Cow<'_, str>) -> Self {
        Value::Str(value.into_owned())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&Vec<T>> for Value {
    fn from(value: &Vec<T>) -> Self {
        Value::from(value.as_slice())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(value: &[T]) -> Self {
        Value::Seq(value.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(value: [T; N]) -> Self {
        Value::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>, const N: usize> From<&[T; N]> for Value {
    fn from(value: &[T; N]) -> Self {
        Value::from(value.as_slice())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object {
                type_name: None,
                fields: map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            },
        }
    }
}

/// Compile-time constant text spliced into a template in place of a hole.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteralValue {
    payload: Cow<'static, str>,
    cacheable: bool,
}

impl LiteralValue {
    pub fn new(payload: impl Into<Cow<'static, str>>, cacheable: bool) -> Self {
        Self {
            payload: payload.into(),
            cacheable,
        }
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn is_cacheable(&self) -> bool {
        self.cacheable
    }
}

pub fn literal(payload: &'static str) -> LiteralValue {
    LiteralValue::new(payload, true)
}

pub fn literal_uncached(payload: impl Into<Cow<'static, str>>) -> LiteralValue {
    LiteralValue::new(payload, false)
}

#[derive(Clone, Debug, PartialEq)]
pub enum HoleValue {
    Value(Value),
    Literal(LiteralValue),
}

/// A value bound to one hole, plus whatever the call site said about it.
#[derive(Clone, Debug, PartialEq)]
pub struct Capture {
    pub source: Option<String>,
    pub name: Option<String>,
    pub sigil: Option<Sigil>,
    pub value: HoleValue,
}

impl Capture {
    /// Capture with the source text of the argument expression attached.
    pub fn captured(source: &str, value: impl Into<Capture>) -> Self {
        let mut capture = value.into();
        capture.source = Some(source.to_string());
        capture
    }

    fn from_hole_value(value: HoleValue) -> Self {
        Self {
            source: None,
            name: None,
            sigil: None,
            value,
        }
    }
}

impl<T: Into<Value>> From<T> for Capture {
    fn from(value: T) -> Self {
        Capture::from_hole_value(HoleValue::Value(value.into()))
    }
}

impl From<LiteralValue> for Capture {
    fn from(value: LiteralValue) -> Self {
        Capture::from_hole_value(HoleValue::Literal(value))
    }
}

/// Give a capture an explicit name. A leading `@` or `$` in `name` sets the
/// sigil as well.
pub fn named(name: &str, value: impl Into<Capture>) -> Capture {
    let mut capture = value.into();
    let (sigil, bare) = Sigil::split_prefix(name);
    if sigil.is_some() {
        capture.sigil = sigil;
    }
    capture.name = Some(bare.to_string());
    capture
}

pub fn destructure(value: impl Into<Capture>) -> Capture {
    let mut capture = value.into();
    capture.sigil = Some(Sigil::Destructure);
    capture
}

pub fn stringify(value: impl Into<Capture>) -> Capture {
    let mut capture = value.into();
    capture.sigil = Some(Sigil::Stringify);
    capture
}
