mod field_map;
mod object;

#[cfg(test)]
mod tests;

pub use field_map::FieldMap;
pub use object::Object;

use serde::{Serialize, Serializer, ser::SerializeSeq};

///
/// Value
///
/// Runtime value flowing through mapping and projection.
///
/// Null   → accepted only by nullable declared types
/// Map    → string-keyed array, the shape `to_array` produces
/// Object → instance of a modelled class
///

#[derive(Clone, Debug, PartialEq)]
#[remain::sorted]
pub enum Value {
    Bool(bool),
    Float(f64),
    Int(i64),
    List(Vec<Self>),
    Map(FieldMap<Self>),
    Null,
    Object(Object),
    Text(String),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&FieldMap<Self>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short type label used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Bool(_) => "bool".to_string(),
            Self::Float(_) => "float".to_string(),
            Self::Int(_) => "int".to_string(),
            Self::List(_) => "list".to_string(),
            Self::Map(_) => "array".to_string(),
            Self::Null => "null".to_string(),
            Self::Object(object) => object.path().to_string(),
            Self::Text(_) => "string".to_string(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(map) => map.serialize(serializer),
            Self::Null => serializer.serialize_none(),
            Self::Object(object) => object.serialize(serializer),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

// ---- conversions ----

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Self::Object(object)
    }
}

impl From<FieldMap<Self>> for Value {
    fn from(map: FieldMap<Self>) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}
