mod describe;


use crate::{
    model::ClassLookup,
    value::{FieldMap, Value},
};
use derive_more::Display;

///
/// ArrayKey
///
/// Key of a constant array shape. Integer keys mark list positions.
///

#[derive(Clone, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ArrayKey {
    Int(i64),
    #[display("{_0}")]
    Text(String),
}

impl From<&str> for ArrayKey {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ArrayKey {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for ArrayKey {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

///
/// Signature
///
/// One callable variant: parameter types and return type.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Signature {
    pub params: Vec<Ty>,
    pub ret: Ty,
}

impl Signature {
    #[must_use]
    pub const fn new(params: Vec<Ty>, ret: Ty) -> Self {
        Self { params, ret }
    }
}

///
/// Ty
///
/// Declared or inferred type. `Array` is a constant shape with known keys,
/// `Map` an array with unknown keys, `List` a sequentially keyed array.
///

#[derive(Clone, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum Ty {
    Array(Vec<(ArrayKey, Self)>),
    Bool,
    Callable(Vec<Signature>),
    ClassString(Box<Self>),
    ConstBool(bool),
    ConstInt(i64),
    ConstText(String),
    Float,
    Int,
    List(Box<Self>),
    Map(Box<Self>),
    Mixed,
    Never,
    Null,
    Object(String),
    Text,
    Union(Vec<Self>),
}

impl Ty {
    #[must_use]
    pub fn object(class: impl Into<String>) -> Self {
        Self::Object(class.into())
    }

    #[must_use]
    pub fn nullable(self) -> Self {
        Self::union([self, Self::Null])
    }

    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self::List(Box::new(inner))
    }

    #[must_use]
    pub fn map(inner: Self) -> Self {
        Self::Map(Box::new(inner))
    }

    #[must_use]
    pub fn class_string(class: impl Into<String>) -> Self {
        Self::ClassString(Box::new(Self::Object(class.into())))
    }

    #[must_use]
    pub fn callable(params: Vec<Self>, ret: Self) -> Self {
        Self::Callable(vec![Signature::new(params, ret)])
    }

    /// Constant shape with text keys.
    #[must_use]
    pub fn shape<K, I>(entries: I) -> Self
    where
        K: Into<ArrayKey>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Array(entries.into_iter().map(|(k, t)| (k.into(), t)).collect())
    }

    /// Constant list shape keyed 0..n.
    #[must_use]
    pub fn tuple(items: impl IntoIterator<Item = Self>) -> Self {
        Self::Array(
            (0_i64..)
                .zip(items)
                .map(|(i, t)| (ArrayKey::Int(i), t))
                .collect(),
        )
    }

    /// Normalised union: nested unions flattened, duplicates and `Never`
    /// dropped, `Mixed` absorbs everything.
    #[must_use]
    pub fn union(types: impl IntoIterator<Item = Self>) -> Self {
        let mut members = Vec::new();
        for ty in types {
            match ty {
                Self::Union(inner) => {
                    for member in inner {
                        if matches!(member, Self::Mixed) {
                            return Self::Mixed;
                        }
                        push_unique(&mut members, member);
                    }
                }
                Self::Never => {}
                Self::Mixed => return Self::Mixed,
                other => push_unique(&mut members, other),
            }
        }

        match members.len() {
            0 => Self::Never,
            1 => members.pop().unwrap_or(Self::Never),
            _ => Self::Union(members),
        }
    }

    #[must_use]
    pub const fn is_union(&self) -> bool {
        matches!(self, Self::Union(_))
    }

    #[must_use]
    pub fn contains_null(&self) -> bool {
        match self {
            Self::Null | Self::Mixed => true,
            Self::Union(members) => members.iter().any(Self::contains_null),
            _ => false,
        }
    }

    /// Same type with `null` removed.
    #[must_use]
    pub fn without_null(&self) -> Self {
        match self {
            Self::Union(members) => {
                Self::union(members.iter().filter(|m| **m != Self::Null).cloned())
            }
            Self::Null => Self::Never,
            other => other.clone(),
        }
    }

    /// Every class this type may be an instance of.
    #[must_use]
    pub fn object_classes(&self) -> Vec<&str> {
        match self {
            Self::Object(class) => vec![class.as_str()],
            Self::Union(members) => {
                let mut classes = Vec::new();
                for class in members.iter().flat_map(Self::object_classes) {
                    if !classes.contains(&class) {
                        classes.push(class);
                    }
                }
                classes
            }
            _ => Vec::new(),
        }
    }

    /// Entries of a constant shape, if this is one.
    #[must_use]
    pub fn constant_entries(&self) -> Option<&[(ArrayKey, Self)]> {
        match self {
            Self::Array(entries) => Some(entries),
            _ => None,
        }
    }

    /// True for a constant shape keyed 0..n.
    #[must_use]
    pub fn is_constant_list(&self) -> bool {
        self.constant_entries().is_some_and(is_list)
    }

    /// Value type of an iterable, if this is one.
    #[must_use]
    pub fn iterable_value(&self) -> Option<Self> {
        match self {
            Self::List(inner) | Self::Map(inner) => Some((**inner).clone()),
            Self::Array(entries) => Some(Self::union(entries.iter().map(|(_, t)| t.clone()))),
            _ => None,
        }
    }

    /// Type-level acceptance: every value of `other` is a value of `self`.
    #[must_use]
    pub fn accepts(&self, other: &Self, classes: &dyn ClassLookup) -> bool {
        match (self, other) {
            (_, Self::Never) | (Self::Mixed, _) => true,
            (_, Self::Union(members)) => members.iter().all(|m| self.accepts(m, classes)),
            (Self::Union(members), _) => members.iter().any(|m| m.accepts(other, classes)),
            (Self::Null, Self::Null)
            | (Self::Bool, Self::Bool | Self::ConstBool(_))
            | (Self::Int, Self::Int | Self::ConstInt(_))
            | (Self::Float, Self::Float | Self::Int | Self::ConstInt(_))
            | (Self::Text, Self::Text | Self::ConstText(_) | Self::ClassString(_))
            | (Self::Callable(_), Self::Callable(_)) => true,
            (Self::ConstBool(a), Self::ConstBool(b)) => a == b,
            (Self::ConstInt(a), Self::ConstInt(b)) => a == b,
            (Self::ConstText(a), Self::ConstText(b)) => a == b,
            (Self::ClassString(a), Self::ClassString(b))
            | (Self::List(a), Self::List(b))
            | (Self::Map(a), Self::Map(b) | Self::List(b)) => a.accepts(b, classes),
            (Self::Object(expected), Self::Object(actual)) => {
                classes.is_subclass(actual, expected)
            }
            (Self::List(a), Self::Array(entries)) => {
                is_list(entries) && entries.iter().all(|(_, t)| a.accepts(t, classes))
            }
            (Self::Map(a), Self::Array(entries)) => {
                entries.iter().all(|(_, t)| a.accepts(t, classes))
            }
            (Self::Array(expected), Self::Array(actual)) => {
                expected.len() == actual.len()
                    && expected.iter().all(|(key, t)| {
                        actual
                            .iter()
                            .find(|(k, _)| k == key)
                            .is_some_and(|(_, a)| t.accepts(a, classes))
                    })
            }
            _ => false,
        }
    }

    /// Runtime acceptance of a concrete value.
    #[must_use]
    pub fn accepts_value(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Mixed, _)
            | (Self::Null, Value::Null)
            | (Self::Bool, Value::Bool(_))
            | (Self::Int, Value::Int(_))
            | (Self::Float, Value::Float(_) | Value::Int(_))
            | (Self::Text | Self::ClassString(_), Value::Text(_)) => true,
            (Self::Union(members), _) => members.iter().any(|m| m.accepts_value(value)),
            (Self::ConstBool(a), Value::Bool(b)) => a == b,
            (Self::ConstInt(a), Value::Int(b)) => a == b,
            (Self::ConstText(a), Value::Text(b)) => a == b,
            (Self::Object(class), Value::Object(object)) => object.is_instance_of(class),
            (Self::List(inner), Value::List(items)) => items.iter().all(|v| inner.accepts_value(v)),
            (Self::Map(inner), Value::List(items)) => items.iter().all(|v| inner.accepts_value(v)),
            (Self::Map(inner), Value::Map(map)) => map.values().all(|v| inner.accepts_value(v)),
            (Self::Array(entries), Value::Map(map)) => accepts_shape(entries, map),
            _ => false,
        }
    }

    /// Remove every member accepted by `remove`.
    #[must_use]
    pub fn remove(&self, remove: &Self, classes: &dyn ClassLookup) -> Self {
        match self {
            Self::Union(members) => Self::union(
                members
                    .iter()
                    .filter(|m| !remove.accepts(m, classes))
                    .cloned(),
            ),
            other if remove.accepts(other, classes) => Self::Never,
            other => other.clone(),
        }
    }
}

fn push_unique(members: &mut Vec<Ty>, ty: Ty) {
    if !members.contains(&ty) {
        members.push(ty);
    }
}

fn is_list(entries: &[(ArrayKey, Ty)]) -> bool {
    entries
        .iter()
        .zip(0_i64..)
        .all(|((key, _), i)| *key == ArrayKey::Int(i))
}

fn accepts_shape(entries: &[(ArrayKey, Ty)], map: &FieldMap<Value>) -> bool {
    entries.len() == map.len()
        && entries.iter().all(|(key, ty)| match key {
            ArrayKey::Text(name) => map.get(name).is_some_and(|v| ty.accepts_value(v)),
            ArrayKey::Int(_) => false,
        })
}
