use crate::{
    model::ClassModel,
    value::{FieldMap, Value},
};
use serde::{Serialize, Serializer};
use std::sync::Arc;

///
/// Object
///
/// Instance of a modelled class. Fields that were never assigned are absent
/// from the field map rather than null.
///

#[derive(Clone, Debug)]
pub struct Object {
    class: Arc<ClassModel>,
    fields: FieldMap<Value>,
}

impl Object {
    /// Fresh instance with declared field defaults applied.
    #[must_use]
    pub fn new(class: Arc<ClassModel>) -> Self {
        let fields = class
            .fields
            .iter()
            .filter(|field| !field.is_static)
            .filter_map(|field| field.default.clone().map(|d| (field.name.clone(), d)))
            .collect();

        Self { class, fields }
    }

    #[must_use]
    pub const fn class(&self) -> &Arc<ClassModel> {
        &self.class
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.class.path
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Assign a field from inside the class scope; no visibility checks.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name, value.into());
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    #[must_use]
    pub const fn fields(&self) -> &FieldMap<Value> {
        &self.fields
    }

    #[must_use]
    pub fn is_instance_of(&self, class: &str) -> bool {
        self.class.is_a(class)
    }

    /// Initialised fields readable from outside the class, in declaration order.
    #[must_use]
    pub fn public_vars(&self) -> FieldMap<Value> {
        self.class
            .fields
            .iter()
            .filter(|field| field.is_readable_from_outside())
            .filter_map(|field| {
                self.fields
                    .get(&field.name)
                    .map(|v| (field.name.clone(), v.clone()))
            })
            .collect()
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        // field assignment order is not part of object identity
        self.class.path == other.class.path
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, v)| other.fields.get(name) == Some(v))
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.public_vars().serialize(serializer)
    }
}
