//! Derived structural view of a class.
//!
//! `Shape` is computed from a `ClassModel` on demand and answers the
//! questions mapping and projection ask: which fields are readable, which
//! are writable from outside, what the constructor needs, what is skipped.

use crate::{model::ClassModel, types::Ty, value::Value};
use std::sync::Arc;

///
/// FieldDescriptor
///

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: Ty,
    pub readable: bool,
    pub writable: bool,
    pub is_static: bool,
    pub has_default: bool,
    pub nullable: bool,
    pub is_constructor_param: bool,

    /// A value may be omitted: the field has a default or its constructor
    /// parameter is optional.
    pub optional: bool,
}

///
/// ParamDescriptor
///

#[derive(Clone, Debug, PartialEq)]
pub struct ParamDescriptor {
    pub name: String,
    pub ty: Ty,
    pub default: Option<Value>,
    pub nullable: bool,
}

impl ParamDescriptor {
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

///
/// Shape
///

#[derive(Clone, Debug)]
pub struct Shape {
    class: Arc<ClassModel>,
    fields: Vec<FieldDescriptor>,
    constructor: Option<Vec<ParamDescriptor>>,
}

impl Shape {
    #[must_use]
    pub fn of(class: &Arc<ClassModel>) -> Self {
        let constructor: Option<Vec<ParamDescriptor>> = class.constructor.as_ref().map(|params| {
            params
                .iter()
                .map(|p| ParamDescriptor {
                    name: p.name.clone(),
                    ty: p.ty.clone(),
                    default: p.default.clone(),
                    nullable: p.ty.contains_null(),
                })
                .collect()
        });

        let fields = class
            .fields
            .iter()
            .map(|field| {
                let param = constructor
                    .as_deref()
                    .and_then(|params| params.iter().find(|p| p.name == field.name));
                let has_default = field.default.is_some();

                FieldDescriptor {
                    name: field.name.clone(),
                    ty: field.ty.clone(),
                    readable: field.is_readable_from_outside(),
                    writable: field.is_writable_from_outside(),
                    is_static: field.is_static,
                    has_default,
                    nullable: field.ty.contains_null(),
                    is_constructor_param: param.is_some(),
                    optional: has_default || param.is_some_and(ParamDescriptor::is_optional),
                }
            })
            .collect();

        Self {
            class: Arc::clone(class),
            fields,
            constructor,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.class.path
    }

    #[must_use]
    pub const fn class(&self) -> &Arc<ClassModel> {
        &self.class
    }

    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Non-static fields readable from outside, in declaration order.
    pub fn readable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.readable)
    }

    #[must_use]
    pub fn constructor(&self) -> Option<&[ParamDescriptor]> {
        self.constructor.as_deref()
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamDescriptor> {
        self.constructor()
            .and_then(|params| params.iter().find(|p| p.name == name))
    }

    #[must_use]
    pub fn skips(&self, name: &str) -> bool {
        self.class.skip_to_array.iter().any(|s| s == name)
    }

    #[must_use]
    pub fn skip_list(&self) -> &[String] {
        &self.class.skip_to_array
    }

    #[must_use]
    pub fn has_instance_field(&self, name: &str) -> bool {
        self.field(name).is_some_and(|f| !f.is_static)
    }
}
