//! Data transfer objects.
//!
//! Runtime `to_array` and `clone_with` on convertible objects, plus the
//! typed bridge (`Dto`, `FieldValue`) implemented by `#[derive(Dto)]`.

use crate::{
    config::MapperConfig,
    domain::RuntimeDomain,
    error::{CloneKeyReason, MapError, ValueLocation},
    mapper::{MapTarget, ObjectMapper},
    model::ClassModel,
    obs::{TraceEvent, TraceSink, emit},
    options::Options,
    plan::{Origin, PlanContext, ValuePool, plan},
    project::Projector,
    report::FailFast,
    shape::Shape,
    types::{ArrayKey, Ty},
    value::{FieldMap, Object, Value},
};
use std::sync::Arc;

/// Method names the static front-ends recognise.
pub const TO_ARRAY: &str = "toArray";
pub const TO_ARRAY_NO_STRICT: &str = "toArrayNoStrict";
pub const CLONE_WITH: &str = "cloneWith";

///
/// ConvertibleToArray
///

pub trait ConvertibleToArray {
    fn to_array(&self, options: &Options) -> Result<FieldMap, MapError>;

    /// Same data as `to_array`; only the statically inferred type differs.
    fn to_array_no_strict(&self, options: &Options) -> Result<FieldMap, MapError> {
        self.to_array(options)
    }
}

impl ConvertibleToArray for Object {
    fn to_array(&self, options: &Options) -> Result<FieldMap, MapError> {
        ToArray::new(&MapperConfig::default()).project(self, options)
    }
}

///
/// ToArray
/// Configured entry point for runtime projection.
///

#[derive(Clone, Copy)]
pub struct ToArray<'a> {
    config: &'a MapperConfig,
    trace: Option<&'a dyn TraceSink>,
}

impl<'a> ToArray<'a> {
    #[must_use]
    pub const fn new(config: &'a MapperConfig) -> Self {
        Self {
            config,
            trace: None,
        }
    }

    #[must_use]
    pub const fn with_trace(mut self, trace: &'a dyn TraceSink) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn project(&self, object: &Object, options: &Options) -> Result<FieldMap, MapError> {
        if !object.class().is_convertible() {
            return Err(MapError::NotConvertible {
                class: object.path().to_string(),
            });
        }
        let resolved = options.resolve(self.config)?;
        let shape = Shape::of(object.class());

        Projector::new(&RuntimeDomain, self.config)
            .with_trace(self.trace)
            .project(object, &shape, &resolved)
    }
}

/// Check one `clone_with` override key against the class shape, returning
/// the field name it targets.
pub fn check_clone_key(shape: &Shape, key: &ArrayKey) -> Result<String, MapError> {
    let name = match key {
        ArrayKey::Int(key) => {
            return Err(MapError::NumericKeyInClone {
                class: shape.path().to_string(),
                key: *key,
            });
        }
        ArrayKey::Text(name) => name,
    };
    if shape.param(name).is_some() {
        return Ok(name.clone());
    }
    let reason = match shape.field(name) {
        Some(field) if field.is_static => CloneKeyReason::StaticProperty,
        Some(_) => CloneKeyReason::NotConstructorField,
        None => CloneKeyReason::Unknown,
    };

    Err(MapError::UnknownFieldInClone {
        class: shape.path().to_string(),
        field: name.clone(),
        reason,
    })
}

impl Object {
    /// New instance of the same class, built through its constructor from the
    /// current field values with `overrides` replacing individual fields.
    pub fn clone_with<I, K>(&self, overrides: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<ArrayKey>,
    {
        self.clone_with_traced(overrides, None)
    }

    pub fn clone_with_traced<I, K>(
        &self,
        overrides: I,
        trace: Option<&dyn TraceSink>,
    ) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<ArrayKey>,
    {
        let shape = Shape::of(self.class());
        let Some(params) = shape.constructor() else {
            return Err(MapError::MissingConstructor {
                class: self.path().to_string(),
            });
        };

        let mut pool = ValuePool::new();
        for param in params {
            if let Some(value) = self.get(&param.name) {
                pool.insert(param.name.clone(), value.clone(), Origin::Source);
            }
        }
        let mut count = 0;
        for (key, value) in overrides {
            let name = check_clone_key(&shape, &key.into())?;
            pool.insert(name, value, Origin::Static);
            count += 1;
        }
        emit(trace, || TraceEvent::CloneWith {
            class: self.path().to_string(),
            overrides: count,
        });

        let cx = PlanContext {
            source: self.path(),
            target: &shape,
            construct: true,
            allow_nullable_without_value: false,
        };

        Ok(plan(&RuntimeDomain, &cx, pool, &mut FailFast)?.instantiate(self.class()))
    }
}

///
/// FieldValue
/// Conversion between a Rust field type and the dynamic value model.
///

pub trait FieldValue: Sized {
    fn to_value(&self) -> Value;

    fn from_value(value: &Value) -> Option<Self>;

    /// Declared type of a field holding this type.
    fn field_ty() -> Ty;
}

impl FieldValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn field_ty() -> Ty {
        Ty::Bool
    }
}

impl FieldValue for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int()
    }

    fn field_ty() -> Ty {
        Ty::Int
    }
}

impl FieldValue for i32 {
    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_int().and_then(|i| Self::try_from(i).ok())
    }

    fn field_ty() -> Ty {
        Ty::Int
    }
}

impl FieldValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as Self),
            _ => None,
        }
    }

    fn field_ty() -> Ty {
        Ty::Float
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_text().map(ToString::to_string)
    }

    fn field_ty() -> Ty {
        Ty::Text
    }
}

impl FieldValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn field_ty() -> Ty {
        Ty::Mixed
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, FieldValue::to_value)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn field_ty() -> Ty {
        T::field_ty().nullable()
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }

    fn field_ty() -> Ty {
        Ty::list(T::field_ty())
    }
}

///
/// Dto
/// Typed view over a class model, implemented by `#[derive(Dto)]`.
///

pub trait Dto: Sized {
    fn class_model() -> Arc<ClassModel>;

    fn to_object(&self) -> Object;

    fn from_object(object: &Object) -> Result<Self, MapError>;
}

/// Read one field of `object` as `T`; used by derived `from_object`.
pub fn read_field<T: FieldValue>(object: &Object, name: &str) -> Result<T, MapError> {
    let value = object.get(name).ok_or_else(|| MapError::MissingValue {
        source_class: object.path().to_string(),
        target: object.path().to_string(),
        name: name.to_string(),
        location: ValueLocation::Property,
        nullable: T::field_ty().contains_null(),
    })?;

    T::from_value(value).ok_or_else(|| MapError::TypeMismatch {
        target: object.path().to_string(),
        name: name.to_string(),
        location: ValueLocation::Property,
        expected: T::field_ty().describe(),
        found: value.describe(),
        from_static: false,
    })
}

///
/// DtoExt
/// Typed `to_array`, `clone_with` and mapping for derived DTOs.
///

pub trait DtoExt: Dto {
    fn to_array(&self, options: &Options) -> Result<FieldMap, MapError> {
        self.to_object().to_array(options)
    }

    fn clone_with<I, K>(&self, overrides: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<ArrayKey>,
    {
        Self::from_object(&self.to_object().clone_with(overrides)?)
    }

    fn map_into<T: Dto, M: ObjectMapper>(&self, mapper: &M, options: &Options) -> Result<T, MapError> {
        let object = mapper.map(&self.to_object(), MapTarget::Class(T::class_model()), options)?;

        T::from_object(&object)
    }
}

impl<T: Dto> DtoExt for T {}
