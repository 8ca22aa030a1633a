use crate::{
    convert::{Converted, ConverterTable},
    domain::Domain,
    error::MapError,
    model::ClassModel,
    shape::FieldDescriptor,
    types::Ty,
    value::{FieldMap, Object, Value},
};
use std::sync::Arc;

/// Runtime converter: receives the matched object value, returns its replacement.
pub type ConvertFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Runtime `valuesFn` entry: computes a value from the source object.
pub type ValueFn = Arc<dyn Fn(&Object) -> Value + Send + Sync>;

///
/// RuntimeDomain
///

#[derive(Clone, Copy, Debug, Default)]
pub struct RuntimeDomain;

impl Domain for RuntimeDomain {
    type Item = Value;
    type Source = Object;
    type Transform = ConvertFn;
    type Computed = ValueFn;

    fn convertible_class(&self, item: &Value) -> Option<Arc<ClassModel>> {
        match item {
            Value::Object(object) if object.class().is_convertible() => {
                Some(Arc::clone(object.class()))
            }
            _ => None,
        }
    }

    fn as_source<'a>(&'a self, item: &'a Value) -> Option<&'a Object> {
        item.as_object()
    }

    fn read_field(&self, source: &Object, field: &FieldDescriptor) -> Option<Value> {
        source.get(&field.name).cloned()
    }

    fn wrap_projection(&self, _: &Value, projected: FieldMap<Value>) -> Value {
        Value::Map(projected)
    }

    fn on_revisit(&self, _: &Value) -> Option<Value> {
        None
    }

    fn is_sequence(&self, item: &Value) -> bool {
        matches!(item, Value::List(_) | Value::Map(_))
    }

    fn map_elements<F>(&self, item: Value, mut f: F) -> Result<Value, MapError>
    where
        F: FnMut(Value) -> Result<Value, MapError>,
    {
        match item {
            Value::List(items) => items
                .into_iter()
                .map(f)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Value::Map(map) => map.try_map_values(&mut f).map(Value::Map),
            other => f(other),
        }
    }

    fn convert(&self, table: &ConverterTable<Self>, item: Value) -> Converted<Value> {
        let Value::Object(object) = &item else {
            return Converted::unchanged(item);
        };
        let Some(converter) = table.iter().find(|c| object.is_instance_of(c.accept())) else {
            return Converted::unchanged(item);
        };
        let accept = converter.accept().to_string();

        Converted::via(accept, (converter.transform())(&item))
    }

    fn compute(&self, computed: &ValueFn, source: &Object) -> Value {
        computed(source)
    }

    fn assignable(&self, declared: &Ty, item: &Value) -> bool {
        declared.accepts_value(item)
    }

    fn describe(&self, item: &Value) -> String {
        item.describe()
    }
}
