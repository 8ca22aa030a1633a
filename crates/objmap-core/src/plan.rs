//! Construction planning.
//!
//! Given a pool of available values and a target shape, decide which values
//! bind to constructor parameters and which are written to properties
//! afterwards. Hard failures go through the reporter; soft findings (extra
//! static keys, unset properties) are returned on the plan for static rules
//! to report and for the runtime to ignore.

use crate::{
    domain::Domain,
    error::{Diagnostic, MapError, ValueLocation},
    model::ClassModel,
    report::ErrorReporter,
    shape::Shape,
    types::Ty,
    value::{FieldMap, Object, Value},
};
use std::{collections::BTreeSet, sync::Arc};

///
/// Origin
/// Where a pooled value came from.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Origin {
    Source,
    Static,
}

///
/// ValuePool
///

#[derive(Clone, Debug)]
pub struct ValuePool<T> {
    entries: FieldMap<(T, Origin)>,
}

impl<T> ValuePool<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: FieldMap::new(),
        }
    }

    /// Insert or overwrite, keeping the position of an existing key.
    pub fn insert(&mut self, name: impl Into<String>, item: T, origin: Origin) {
        self.entries.insert(name, (item, origin));
    }

    pub fn take(&mut self, name: &str) -> Option<(T, Origin)> {
        self.entries.remove(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for ValuePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

///
/// Binding
///

#[derive(Clone, Debug, PartialEq)]
pub enum Binding<T> {
    Default(Value),
    Null,
    Value(T),
}

///
/// ArgBinding
///

#[derive(Clone, Debug, PartialEq)]
pub struct ArgBinding<T> {
    pub name: String,
    pub binding: Binding<T>,
}

///
/// UnsetProperty
/// Writable property that construction leaves without a value.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnsetProperty {
    pub name: String,
    pub nullable: bool,
}

///
/// Plan
///

#[derive(Clone, Debug, PartialEq)]
pub struct Plan<T> {
    pub arguments: Vec<ArgBinding<T>>,
    pub writes: FieldMap<T>,

    /// Source values for fields that cannot be written from outside.
    pub skipped: Vec<String>,

    /// Static values matching no writable field.
    pub extra: Vec<String>,
    pub unset: Vec<UnsetProperty>,
}

///
/// PlanContext
///

#[derive(Clone, Copy, Debug)]
pub struct PlanContext<'a> {
    pub source: &'a str,
    pub target: &'a Shape,

    /// Construct a new instance (class target) rather than fill an existing one.
    pub construct: bool,
    pub allow_nullable_without_value: bool,
}

/// Build a construction plan for `pool` against the target shape.
pub fn plan<D: Domain>(
    domain: &D,
    cx: &PlanContext<'_>,
    mut pool: ValuePool<D::Item>,
    reporter: &mut dyn ErrorReporter,
) -> Result<Plan<D::Item>, MapError> {
    let target = cx.target;
    let mut arguments = Vec::new();
    let mut bound = BTreeSet::new();

    if cx.construct
        && let Some(params) = target.constructor()
    {
        for param in params {
            bound.insert(param.name.as_str());
            let binding = if let Some((item, origin)) = pool.take(&param.name) {
                check_type(
                    domain,
                    cx,
                    (param.name.as_str(), &param.ty),
                    ValueLocation::Parameter,
                    &item,
                    origin,
                    reporter,
                )?;
                Binding::Value(item)
            } else if let Some(default) = &param.default {
                Binding::Default(default.clone())
            } else if cx.allow_nullable_without_value && param.nullable {
                Binding::Null
            } else {
                reporter.report(missing_value(
                    cx,
                    &param.name,
                    ValueLocation::Parameter,
                    param.nullable,
                ))?;
                continue;
            };
            arguments.push(ArgBinding {
                name: param.name.clone(),
                binding,
            });
        }
    }

    let mut writes = FieldMap::new();
    let mut skipped = Vec::new();
    let mut extra = Vec::new();
    for (name, (item, origin)) in pool.entries {
        match (target.field(&name), origin) {
            (Some(field), _) if field.writable => {
                check_type(
                    domain,
                    cx,
                    (field.name.as_str(), &field.ty),
                    ValueLocation::Property,
                    &item,
                    origin,
                    reporter,
                )?;
                writes.insert(name, item);
            }
            (Some(_), Origin::Source) => skipped.push(name),
            (_, Origin::Static) => extra.push(name),
            (None, Origin::Source) => {}
        }
    }

    let mut unset = Vec::new();
    if cx.construct {
        for field in target.fields() {
            if !field.writable
                || field.has_default
                || bound.contains(field.name.as_str())
                || writes.contains_key(&field.name)
                || (cx.allow_nullable_without_value && field.nullable)
            {
                continue;
            }
            unset.push(UnsetProperty {
                name: field.name.clone(),
                nullable: field.nullable,
            });
        }
    }

    Ok(Plan {
        arguments,
        writes,
        skipped,
        extra,
        unset,
    })
}

/// Diagnostic for a target slot with no value, with remediation tips.
#[must_use]
pub fn missing_value(
    cx: &PlanContext<'_>,
    name: &str,
    location: ValueLocation,
    nullable: bool,
) -> Diagnostic {
    let mut diagnostic = Diagnostic::new(MapError::MissingValue {
        source_class: cx.source.to_string(),
        target: cx.target.path().to_string(),
        name: name.to_string(),
        location,
        nullable,
    })
    .with_tip(format!(
        "Check that {} has a public property ${name}.",
        cx.source
    ))
    .with_tip("Provide a value in the \"values\" or \"valuesFn\" option.");
    if nullable && !cx.allow_nullable_without_value {
        diagnostic = diagnostic
            .with_tip("Enable \"allowNullableWithoutValue\" to leave nullable targets as null.");
    }

    diagnostic
}

fn check_type<D: Domain>(
    domain: &D,
    cx: &PlanContext<'_>,
    (name, declared): (&str, &Ty),
    location: ValueLocation,
    item: &D::Item,
    origin: Origin,
    reporter: &mut dyn ErrorReporter,
) -> Result<(), MapError> {
    if domain.assignable(declared, item) {
        return Ok(());
    }
    let from_static = origin == Origin::Static;
    let tip = if from_static {
        "Change the value given in the \"values\" or \"valuesFn\" option."
    } else {
        "Add a converter for the source value, or provide a replacement in the \"values\" option."
    };

    reporter.report(
        Diagnostic::new(MapError::TypeMismatch {
            target: cx.target.path().to_string(),
            name: name.to_string(),
            location,
            expected: declared.describe(),
            found: domain.describe(item),
            from_static,
        })
        .with_tip(tip),
    )
}

impl Plan<Value> {
    /// Construct a new instance: bound arguments assign their same-named
    /// fields, then property writes are applied.
    #[must_use]
    pub fn instantiate(self, class: &Arc<ClassModel>) -> Object {
        let Self {
            arguments, writes, ..
        } = self;
        let mut object = Object::new(Arc::clone(class));
        for arg in arguments {
            if class.field(&arg.name).is_none_or(|f| f.is_static) {
                continue;
            }
            let value = match arg.binding {
                Binding::Value(v) | Binding::Default(v) => v,
                Binding::Null => Value::Null,
            };
            object.set(arg.name, value);
        }
        for (name, value) in writes {
            object.set(name, value);
        }

        object
    }

    /// Apply property writes to an existing instance.
    pub fn apply_to(self, object: &mut Object) {
        for (name, value) in self.writes {
            object.set(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::RuntimeDomain,
        model::{ClassKind, FieldModel, ParamModel},
        report::{Collector, FailFast},
    };

    // ---- helpers ----

    fn user() -> Arc<ClassModel> {
        ClassModel::builder("App\\UserDto")
            .kind(ClassKind::DataTransferObject)
            .promoted(ParamModel::new("name", Ty::Text))
            .promoted(ParamModel::new("age", Ty::Int).with_default(18))
            .promoted(ParamModel::new("email", Ty::Text.nullable()))
            .field(FieldModel::public("note", Ty::Text))
            .build()
    }

    fn pool(entries: &[(&str, Value, Origin)]) -> ValuePool<Value> {
        let mut pool = ValuePool::new();
        for (name, value, origin) in entries {
            pool.insert(*name, value.clone(), *origin);
        }
        pool
    }

    fn run(
        pool: ValuePool<Value>,
        allow_nullable: bool,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Plan<Value>, MapError> {
        let shape = Shape::of(&user());
        let cx = PlanContext {
            source: "App\\User",
            target: &shape,
            construct: true,
            allow_nullable_without_value: allow_nullable,
        };

        plan(&RuntimeDomain, &cx, pool, reporter)
    }

    // ---- tests ----

    #[test]
    fn defaults_and_nullables_fill_missing_parameters() {
        let plan = run(
            pool(&[("name", Value::from("Bob"), Origin::Source)]),
            true,
            &mut FailFast,
        )
        .unwrap();

        assert_eq!(plan.arguments.len(), 3);
        assert_eq!(plan.arguments[1].binding, Binding::Default(Value::Int(18)));
        assert_eq!(plan.arguments[2].binding, Binding::Null);
    }

    #[test]
    fn missing_nullable_parameter_fails_without_the_flag() {
        let err = run(
            pool(&[("name", Value::from("Dave"), Origin::Source)]),
            false,
            &mut FailFast,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            MapError::MissingValue { ref name, location: ValueLocation::Parameter, nullable: true, .. }
                if name == "email"
        ));
    }

    #[test]
    fn static_type_mismatch_is_reported_with_origin() {
        let err = run(
            pool(&[
                ("name", Value::from("Bob"), Origin::Source),
                ("age", Value::from("old"), Origin::Static),
            ]),
            true,
            &mut FailFast,
        )
        .unwrap_err();

        assert!(matches!(err, MapError::TypeMismatch { from_static: true, .. }));
    }

    #[test]
    fn soft_findings_are_collected_on_the_plan() {
        let mut reporter = Collector::new("objectMapper");
        let plan = run(
            pool(&[
                ("name", Value::from("Bob"), Origin::Source),
                ("email", Value::Null, Origin::Source),
                ("bogus", Value::Int(1), Origin::Static),
                ("secret", Value::Int(1), Origin::Source),
            ]),
            false,
            &mut reporter,
        )
        .unwrap();

        assert!(reporter.is_empty());
        assert_eq!(plan.extra, ["bogus"]);
        assert_eq!(
            plan.unset,
            [UnsetProperty {
                name: "note".into(),
                nullable: false
            }]
        );
    }

    #[test]
    fn instantiate_assigns_arguments_then_writes() {
        let mut pool = pool(&[
            ("name", Value::from("Bob"), Origin::Source),
            ("note", Value::from("hi"), Origin::Source),
        ]);
        pool.insert("email", Value::Null, Origin::Static);
        let plan = run(pool, false, &mut FailFast).unwrap();
        let object = plan.instantiate(&user());

        assert_eq!(object.get("age"), Some(&Value::Int(18)));
        assert_eq!(object.get("note"), Some(&Value::from("hi")));
        assert_eq!(object.get("email"), Some(&Value::Null));
    }
}
