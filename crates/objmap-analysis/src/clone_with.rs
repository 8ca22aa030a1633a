use crate::call::{CallSite, Rule};
use objmap_core::{
    dto::{CLONE_WITH, check_clone_key},
    error::{ClassRole, Diagnostic, MapError, ValueLocation},
    model::{ClassModel, ClassRegistry},
    report::Collector,
    shape::Shape,
    types::{ArrayKey, Ty},
};
use std::{collections::BTreeSet, sync::Arc};

///
/// CloneWithRule
///
/// Checks `cloneWith(values)` calls: the receiver must be a single
/// constructor-bound DTO class, and every override must name a constructor
/// parameter with a compatible type.
///

#[derive(Clone, Copy, Debug)]
pub struct CloneWithRule<'r> {
    registry: &'r ClassRegistry,
}

impl<'r> CloneWithRule<'r> {
    #[must_use]
    pub const fn new(registry: &'r ClassRegistry) -> Self {
        Self { registry }
    }

    fn check_class(&self, class: &Arc<ClassModel>, values: &Ty, reporter: &mut Collector) {
        let shape = Shape::of(class);
        let Some(params) = shape.constructor() else {
            reporter.push(Diagnostic::new(MapError::MissingConstructor {
                class: class.path.clone(),
            }));
            return;
        };
        let Some(entries) = values.constant_entries() else {
            reporter.push(Diagnostic::new(MapError::InvalidOptionsShape {
                option: "values".into(),
                expected: "a constant array".into(),
                found: values.describe(),
            }));
            return;
        };

        let mut used = BTreeSet::new();
        for param in params {
            let key = ArrayKey::Text(param.name.clone());
            let Some((_, ty)) = entries.iter().find(|(k, _)| *k == key) else {
                continue;
            };
            used.insert(key);
            if !param.ty.accepts(ty, self.registry) {
                reporter.push(
                    Diagnostic::new(MapError::TypeMismatch {
                        target: class.path.clone(),
                        name: param.name.clone(),
                        location: ValueLocation::Parameter,
                        expected: param.ty.describe(),
                        found: ty.describe(),
                        from_static: true,
                    })
                    .with_tip("Pass a value of the declared parameter type."),
                );
            }
        }

        for (key, _) in entries {
            if used.contains(key) {
                continue;
            }
            if let Err(err) = check_clone_key(&shape, key) {
                reporter.push(Diagnostic::new(err));
            }
        }
    }
}

impl Rule for CloneWithRule<'_> {
    fn check(&self, call: &CallSite) -> Vec<Diagnostic> {
        if call.method != CLONE_WITH {
            return Vec::new();
        }
        let classes: Vec<_> = call
            .receiver
            .object_classes()
            .into_iter()
            .filter_map(|path| self.registry.get(path))
            .filter(|class| class.is_convertible())
            .collect();
        let mut reporter = Collector::new("cloneWith");

        match classes.as_slice() {
            [] => {}
            [class] => {
                if let Some(values) = call.argument(0, "values") {
                    self.check_class(class, values, &mut reporter);
                }
            }
            many => {
                reporter.push(Diagnostic::new(MapError::AmbiguousClass {
                    role: ClassRole::Receiver,
                    classes: many.iter().map(|c| c.path.clone()).collect(),
                }));
            }
        }

        reporter.into_diagnostics()
    }
}
