use crate::{
    OBJECT_MAPPER,
    call::{CallSite, Rule},
    domain::TypeDomain,
    parse::map_parts,
};
use objmap_core::{
    config::MapperConfig,
    error::{ClassRole, Diagnostic, MapError, ValueLocation},
    model::{ClassLookup, ClassModel, ClassRegistry},
    options::resolve,
    plan::{Origin, PlanContext, ValuePool, missing_value, plan},
    report::Collector,
    shape::Shape,
    types::Ty,
};
use std::sync::Arc;

const MAP: &str = "map";
const MAP_MANY: &str = "mapMany";

///
/// ObjectMapperRule
///
/// Checks `map(source, target, options)` and `mapMany(sources, target,
/// options)` calls on object mappers: both sides must resolve to a single
/// class, options must be well-formed, and every target slot must be
/// fillable with a compatible value.
///

#[derive(Clone, Debug)]
pub struct ObjectMapperRule<'r> {
    registry: &'r ClassRegistry,
    config: MapperConfig,
}

impl<'r> ObjectMapperRule<'r> {
    #[must_use]
    pub fn new(registry: &'r ClassRegistry) -> Self {
        Self {
            registry,
            config: MapperConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    fn is_mapper(&self, receiver: &Ty) -> bool {
        receiver
            .object_classes()
            .into_iter()
            .any(|class| self.registry.is_subclass(class, OBJECT_MAPPER))
    }

    fn single_class(
        &self,
        classes: Vec<&str>,
        role: ClassRole,
        reporter: &mut Collector,
    ) -> Option<&'r Arc<ClassModel>> {
        match classes.as_slice() {
            [] => None,
            [class] => self.registry.get(class),
            many => {
                reporter.push(Diagnostic::new(MapError::AmbiguousClass {
                    role,
                    classes: many.iter().map(ToString::to_string).collect(),
                }));
                None
            }
        }
    }

    fn check_mapping(
        &self,
        source: &Arc<ClassModel>,
        target: &Arc<ClassModel>,
        construct: bool,
        options: Option<&Ty>,
        reporter: &mut Collector,
    ) {
        let Ok(Some(parts)) = map_parts(self.registry, options, reporter) else {
            return;
        };
        let Ok(resolved) = resolve(parts, self.config.converter_policy, reporter) else {
            return;
        };
        if !reporter.is_empty() {
            return;
        }

        let domain = TypeDomain::new(self.registry);
        let statics = resolved.static_values(&domain, source);
        let mut pool = ValuePool::new();
        for field in Shape::of(source).readable_fields() {
            if field.is_static || statics.contains_key(&field.name) {
                continue;
            }
            let Ok(ty) = resolved.converters().apply(&domain, field.ty.clone(), None) else {
                return;
            };
            pool.insert(field.name.clone(), ty, Origin::Source);
        }
        for (name, ty) in statics {
            pool.insert(name, ty, Origin::Static);
        }

        let shape = Shape::of(target);
        let cx = PlanContext {
            source: &source.path,
            target: &shape,
            construct,
            allow_nullable_without_value: resolved.allow_nullable_without_value(),
        };
        let Ok(plan) = plan(&domain, &cx, pool, reporter) else {
            return;
        };

        for key in plan.extra {
            reporter.push(
                Diagnostic::new(MapError::ExtraValue {
                    target: target.path.clone(),
                    key,
                })
                .with_tip("Remove the key, or add a matching writable property to the target."),
            );
        }
        for unset in plan.unset {
            reporter.push(missing_value(
                &cx,
                &unset.name,
                ValueLocation::Property,
                unset.nullable,
            ));
        }
    }
}

impl Rule for ObjectMapperRule<'_> {
    fn check(&self, call: &CallSite) -> Vec<Diagnostic> {
        let many = match call.method.as_str() {
            MAP => false,
            MAP_MANY => true,
            _ => return Vec::new(),
        };
        if !self.is_mapper(&call.receiver) {
            return Vec::new();
        }
        let (Some(source), Some(target)) = (
            call.argument(0, "source"),
            call.argument(1, "targetClassOrObject"),
        ) else {
            return Vec::new();
        };
        let source = if many {
            match source.iterable_value() {
                Some(element) => element,
                None => return Vec::new(),
            }
        } else {
            source.clone()
        };
        let (target_classes, construct) = match target {
            Ty::ClassString(inner) => (inner.object_classes(), true),
            other if !many => (other.object_classes(), false),
            _ => return Vec::new(),
        };

        let mut reporter = Collector::new("objectMapper");
        let Some(target) = self.single_class(target_classes, ClassRole::Target, &mut reporter)
        else {
            return reporter.into_diagnostics();
        };
        let Some(source) =
            self.single_class(source.object_classes(), ClassRole::Source, &mut reporter)
        else {
            return reporter.into_diagnostics();
        };

        self.check_mapping(
            source,
            target,
            construct,
            call.argument(2, "options"),
            &mut reporter,
        );

        reporter.into_diagnostics()
    }
}
