use crate::{
    call::{CallSite, Rule},
    domain::TypeDomain,
    parse::to_array_parts,
};
use objmap_core::{
    config::MapperConfig,
    dto::{TO_ARRAY, TO_ARRAY_NO_STRICT},
    error::{Diagnostic, MapError},
    model::{ClassModel, ClassRegistry},
    options::{ResolvedOptions, resolve},
    project::Projector,
    report::{Collector, ErrorReporter, FailFast},
    shape::Shape,
    types::Ty,
};
use std::sync::Arc;

///
/// ToArrayService
///
/// Static `to_array`: option validation in collecting mode, return shape
/// inference in fail-fast mode.
///

#[derive(Clone, Debug)]
pub struct ToArrayService<'r> {
    registry: &'r ClassRegistry,
    config: MapperConfig,
}

impl<'r> ToArrayService<'r> {
    #[must_use]
    pub fn new(registry: &'r ClassRegistry) -> Self {
        Self::with_config(registry, MapperConfig::default())
    }

    #[must_use]
    pub const fn with_config(registry: &'r ClassRegistry, config: MapperConfig) -> Self {
        Self { registry, config }
    }

    #[must_use]
    pub const fn registry(&self) -> &'r ClassRegistry {
        self.registry
    }

    /// Every problem with the options and the class's skip marker.
    #[must_use]
    pub fn collect_errors(&self, class: &ClassModel, options: Option<&Ty>) -> Vec<Diagnostic> {
        let mut reporter = Collector::new("dto");
        // a collector never short-circuits
        let _ = self.resolve_options(options, &mut reporter);
        check_skip_marker(class, &mut reporter);

        reporter.into_diagnostics()
    }

    /// Inferred return shape: the union of each class's projection.
    /// `None` when the options are invalid or no class is given.
    #[must_use]
    pub fn execute(&self, classes: &[Arc<ClassModel>], options: Option<&Ty>) -> Option<Ty> {
        let resolved = self.resolve_options(options, &mut FailFast).ok()??;
        let domain = TypeDomain::new(self.registry);

        let mut shapes = Vec::with_capacity(classes.len());
        for class in classes {
            let shape = Shape::of(class);
            let projected = Projector::new(&domain, &self.config)
                .project(class, &shape, &resolved)
                .ok()?;
            shapes.push(TypeDomain::shape_of(projected));
        }

        (!shapes.is_empty()).then(|| Ty::union(shapes))
    }

    fn resolve_options(
        &self,
        options: Option<&Ty>,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Option<ResolvedOptions<TypeDomain<'r>>>, MapError> {
        let Some(parts) = to_array_parts(self.registry, options, reporter)? else {
            return Ok(None);
        };

        resolve(parts, self.config.converter_policy, reporter).map(Some)
    }

    /// Convertible class models for every class the receiver may be.
    /// `None` if any of them is unknown or not convertible.
    fn receiver_classes(&self, receiver: &Ty) -> Option<Vec<Arc<ClassModel>>> {
        receiver
            .object_classes()
            .into_iter()
            .map(|path| {
                self.registry
                    .get(path)
                    .filter(|class| class.is_convertible())
                    .cloned()
            })
            .collect()
    }
}

fn check_skip_marker(class: &ClassModel, reporter: &mut Collector) {
    for property in &class.skip_to_array {
        let exists = class
            .field(property)
            .is_some_and(|field| !field.is_static);
        if !exists {
            reporter.push(Diagnostic::new(MapError::UnknownSkipProperty {
                class: class.path.clone(),
                property: property.clone(),
            }));
        }
    }
}

///
/// ToArrayReturnType
/// Return type extension for `toArray` / `toArrayNoStrict` calls.
///

#[derive(Clone, Debug)]
pub struct ToArrayReturnType<'r> {
    service: ToArrayService<'r>,
}

impl<'r> ToArrayReturnType<'r> {
    #[must_use]
    pub const fn new(service: ToArrayService<'r>) -> Self {
        Self { service }
    }

    #[must_use]
    pub fn is_method_supported(&self, method: &str) -> bool {
        method == TO_ARRAY || method == TO_ARRAY_NO_STRICT
    }

    /// Inferred type of the call, or `None` to fall back to the declared type.
    #[must_use]
    pub fn return_type(&self, call: &CallSite) -> Option<Ty> {
        if !self.is_method_supported(&call.method) {
            return None;
        }
        let classes = self.service.receiver_classes(&call.receiver)?;
        if classes.iter().any(|class| class.overrides_to_array) {
            return None;
        }
        if call.method == TO_ARRAY_NO_STRICT {
            return Some(Ty::map(Ty::Mixed));
        }

        self.service.execute(&classes, call.argument(0, "options"))
    }

    /// Inferred type of a `parent::toArray(...)` call made from inside `scope`.
    #[must_use]
    pub fn parent_call_return_type(&self, scope: &Arc<ClassModel>, call: &CallSite) -> Option<Ty> {
        if call.method != TO_ARRAY || !scope.is_convertible() {
            return None;
        }

        self.service
            .execute(std::slice::from_ref(scope), call.argument(0, "options"))
    }
}

///
/// ToArrayRule
///

#[derive(Clone, Debug)]
pub struct ToArrayRule<'r> {
    service: ToArrayService<'r>,
}

impl<'r> ToArrayRule<'r> {
    #[must_use]
    pub const fn new(service: ToArrayService<'r>) -> Self {
        Self { service }
    }
}

impl Rule for ToArrayRule<'_> {
    fn check(&self, call: &CallSite) -> Vec<Diagnostic> {
        if call.method != TO_ARRAY && call.method != TO_ARRAY_NO_STRICT {
            return Vec::new();
        }
        let options = call.argument(0, "options");

        call.receiver
            .object_classes()
            .into_iter()
            .filter_map(|path| self.service.registry().get(path))
            .filter(|class| class.is_convertible())
            .flat_map(|class| self.service.collect_errors(class, options))
            .collect()
    }
}
