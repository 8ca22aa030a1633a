//! Object mapper.
//!
//! Maps a source object onto a target class (new instance) or a target
//! instance (property writes only), drawing values from the source's public
//! fields, converters, and the `values`/`valuesFn` options.

use crate::{
    config::MapperConfig,
    domain::RuntimeDomain,
    error::MapError,
    model::ClassModel,
    obs::{TraceEvent, TraceSink, emit},
    options::{Options, ResolvedOptions},
    plan::{Origin, PlanContext, ValuePool, plan},
    report::FailFast,
    shape::Shape,
    value::Object,
};
use std::{fmt, sync::Arc};

///
/// MapTarget
///

#[derive(Clone, Debug)]
pub enum MapTarget {
    /// Construct a new instance of this class.
    Class(Arc<ClassModel>),

    /// Fill an existing instance; only writable properties are touched.
    Instance(Object),
}

impl MapTarget {
    #[must_use]
    pub fn class(&self) -> &Arc<ClassModel> {
        match self {
            Self::Class(class) => class,
            Self::Instance(object) => object.class(),
        }
    }
}

impl From<Arc<ClassModel>> for MapTarget {
    fn from(class: Arc<ClassModel>) -> Self {
        Self::Class(class)
    }
}

impl From<Object> for MapTarget {
    fn from(object: Object) -> Self {
        Self::Instance(object)
    }
}

///
/// ObjectMapper
///

pub trait ObjectMapper {
    fn map(&self, source: &Object, target: MapTarget, options: &Options)
    -> Result<Object, MapError>;

    /// Map every source to a new instance of `target`. Options are resolved
    /// once; `valuesFn` runs per element.
    fn map_many<'s, I>(
        &self,
        sources: I,
        target: &Arc<ClassModel>,
        options: &Options,
    ) -> Result<Vec<Object>, MapError>
    where
        Self: Sized,
        I: IntoIterator<Item = &'s Object>;
}

///
/// DefaultObjectMapper
///

#[derive(Clone, Default)]
pub struct DefaultObjectMapper {
    config: MapperConfig,
    trace: Option<Arc<dyn TraceSink>>,
}

impl DefaultObjectMapper {
    #[must_use]
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            trace: None,
        }
    }

    #[must_use]
    pub fn with_trace(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &MapperConfig {
        &self.config
    }

    fn trace(&self) -> Option<&dyn TraceSink> {
        self.trace.as_deref()
    }

    fn map_resolved(
        &self,
        source: &Object,
        target: MapTarget,
        options: &ResolvedOptions<RuntimeDomain>,
    ) -> Result<Object, MapError> {
        let domain = RuntimeDomain;
        let class = Arc::clone(target.class());
        emit(self.trace(), || TraceEvent::MapStart {
            source: source.path().to_string(),
            target: class.path.clone(),
        });

        let statics = options.static_values(&domain, source);
        let mut pool = ValuePool::new();
        for (name, value) in source.public_vars() {
            if statics.contains_key(&name) {
                continue;
            }
            let value = options.converters().apply(&domain, value, self.trace())?;
            pool.insert(name, value, Origin::Source);
        }
        for (name, value) in statics {
            pool.insert(name, value, Origin::Static);
        }

        let shape = Shape::of(&class);
        let cx = PlanContext {
            source: source.path(),
            target: &shape,
            construct: matches!(target, MapTarget::Class(_)),
            allow_nullable_without_value: options.allow_nullable_without_value(),
        };
        let plan = plan(&domain, &cx, pool, &mut FailFast)?;
        let (constructor_args, property_writes) = (plan.arguments.len(), plan.writes.len());

        let object = match target {
            MapTarget::Class(class) => plan.instantiate(&class),
            MapTarget::Instance(mut object) => {
                plan.apply_to(&mut object);
                object
            }
        };
        emit(self.trace(), || TraceEvent::MapFinish {
            source: source.path().to_string(),
            target: class.path.clone(),
            constructor_args,
            property_writes,
        });

        Ok(object)
    }
}

impl ObjectMapper for DefaultObjectMapper {
    fn map(
        &self,
        source: &Object,
        target: MapTarget,
        options: &Options,
    ) -> Result<Object, MapError> {
        let resolved = options.resolve(&self.config)?;

        self.map_resolved(source, target, &resolved)
    }

    fn map_many<'s, I>(
        &self,
        sources: I,
        target: &Arc<ClassModel>,
        options: &Options,
    ) -> Result<Vec<Object>, MapError>
    where
        I: IntoIterator<Item = &'s Object>,
    {
        let resolved = options.resolve(&self.config)?;

        sources
            .into_iter()
            .map(|source| self.map_resolved(source, MapTarget::Class(Arc::clone(target)), &resolved))
            .collect()
    }
}

impl fmt::Debug for DefaultObjectMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultObjectMapper")
            .field("config", &self.config)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}
