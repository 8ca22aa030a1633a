//! Array projection engine.
//!
//! One pass per object: readable fields, then selection, then removal of
//! static-value keys, then the skip list. Surviving fields are deep-projected
//! or converted, and static values are appended last. The same engine runs
//! over runtime values and over static types.

use crate::{
    config::MapperConfig,
    domain::Domain,
    error::MapError,
    model::ClassModel,
    obs::{TraceEvent, TraceSink, emit},
    options::ResolvedOptions,
    shape::Shape,
    value::FieldMap,
};
use std::sync::Arc;

///
/// Projector
///

pub struct Projector<'a, D: Domain> {
    domain: &'a D,
    config: &'a MapperConfig,
    trace: Option<&'a dyn TraceSink>,
    stack: Vec<String>,
}

impl<'a, D: Domain> Projector<'a, D> {
    #[must_use]
    pub const fn new(domain: &'a D, config: &'a MapperConfig) -> Self {
        Self {
            domain,
            config,
            trace: None,
            stack: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_trace(mut self, trace: Option<&'a dyn TraceSink>) -> Self {
        self.trace = trace;
        self
    }

    /// Project one source object of the given shape into an ordered field map.
    pub fn project(
        &mut self,
        source: &D::Source,
        shape: &Shape,
        options: &ResolvedOptions<D>,
    ) -> Result<FieldMap<D::Item>, MapError> {
        let statics = options.static_values(self.domain, source);

        self.stack.push(shape.path().to_string());
        let projected = self.project_fields(source, shape, options, &statics);
        self.stack.pop();

        let mut out = projected?;
        for (name, item) in statics {
            out.insert(name, item);
        }
        emit(self.trace, || TraceEvent::ToArray {
            class: shape.path().to_string(),
            fields: out.len(),
        });

        Ok(out)
    }

    fn project_fields(
        &mut self,
        source: &D::Source,
        shape: &Shape,
        options: &ResolvedOptions<D>,
        statics: &FieldMap<D::Item>,
    ) -> Result<FieldMap<D::Item>, MapError> {
        let mut out = FieldMap::new();
        for field in shape.readable_fields() {
            if !options.selector().should_include(&field.name)
                || statics.contains_key(&field.name)
                || shape.skips(&field.name)
            {
                continue;
            }
            let Some(item) = self.domain.read_field(source, field) else {
                continue;
            };
            let item = self.project_item(item, options)?;
            out.insert(field.name.clone(), item);
        }

        Ok(out)
    }

    fn project_item(
        &mut self,
        item: D::Item,
        options: &ResolvedOptions<D>,
    ) -> Result<D::Item, MapError> {
        let domain = self.domain;
        if options.deep() {
            if let Some(class) = domain.convertible_class(&item) {
                return self.descend(item, &class, options);
            }
            if domain.is_sequence(&item) {
                return domain.map_elements(item, |element| match domain.convertible_class(&element) {
                    Some(class) => self.descend(element, &class, options),
                    None => Ok(options
                        .converters()
                        .apply_one(domain, element, self.trace)),
                });
            }
        }

        options.converters().apply(domain, item, self.trace)
    }

    fn descend(
        &mut self,
        item: D::Item,
        class: &Arc<ClassModel>,
        options: &ResolvedOptions<D>,
    ) -> Result<D::Item, MapError> {
        let domain = self.domain;
        if self.stack.iter().any(|path| *path == class.path)
            && let Some(widened) = domain.on_revisit(&item)
        {
            return Ok(widened);
        }
        if self.stack.len() >= self.config.max_depth {
            return Err(MapError::DepthLimitExceeded {
                class: class.path.clone(),
                max_depth: self.config.max_depth,
            });
        }
        let Some(source) = domain.as_source(&item) else {
            return Ok(item);
        };

        emit(self.trace, || TraceEvent::DeepDescend {
            class: class.path.clone(),
            depth: self.stack.len(),
        });
        let shape = Shape::of(class);
        let projected = self.project(source, &shape, &options.nested())?;

        Ok(domain.wrap_projection(&item, projected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::RuntimeDomain,
        model::{ClassKind, FieldModel, ParamModel},
        options::Options,
        types::Ty,
        value::{Object, Value},
    };

    // ---- helpers ----

    fn node_class() -> Arc<ClassModel> {
        ClassModel::builder("App\\Node")
            .kind(ClassKind::MutableDataTransferObject)
            .field(FieldModel::public("label", Ty::Text))
            .field(FieldModel::public("child", Ty::object("App\\Node").nullable()))
            .build()
    }

    fn chain(depth: usize) -> Object {
        let class = node_class();
        let mut node = Object::new(Arc::clone(&class))
            .with("label", "leaf")
            .with("child", Value::Null);
        for i in 0..depth {
            node = Object::new(Arc::clone(&class))
                .with("label", format!("n{i}"))
                .with("child", node);
        }

        node
    }

    fn project(object: &Object, options: &Options, config: &MapperConfig) -> Result<FieldMap, MapError> {
        let resolved = options.resolve(config)?;
        let shape = Shape::of(object.class());

        Projector::new(&RuntimeDomain, config).project(object, &shape, &resolved)
    }

    // ---- tests ----

    #[test]
    fn static_values_are_appended_after_fields() {
        let class = ClassModel::builder("App\\Article")
            .kind(ClassKind::DataTransferObject)
            .promoted(ParamModel::new("id", Ty::Int))
            .promoted(ParamModel::new("title", Ty::Text))
            .build();
        let article = Object::new(class).with("id", 1).with("title", "T");
        let out = project(
            &article,
            &Options::new().value("id", 9),
            &MapperConfig::default(),
        )
        .unwrap();

        assert_eq!(out.keys().collect::<Vec<_>>(), ["title", "id"]);
        assert_eq!(out.get("id"), Some(&Value::Int(9)));
    }

    #[test]
    fn recursive_runtime_structures_project_fully() {
        let out = project(&chain(3), &Options::new().deep(true), &MapperConfig::default())
            .unwrap();

        let mut level = Value::Map(out);
        let mut labels = Vec::new();
        while let Value::Map(map) = level {
            labels.push(map.get("label").cloned().unwrap());
            level = map.get("child").cloned().unwrap();
        }

        assert_eq!(labels.len(), 4);
        assert_eq!(level, Value::Null);
    }

    #[test]
    fn depth_limit_is_enforced() {
        let config = MapperConfig {
            max_depth: 2,
            ..MapperConfig::default()
        };
        let err = project(&chain(5), &Options::new().deep(true), &config).unwrap_err();

        assert_eq!(
            err,
            MapError::DepthLimitExceeded {
                class: "App\\Node".into(),
                max_depth: 2
            }
        );
    }

    #[test]
    fn shallow_projection_keeps_nested_objects() {
        let out = project(&chain(1), &Options::new(), &MapperConfig::default()).unwrap();

        assert!(matches!(out.get("child"), Some(Value::Object(_))));
    }
}
