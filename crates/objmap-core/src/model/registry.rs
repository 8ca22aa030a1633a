use crate::model::class::ClassModel;
use std::{collections::BTreeMap, sync::Arc};

///
/// ClassLookup
/// Resolves class names to models for type-level subtyping.
///

pub trait ClassLookup {
    fn class(&self, path: &str) -> Option<&Arc<ClassModel>>;

    /// Transitive subtyping, walking ancestors through this lookup.
    fn is_subclass(&self, class: &str, ancestor: &str) -> bool {
        let mut pending = vec![class.to_string()];
        let mut seen: Vec<String> = Vec::new();
        while let Some(path) = pending.pop() {
            if path == ancestor {
                return true;
            }
            if seen.contains(&path) {
                continue;
            }
            if let Some(model) = self.class(&path) {
                pending.extend(model.ancestors.iter().cloned());
            }
            seen.push(path);
        }

        false
    }
}

///
/// NoClasses
/// Lookup with no registered classes; only identical names are subtypes.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct NoClasses;

impl ClassLookup for NoClasses {
    fn class(&self, _: &str) -> Option<&Arc<ClassModel>> {
        None
    }
}

///
/// ClassRegistry
///
/// Class models by path. Every stored model carries its full ancestry,
/// whatever order parents and children were registered in.
///

#[derive(Clone, Debug, Default)]
pub struct ClassRegistry {
    classes: BTreeMap<String, Arc<ClassModel>>,
}

impl ClassRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model, returning the stored (ancestor-flattened) copy.
    pub fn register(&mut self, model: Arc<ClassModel>) -> Arc<ClassModel> {
        let ancestors = self.ancestry(&model);
        let stored = if ancestors == model.ancestors {
            model
        } else {
            let mut flattened = (*model).clone();
            flattened.ancestors = ancestors;
            Arc::new(flattened)
        };
        self.classes.insert(stored.path.clone(), Arc::clone(&stored));
        self.flatten();

        stored
    }

    // Children registered before their parents pick up the new ancestry here.
    fn flatten(&mut self) {
        let updates: Vec<(String, Vec<String>)> = self
            .classes
            .values()
            .filter_map(|model| {
                let ancestors = self.ancestry(model);
                (ancestors != model.ancestors).then(|| (model.path.clone(), ancestors))
            })
            .collect();

        for (path, ancestors) in updates {
            if let Some(model) = self.classes.get_mut(&path) {
                Arc::make_mut(model).ancestors = ancestors;
            }
        }
    }

    fn ancestry(&self, model: &ClassModel) -> Vec<String> {
        let mut ancestors = Vec::new();
        let mut pending: Vec<&str> = model.ancestors.iter().map(String::as_str).collect();
        pending.reverse();
        while let Some(name) = pending.pop() {
            if name == model.path || ancestors.iter().any(|a| a == name) {
                continue;
            }
            ancestors.push(name.to_string());
            if let Some(parent) = self.classes.get(name) {
                pending.extend(parent.ancestors.iter().rev().map(String::as_str));
            }
        }

        ancestors
    }

    #[must_use]
    pub fn with(mut self, model: Arc<ClassModel>) -> Self {
        self.register(model);
        self
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Arc<ClassModel>> {
        self.classes.get(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassLookup for ClassRegistry {
    fn class(&self, path: &str) -> Option<&Arc<ClassModel>> {
        self.get(path)
    }
}
