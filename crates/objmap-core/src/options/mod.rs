//! Call options for `map`, `map_many` and `to_array`.
//!
//! Options are built at runtime with the [`Options`] builder, or read from a
//! constant option shape by the static parser. Both produce [`OptionParts`],
//! and both are validated by the same [`resolve`].

mod resolve;


pub use resolve::{OptionParts, ResolvedOptions, resolve};

use crate::{
    config::MapperConfig,
    convert::Converter,
    domain::{ConvertFn, RuntimeDomain, ValueFn},
    error::MapError,
    report::FailFast,
    value::{FieldMap, Object, Value},
};
use std::{fmt, sync::Arc};

///
/// Options
///
/// values                   → static values, override source fields
/// values_fn                → values computed from the source object
/// pick / omit              → field selection for projection
/// deep                     → recurse into nested convertible objects
/// converters               → ordered (class, transform) pairs
/// allow_nullable_without_value → missing nullable targets become null
///

#[derive(Clone, Default)]
pub struct Options {
    values: FieldMap<Value>,
    values_fn: Vec<(String, ValueFn)>,
    pick: Option<Vec<String>>,
    omit: Option<Vec<String>>,
    deep: bool,
    converters: Vec<(String, ConvertFn)>,
    allow_nullable_without_value: bool,
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name, value.into());
        self
    }

    #[must_use]
    pub fn values<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (name, value) in values {
            self.values.insert(name, value.into());
        }
        self
    }

    #[must_use]
    pub fn value_fn<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Object) -> Value + Send + Sync + 'static,
    {
        let f: ValueFn = Arc::new(f);
        self.values_fn.push((name.into(), f));
        self
    }

    #[must_use]
    pub fn pick<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pick = Some(names.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn omit<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.omit = Some(names.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn deep(mut self, deep: bool) -> Self {
        self.deep = deep;
        self
    }

    /// Register a converter for instances of `class`. Order is significant.
    #[must_use]
    pub fn converter<F>(mut self, class: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        let f: ConvertFn = Arc::new(f);
        self.converters.push((class.into(), f));
        self
    }

    #[must_use]
    pub const fn allow_nullable_without_value(mut self, allow: bool) -> Self {
        self.allow_nullable_without_value = allow;
        self
    }

    #[must_use]
    pub fn parts(&self) -> OptionParts<RuntimeDomain> {
        OptionParts {
            values: self.values.clone(),
            computed: self.values_fn.clone(),
            pick: self.pick.clone(),
            omit: self.omit.clone(),
            deep: self.deep,
            converters: self
                .converters
                .iter()
                .map(|(class, f)| Converter::new(class.clone(), Arc::clone(f)))
                .collect(),
            allow_nullable_without_value: self.allow_nullable_without_value,
        }
    }

    /// Validate for a runtime call; the first problem is returned as an error.
    pub fn resolve(
        &self,
        config: &MapperConfig,
    ) -> Result<ResolvedOptions<RuntimeDomain>, MapError> {
        resolve(self.parts(), config.converter_policy, &mut FailFast)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("values", &self.values)
            .field(
                "values_fn",
                &self.values_fn.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field("pick", &self.pick)
            .field("omit", &self.omit)
            .field("deep", &self.deep)
            .field(
                "converters",
                &self.converters.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field(
                "allow_nullable_without_value",
                &self.allow_nullable_without_value,
            )
            .finish()
    }
}
