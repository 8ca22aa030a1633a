use crate::{
    config::ConverterPolicy,
    convert::{Converter, ConverterTable},
    domain::Domain,
    error::MapError,
    report::ErrorReporter,
    select::PropertySelector,
    value::FieldMap,
};
use std::{fmt, sync::Arc};

///
/// OptionParts
///
/// Raw option pieces as read from either binding (runtime builder or static
/// option shape), before validation.
///

pub struct OptionParts<D: Domain> {
    pub values: FieldMap<D::Item>,
    pub computed: Vec<(String, D::Computed)>,
    pub pick: Option<Vec<String>>,
    pub omit: Option<Vec<String>>,
    pub deep: bool,
    pub converters: Vec<Converter<D>>,
    pub allow_nullable_without_value: bool,
}

impl<D: Domain> Default for OptionParts<D> {
    fn default() -> Self {
        Self {
            values: FieldMap::new(),
            computed: Vec::new(),
            pick: None,
            omit: None,
            deep: false,
            converters: Vec::new(),
            allow_nullable_without_value: false,
        }
    }
}

///
/// ResolvedOptions
///
/// Validated options for one call. Nested projection levels get a derived
/// copy from [`Self::nested`]; the converter table is shared, never copied.
///

pub struct ResolvedOptions<D: Domain> {
    values: FieldMap<D::Item>,
    computed: Vec<(String, D::Computed)>,
    selector: PropertySelector,
    deep: bool,
    converters: Arc<ConverterTable<D>>,
    allow_nullable_without_value: bool,
}

impl<D: Domain> ResolvedOptions<D> {
    #[must_use]
    pub const fn selector(&self) -> &PropertySelector {
        &self.selector
    }

    #[must_use]
    pub const fn deep(&self) -> bool {
        self.deep
    }

    #[must_use]
    pub fn converters(&self) -> &ConverterTable<D> {
        &self.converters
    }

    #[must_use]
    pub const fn allow_nullable_without_value(&self) -> bool {
        self.allow_nullable_without_value
    }

    #[must_use]
    pub fn has_static_values(&self) -> bool {
        !self.values.is_empty() || !self.computed.is_empty()
    }

    /// `values` merged with computed `valuesFn` entries for one source.
    /// Explicit values win; computed keys follow in declaration order.
    pub fn static_values(&self, domain: &D, source: &D::Source) -> FieldMap<D::Item> {
        let mut merged = self.values.clone();
        for (name, computed) in &self.computed {
            if !merged.contains_key(name) {
                merged.insert(name.clone(), domain.compute(computed, source));
            }
        }

        merged
    }

    /// Options for one level of deep descent: no static values, no selection,
    /// same depth flag and converters.
    #[must_use]
    pub fn nested(&self) -> Self {
        Self {
            values: FieldMap::new(),
            computed: Vec::new(),
            selector: PropertySelector::all(),
            deep: self.deep,
            converters: Arc::clone(&self.converters),
            allow_nullable_without_value: self.allow_nullable_without_value,
        }
    }
}

impl<D: Domain> Default for ResolvedOptions<D> {
    fn default() -> Self {
        Self {
            values: FieldMap::new(),
            computed: Vec::new(),
            selector: PropertySelector::all(),
            deep: false,
            converters: Arc::new(ConverterTable::new()),
            allow_nullable_without_value: false,
        }
    }
}

impl<D: Domain> fmt::Debug for ResolvedOptions<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("values", &self.values)
            .field(
                "computed",
                &self.computed.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field("selector", &self.selector)
            .field("deep", &self.deep)
            .field("converters", &self.converters)
            .finish_non_exhaustive()
    }
}

/// Validate option parts into resolved options.
///
/// A `pick`/`omit` conflict is reported and, when the reporter keeps going,
/// the whole option set falls back to defaults.
pub fn resolve<D: Domain>(
    parts: OptionParts<D>,
    policy: ConverterPolicy,
    reporter: &mut dyn ErrorReporter,
) -> Result<ResolvedOptions<D>, MapError> {
    let OptionParts {
        values,
        computed,
        pick,
        omit,
        deep,
        converters,
        allow_nullable_without_value,
    } = parts;

    let mut checked = FieldMap::new();
    for (name, item) in values {
        if name.is_empty() {
            reporter.error(MapError::InvalidOptionName {
                option: "values".into(),
            })?;
            continue;
        }
        checked.insert(name, item);
    }

    let mut checked_computed = Vec::with_capacity(computed.len());
    for (name, entry) in computed {
        if name.is_empty() {
            reporter.error(MapError::InvalidOptionName {
                option: "valuesFn".into(),
            })?;
            continue;
        }
        checked_computed.push((name, entry));
    }

    let pick = check_names("pick", pick, reporter)?;
    let omit = check_names("omit", omit, reporter)?;
    let selector = match PropertySelector::new(pick, omit) {
        Ok(selector) => selector,
        Err(err) => {
            reporter.error(err)?;
            return Ok(ResolvedOptions::default());
        }
    };

    let converters = ConverterTable::build(converters, policy, reporter)?;

    Ok(ResolvedOptions {
        values: checked,
        computed: checked_computed,
        selector,
        deep,
        converters: Arc::new(converters),
        allow_nullable_without_value,
    })
}

fn check_names(
    option: &str,
    names: Option<Vec<String>>,
    reporter: &mut dyn ErrorReporter,
) -> Result<Option<Vec<String>>, MapError> {
    let Some(names) = names else {
        return Ok(None);
    };
    let mut checked = Vec::with_capacity(names.len());
    for name in names {
        if name.is_empty() {
            reporter.error(MapError::InvalidOptionName {
                option: option.to_string(),
            })?;
            continue;
        }
        checked.push(name);
    }

    Ok(Some(checked))
}
