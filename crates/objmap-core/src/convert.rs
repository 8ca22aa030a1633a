//! Converter lookup.
//!
//! Converters are an ordered list of (class, transform) pairs. Lookup walks
//! the list and applies the first entry whose class the item is an instance
//! of; sequences are converted element-wise, one level deep.

use crate::{
    config::ConverterPolicy,
    domain::Domain,
    error::MapError,
    obs::{TraceEvent, TraceSink, emit},
    report::ErrorReporter,
};
use std::fmt;

///
/// Converter
///

pub struct Converter<D: Domain> {
    accept: String,
    transform: D::Transform,
}

impl<D: Domain> Converter<D> {
    #[must_use]
    pub fn new(accept: impl Into<String>, transform: D::Transform) -> Self {
        Self {
            accept: accept.into(),
            transform,
        }
    }

    #[must_use]
    pub fn accept(&self) -> &str {
        &self.accept
    }

    #[must_use]
    pub const fn transform(&self) -> &D::Transform {
        &self.transform
    }
}

impl<D: Domain> fmt::Debug for Converter<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("accept", &self.accept)
            .finish_non_exhaustive()
    }
}

///
/// Converted
/// Result of a lookup: the (possibly replaced) item and the matched class.
///

#[derive(Clone, Debug)]
pub struct Converted<T> {
    pub item: T,
    pub via: Option<String>,
}

impl<T> Converted<T> {
    #[must_use]
    pub const fn unchanged(item: T) -> Self {
        Self { item, via: None }
    }

    #[must_use]
    pub const fn via(accept: String, item: T) -> Self {
        Self {
            item,
            via: Some(accept),
        }
    }
}

///
/// ConverterTable
///

pub struct ConverterTable<D: Domain> {
    entries: Vec<Converter<D>>,
}

impl<D: Domain> ConverterTable<D> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a table, applying the duplicate policy through `reporter`.
    /// Duplicates that survive a collecting reporter are dropped.
    pub fn build(
        converters: Vec<Converter<D>>,
        policy: ConverterPolicy,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<Self, MapError> {
        let mut entries: Vec<Converter<D>> = Vec::with_capacity(converters.len());
        for converter in converters {
            let duplicate = entries.iter().any(|c| c.accept == converter.accept);
            if duplicate && policy == ConverterPolicy::RejectDuplicates {
                reporter.error(MapError::DuplicateConverter {
                    class: converter.accept,
                })?;
                continue;
            }
            entries.push(converter);
        }

        Ok(Self { entries })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Converter<D>> {
        self.entries.iter()
    }

    /// Convert one item, mapping over sequence elements one level deep.
    pub fn apply(
        &self,
        domain: &D,
        item: D::Item,
        trace: Option<&dyn TraceSink>,
    ) -> Result<D::Item, MapError> {
        if self.is_empty() {
            return Ok(item);
        }
        if domain.is_sequence(&item) {
            return domain.map_elements(item, |element| Ok(self.apply_one(domain, element, trace)));
        }

        Ok(self.apply_one(domain, item, trace))
    }

    /// Convert one item without looking into sequences.
    pub fn apply_one(&self, domain: &D, item: D::Item, trace: Option<&dyn TraceSink>) -> D::Item {
        if self.is_empty() {
            return item;
        }
        let described = trace.map(|_| domain.describe(&item));
        let converted = domain.convert(self, item);
        if let (Some(accept), Some(class)) = (converted.via.as_ref(), described) {
            emit(trace, || TraceEvent::ConverterApplied {
                class,
                accept: accept.clone(),
            });
        }

        converted.item
    }
}

impl<D: Domain> Default for ConverterTable<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Domain> fmt::Debug for ConverterTable<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}
