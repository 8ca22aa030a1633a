//! Domain seam between the projection/planning engine and what it runs over.
//!
//! The runtime domain works on concrete values; the static domain in
//! `objmap-analysis` works on types. The engine in `project` and `plan` is
//! written once against this trait.

mod runtime;

pub use runtime::{ConvertFn, RuntimeDomain, ValueFn};

use crate::{
    convert::{Converted, ConverterTable},
    error::MapError,
    model::ClassModel,
    shape::FieldDescriptor,
    types::Ty,
    value::FieldMap,
};
use std::{fmt, sync::Arc};

///
/// Domain
///

pub trait Domain: Sized {
    /// One element the engine moves around (a value or a type).
    type Item: Clone + fmt::Debug;

    /// What a source object is when fields are read from it.
    type Source: ?Sized;

    /// Converter payload.
    type Transform;

    /// `valuesFn` payload.
    type Computed;

    /// The single convertible class this item is an instance of, if any.
    fn convertible_class(&self, item: &Self::Item) -> Option<Arc<ClassModel>>;

    /// Borrow an item as a field source, if it is an object.
    fn as_source<'a>(&'a self, item: &'a Self::Item) -> Option<&'a Self::Source>;

    /// Read a readable field; `None` when it is uninitialised.
    fn read_field(&self, source: &Self::Source, field: &FieldDescriptor) -> Option<Self::Item>;

    /// Wrap a projected field map back into an item.
    fn wrap_projection(&self, original: &Self::Item, projected: FieldMap<Self::Item>)
    -> Self::Item;

    /// Item substituted when deep projection re-enters a class already on the
    /// stack. `None` means descend anyway.
    fn on_revisit(&self, item: &Self::Item) -> Option<Self::Item>;

    fn is_sequence(&self, item: &Self::Item) -> bool;

    /// Map over sequence elements, keeping the container kind.
    fn map_elements<F>(&self, item: Self::Item, f: F) -> Result<Self::Item, MapError>
    where
        F: FnMut(Self::Item) -> Result<Self::Item, MapError>;

    /// Apply the first matching converter.
    fn convert(&self, table: &ConverterTable<Self>, item: Self::Item) -> Converted<Self::Item>;

    fn compute(&self, computed: &Self::Computed, source: &Self::Source) -> Self::Item;

    fn assignable(&self, declared: &Ty, item: &Self::Item) -> bool;

    fn describe(&self, item: &Self::Item) -> String;
}
