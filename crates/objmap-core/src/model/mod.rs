//! Runtime class models.
//!
//! A `ClassModel` is the explicit description of one class: its fields,
//! constructor parameters, ancestry and conversion capability. Both the
//! runtime mapper and the static analysis front-ends read class structure
//! exclusively through these models; nothing is discovered reflectively.
//!
//! In general:
//! - Derive / host code defines *what exists*
//! - `model` defines *what runs*
mod class;
mod field;
mod registry;

pub use class::{ClassKind, ClassModel, ClassModelBuilder};
pub use field::{FieldModel, Hooks, ParamModel, Visibility};
pub use registry::{ClassLookup, ClassRegistry, NoClasses};
