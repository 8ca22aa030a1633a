//! ## Crate layout
//! - `core`: value and class models, the mapper, `to_array`, `clone_with`,
//!   option resolution, diagnostics and tracing.
//! - `analysis`: the same engine over declared types: `to_array` return
//!   shape inference and call-site rules.
//!
//! `#[derive(Dto)]` turns a plain struct into a typed DTO; the `prelude`
//! module brings the runtime surface and the derive into scope.

pub use objmap_analysis as analysis;
pub use objmap_core as core;
pub use objmap_derive::Dto;

// export so derives resolve `::objmap` inside this crate too
extern crate self as objmap;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        config::MapperConfig,
        dto::{ConvertibleToArray as _, Dto as _, DtoExt as _, FieldValue as _},
        error::MapError,
        mapper::{DefaultObjectMapper, MapTarget, ObjectMapper as _},
        model::{ClassKind, ClassModel, ClassRegistry, FieldModel, ParamModel},
        options::Options,
        types::Ty,
        value::{Object, Value},
    };
    pub use objmap_derive::Dto;
}
