//! Core runtime for objmap: the value model, class models, option resolution,
//! the projection engine behind `to_array`, and the construction planner behind
//! `map` and `clone_with`.
//!
//! Both the runtime entry points and the static analysis front-ends in
//! `objmap-analysis` drive the same engine through the [`domain::Domain`]
//! seam, so the shape a static checker predicts is the shape the runtime
//! produces.

pub mod config;
pub mod convert;
pub mod domain;
pub mod dto;
pub mod error;
pub mod mapper;
pub mod model;
pub mod obs;
pub mod options;
pub mod plan;
pub mod project;
pub mod report;
pub mod select;
pub mod shape;
pub mod types;
pub mod value;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        config::{ConverterPolicy, MapperConfig},
        dto::{ConvertibleToArray, Dto, DtoExt, FieldValue},
        error::MapError,
        mapper::{DefaultObjectMapper, MapTarget, ObjectMapper},
        model::{ClassKind, ClassModel, ClassRegistry, FieldModel, ParamModel, Visibility},
        options::Options,
        types::Ty,
        value::{FieldMap, Object, Value},
    };
}
