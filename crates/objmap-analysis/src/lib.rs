//! Static analysis front-ends for objmap.
//!
//! These run the core projection and planning engine over declared types
//! instead of values. A host type checker describes a call site with
//! [`call::CallSite`]; the front-ends infer `to_array` return shapes and
//! report diagnostics for `to_array`, `clone_with` and `map`/`map_many`
//! calls before anything runs.

pub mod call;
pub mod clone_with;
pub mod domain;
pub mod object_mapper;
pub mod parse;
pub mod to_array;

pub use call::{Arg, CallSite, Rule};
pub use clone_with::CloneWithRule;
pub use domain::TypeDomain;
pub use object_mapper::ObjectMapperRule;
pub use to_array::{ToArrayReturnType, ToArrayRule, ToArrayService};

/// Interface every object mapper implements; `map` calls on its subtypes are checked.
pub const OBJECT_MAPPER: &str = "ObjectMapper";
