use serde::{Deserialize, Serialize};

/// Default bound on deep projection nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

///
/// ConverterPolicy
///
/// RejectDuplicates → two converters for the same class is an option error
/// FirstMatch       → duplicates are kept, the first registered entry wins
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConverterPolicy {
    FirstMatch,
    #[default]
    RejectDuplicates,
}

///
/// MapperConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    pub max_depth: usize,
    pub converter_policy: ConverterPolicy,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            converter_policy: ConverterPolicy::default(),
        }
    }
}
