use derive_more::Display;
use thiserror::Error as ThisError;

///
/// ValueLocation
/// Where a mapped value lands on the target.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ValueLocation {
    #[display("constructor parameter")]
    Parameter,
    #[display("property")]
    Property,
}

///
/// ClassRole
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ClassRole {
    #[display("receiver")]
    Receiver,
    #[display("source")]
    Source,
    #[display("target")]
    Target,
}

///
/// CloneKeyReason
/// Why an override key cannot be used with `clone_with`.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum CloneKeyReason {
    #[display("property is not a constructor parameter")]
    NotConstructorField,
    #[display("property is static")]
    StaticProperty,
    #[display("property does not exist")]
    Unknown,
}

///
/// MapError
///
/// Failures raised by mapping, projection, cloning and option validation.
/// Each variant carries a stable diagnostic identifier, see [`Self::identifier`].
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum MapError {
    #[error("cannot determine the {role} class, multiple classes possible: {}", .classes.join(", "))]
    AmbiguousClass {
        role: ClassRole,
        classes: Vec<String>,
    },

    #[error("class-string in \"{option}\" option must specify a single class, {} given", .classes.join(", "))]
    AmbiguousConverterTarget {
        option: String,
        classes: Vec<String>,
    },

    #[error("\"pick\" and \"omit\" options cannot be used together")]
    ConflictingSelection,

    #[error("converter in \"{option}\" option: {reason}")]
    ConverterSignature { option: String, reason: String },

    #[error("class-string in \"{option}\" option does not specify any class")]
    ConverterTargetMissing { option: String },

    #[error("projection of {class} exceeds the maximum depth of {max_depth}")]
    DepthLimitExceeded { class: String, max_depth: usize },

    #[error("converter for class {class} is already defined")]
    DuplicateConverter { class: String },

    #[error("key \"{key}\" is present in both \"values\" and \"valuesFn\" options")]
    DuplicateValueKey { key: String },

    #[error("the \"values\" option contains an extra key \"{key}\" that does not exist in {target}")]
    ExtraValue { target: String, key: String },

    #[error("\"{option}\" option contains an empty name")]
    InvalidOptionName { option: String },

    #[error("the \"{option}\" option must be {expected}, {found} given")]
    InvalidOptionsShape {
        option: String,
        expected: String,
        found: String,
    },

    #[error("class {class} does not have a constructor")]
    MissingConstructor { class: String },

    #[error("cannot map {source_class} to {target}: missing value for {location} ${name}")]
    MissingValue {
        source_class: String,
        target: String,
        name: String,
        location: ValueLocation,
        nullable: bool,
    },

    #[error("class {class} does not support array conversion")]
    NotConvertible { class: String },

    #[error("cannot use numeric key {key} when cloning {class}")]
    NumericKeyInClone { class: String, key: i64 },

    #[error("{location} {target}::${name} expects {expected}, {found} given")]
    TypeMismatch {
        target: String,
        name: String,
        location: ValueLocation,
        expected: String,
        found: String,
        from_static: bool,
    },

    #[error("cannot clone {class} with ${field}: {reason}")]
    UnknownFieldInClone {
        class: String,
        field: String,
        reason: CloneKeyReason,
    },

    #[error("property ${property} listed in the skip marker of {class} does not exist")]
    UnknownSkipProperty { class: String, property: String },
}

impl MapError {
    /// Stable identifier, unprefixed. Rule front-ends prepend their own
    /// prefix (`dto.`, `objectMapper.`, `cloneWith.`).
    #[must_use]
    pub fn identifier(&self) -> String {
        match self {
            Self::AmbiguousClass { role, .. } => match role {
                ClassRole::Receiver => "multipleClasses",
                ClassRole::Source => "unionSource",
                ClassRole::Target => "unionTarget",
            }
            .to_string(),
            Self::AmbiguousConverterTarget { option, .. } => {
                format!("options.{option}.classStringMultipleClasses")
            }
            Self::ConflictingSelection => "options.pickAndOmit".to_string(),
            Self::ConverterSignature { option, .. } => format!("options.{option}.parameterType"),
            Self::ConverterTargetMissing { option } => {
                format!("options.{option}.classStringNoClass")
            }
            Self::DepthLimitExceeded { .. } => "deep.depthLimit".to_string(),
            Self::DuplicateConverter { .. } => "options.converters.duplicate".to_string(),
            Self::DuplicateValueKey { .. } => "options.valuesFn.duplicateValueKey".to_string(),
            Self::ExtraValue { .. } => "extraValue".to_string(),
            Self::InvalidOptionName { option } => format!("options.{option}.emptyName"),
            Self::InvalidOptionsShape { option, .. } if option == "options" => {
                "options.invalidType".to_string()
            }
            Self::InvalidOptionsShape { option, .. } => format!("options.{option}.invalidType"),
            Self::MissingConstructor { .. } => "missingConstructor".to_string(),
            Self::MissingValue { location, .. } => match location {
                ValueLocation::Parameter => "missingConstructorParameter",
                ValueLocation::Property => "missingProperty",
            }
            .to_string(),
            Self::NotConvertible { .. } => "notConvertible".to_string(),
            Self::NumericKeyInClone { .. } => "numericKey".to_string(),
            Self::TypeMismatch { .. } => "incompatibleProperty".to_string(),
            Self::UnknownFieldInClone { reason, .. } => match reason {
                CloneKeyReason::NotConstructorField => "missingConstructorProperty",
                CloneKeyReason::StaticProperty => "staticProperty",
                CloneKeyReason::Unknown => "unknownProperty",
            }
            .to_string(),
            Self::UnknownSkipProperty { .. } => "attribute.missingProperty".to_string(),
        }
    }
}

///
/// Diagnostic
/// One reported finding: identifier, error and optional remediation tips.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub identifier: String,
    pub error: MapError,
    pub tips: Vec<String>,
}

impl Diagnostic {
    #[must_use]
    pub fn new(error: MapError) -> Self {
        Self {
            identifier: error.identifier(),
            error,
            tips: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tip(mut self, tip: impl Into<String>) -> Self {
        self.tips.push(tip.into());
        self
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl From<MapError> for Diagnostic {
    fn from(error: MapError) -> Self {
        Self::new(error)
    }
}
