use crate::model::field::{FieldModel, ParamModel};
use derive_more::Display;
use std::sync::Arc;

///
/// ClassKind
///
/// DataTransferObject        → immutable, constructor-bound, convertible
/// MutableDataTransferObject → public writable fields, convertible
/// Plain                     → any other class
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum ClassKind {
    DataTransferObject,
    MutableDataTransferObject,
    #[default]
    Plain,
}

impl ClassKind {
    /// Whether instances carry the array-conversion capability.
    #[must_use]
    pub const fn is_convertible(self) -> bool {
        matches!(self, Self::DataTransferObject | Self::MutableDataTransferObject)
    }
}

///
/// ClassModel
///

#[derive(Clone, Debug, PartialEq)]
pub struct ClassModel {
    /// Fully-qualified class name.
    pub path: String,
    pub kind: ClassKind,

    /// Parent classes and implemented interfaces. Names given to the builder
    /// are direct ancestors only; `inherits` and registration add the
    /// transitive ones.
    pub ancestors: Vec<String>,

    /// Declared fields in declaration order.
    pub fields: Vec<FieldModel>,
    pub constructor: Option<Vec<ParamModel>>,

    /// Field names excluded from array projection.
    pub skip_to_array: Vec<String>,

    /// Set when the class replaces the inherited `to_array` with its own.
    pub overrides_to_array: bool,
}

impl ClassModel {
    #[must_use]
    pub fn builder(path: impl Into<String>) -> ClassModelBuilder {
        ClassModelBuilder::new(path)
    }

    /// `instanceof`: the class itself or any ancestor.
    #[must_use]
    pub fn is_a(&self, class: &str) -> bool {
        self.path == class || self.ancestors.iter().any(|a| a == class)
    }

    #[must_use]
    pub const fn is_convertible(&self) -> bool {
        self.kind.is_convertible()
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldModel> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn param(&self, name: &str) -> Option<&ParamModel> {
        self.constructor
            .as_deref()
            .and_then(|params| params.iter().find(|p| p.name == name))
    }
}

///
/// ClassModelBuilder
///

#[derive(Debug)]
pub struct ClassModelBuilder {
    model: ClassModel,
}

impl ClassModelBuilder {
    fn new(path: impl Into<String>) -> Self {
        Self {
            model: ClassModel {
                path: path.into(),
                kind: ClassKind::Plain,
                ancestors: Vec::new(),
                fields: Vec::new(),
                constructor: None,
                skip_to_array: Vec::new(),
                overrides_to_array: false,
            },
        }
    }

    #[must_use]
    pub const fn kind(mut self, kind: ClassKind) -> Self {
        self.model.kind = kind;
        self
    }

    #[must_use]
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.model.ancestors.push(parent.into());
        self
    }

    #[must_use]
    pub fn implements(self, interface: impl Into<String>) -> Self {
        self.extends(interface)
    }

    /// Extend or implement a known model, taking over its whole ancestry.
    #[must_use]
    pub fn inherits(mut self, parent: &ClassModel) -> Self {
        for name in std::iter::once(&parent.path).chain(&parent.ancestors) {
            if !self.model.ancestors.contains(name) {
                self.model.ancestors.push(name.clone());
            }
        }
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldModel) -> Self {
        self.model.fields.push(field);
        self
    }

    /// Declare a constructor; an empty parameter list is still a constructor.
    #[must_use]
    pub fn constructor(mut self, params: impl IntoIterator<Item = ParamModel>) -> Self {
        self.model
            .constructor
            .get_or_insert_with(Vec::new)
            .extend(params);
        self
    }

    #[must_use]
    pub fn param(self, param: ParamModel) -> Self {
        self.constructor([param])
    }

    /// Constructor parameter promoted to a public field of the same name.
    /// Promoted fields of immutable DTOs are readonly.
    #[must_use]
    pub fn promoted(self, param: ParamModel) -> Self {
        let mut field = FieldModel::public(param.name.clone(), param.ty.clone());
        if self.model.kind == ClassKind::DataTransferObject {
            field = field.readonly();
        }

        self.param(param).field(field)
    }

    #[must_use]
    pub fn skip_to_array<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.model
            .skip_to_array
            .extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub const fn overrides_to_array(mut self) -> Self {
        self.model.overrides_to_array = true;
        self
    }

    #[must_use]
    pub fn build(self) -> Arc<ClassModel> {
        Arc::new(self.model)
    }
}
