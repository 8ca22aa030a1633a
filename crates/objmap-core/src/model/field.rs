use crate::{types::Ty, value::Value};
use derive_more::Display;

///
/// Visibility
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum Visibility {
    #[display("private")]
    Private,
    #[display("protected")]
    Protected,
    #[default]
    #[display("public")]
    Public,
}

///
/// Hooks
/// Accessor hooks declared on a field; their presence replaces plain storage.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Hooks {
    pub get: bool,
    pub set: bool,
}

///
/// FieldModel
///

#[derive(Clone, Debug, PartialEq)]
pub struct FieldModel {
    pub name: String,
    pub ty: Ty,
    pub visibility: Visibility,

    /// Asymmetric write visibility, when narrower than `visibility`.
    pub set_visibility: Option<Visibility>,
    pub readonly: bool,
    pub hooks: Option<Hooks>,
    pub default: Option<Value>,
    pub is_static: bool,
}

impl FieldModel {
    #[must_use]
    pub fn public(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: Visibility::Public,
            set_visibility: None,
            readonly: false,
            hooks: None,
            default: None,
            is_static: false,
        }
    }

    #[must_use]
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    #[must_use]
    pub fn with_set_visibility(mut self, visibility: Visibility) -> Self {
        self.set_visibility = Some(visibility);
        self
    }

    #[must_use]
    pub const fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    #[must_use]
    pub const fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = Some(hooks);
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub const fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn is_readable_from_outside(&self) -> bool {
        !self.is_static && self.visibility == Visibility::Public
    }

    /// Whether code outside the class may assign this field after construction.
    #[must_use]
    pub fn is_writable_from_outside(&self) -> bool {
        if self.is_static || self.readonly {
            return false;
        }
        if let Some(hooks) = self.hooks {
            return hooks.set && self.visibility == Visibility::Public;
        }
        if matches!(
            self.set_visibility,
            Some(Visibility::Private | Visibility::Protected)
        ) {
            return false;
        }

        self.visibility == Visibility::Public
    }
}

///
/// ParamModel
/// One constructor parameter.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ParamModel {
    pub name: String,
    pub ty: Ty,
    pub default: Option<Value>,
}

impl ParamModel {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Ty) -> Self {
        Self {
            name: name.into(),
            ty,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}
