use objmap_core::{error::Diagnostic, types::Ty};

///
/// Arg
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Arg {
    pub name: Option<String>,
    pub ty: Ty,
}

///
/// CallSite
///
/// A method call as the host type checker sees it: receiver type, method
/// name, and argument types, positional or named.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallSite {
    pub receiver: Ty,
    pub method: String,
    pub args: Vec<Arg>,
}

impl CallSite {
    #[must_use]
    pub fn new(receiver: Ty, method: impl Into<String>) -> Self {
        Self {
            receiver,
            method: method.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, ty: Ty) -> Self {
        self.args.push(Arg { name: None, ty });
        self
    }

    #[must_use]
    pub fn named_arg(mut self, name: impl Into<String>, ty: Ty) -> Self {
        self.args.push(Arg {
            name: Some(name.into()),
            ty,
        });
        self
    }

    /// Argument by name, falling back to its position among the leading
    /// positional arguments.
    #[must_use]
    pub fn argument(&self, position: usize, name: &str) -> Option<&Ty> {
        if let Some(arg) = self.args.iter().find(|a| a.name.as_deref() == Some(name)) {
            return Some(&arg.ty);
        }

        self.args
            .iter()
            .take_while(|a| a.name.is_none())
            .nth(position)
            .map(|a| &a.ty)
    }
}

///
/// Rule
/// A static check over one call site.
///

pub trait Rule {
    fn check(&self, call: &CallSite) -> Vec<Diagnostic>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_arguments_win_over_positions() {
        let call = CallSite::new(Ty::object("Dto"), "toArray")
            .arg(Ty::Int)
            .named_arg("options", Ty::Text);

        assert_eq!(call.argument(0, "options"), Some(&Ty::Text));
        assert_eq!(call.argument(0, "other"), Some(&Ty::Int));
        assert_eq!(call.argument(1, "other"), None);
    }
}
