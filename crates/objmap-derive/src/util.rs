use convert_case::{Case, Casing};
use syn::{Error, Ident, LitStr};

///
/// RenameRule
///

#[derive(Clone, Copy)]
pub enum RenameRule {
    Camel,
    Kebab,
    Pascal,
    Snake,
}

impl RenameRule {
    pub fn parse(lit: &LitStr) -> Result<Self, Error> {
        match lit.value().as_str() {
            "camelCase" => Ok(Self::Camel),
            "kebab-case" => Ok(Self::Kebab),
            "PascalCase" => Ok(Self::Pascal),
            "snake_case" => Ok(Self::Snake),
            other => Err(Error::new_spanned(
                lit,
                format!("unsupported rename_all rule \"{other}\""),
            )),
        }
    }

    pub fn apply(self, name: &str) -> String {
        match self {
            Self::Camel => name.to_case(Case::Camel),
            Self::Kebab => name.to_case(Case::Kebab),
            Self::Pascal => name.to_case(Case::Pascal),
            Self::Snake => name.to_case(Case::Snake),
        }
    }
}

/// Identifier text without the raw prefix, so `r#type` names `type`.
pub fn unraw(ident: &Ident) -> String {
    let name = ident.to_string();

    match name.strip_prefix("r#") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}
