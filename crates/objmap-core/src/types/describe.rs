use crate::types::{ArrayKey, Signature, Ty};
use std::fmt::{self, Display};

impl Ty {
    /// Human-readable rendering used in diagnostic messages.
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(entries) => {
                f.write_str("array{")?;
                for (i, (key, ty)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match key {
                        ArrayKey::Int(_) => write!(f, "{ty}")?,
                        ArrayKey::Text(name) => write!(f, "{name}: {ty}")?,
                    }
                }
                f.write_str("}")
            }
            Self::Bool => f.write_str("bool"),
            Self::Callable(signatures) => match signatures.as_slice() {
                [signature] => write!(f, "{signature}"),
                _ => f.write_str("callable"),
            },
            Self::ClassString(inner) => write!(f, "class-string<{inner}>"),
            Self::ConstBool(b) => write!(f, "{b}"),
            Self::ConstInt(i) => write!(f, "{i}"),
            Self::ConstText(s) => write!(f, "'{s}'"),
            Self::Float => f.write_str("float"),
            Self::Int => f.write_str("int"),
            Self::List(inner) => write!(f, "list<{inner}>"),
            Self::Map(inner) => write!(f, "array<{inner}>"),
            Self::Mixed => f.write_str("mixed"),
            Self::Never => f.write_str("never"),
            Self::Null => f.write_str("null"),
            Self::Object(class) => f.write_str(class),
            Self::Text => f.write_str("string"),
            Self::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("callable(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, "): {}", self.ret)
    }
}
