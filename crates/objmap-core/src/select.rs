use crate::error::MapError;
use std::collections::BTreeSet;

///
/// PropertySelector
///
/// Decides which field names survive projection. `pick` and `omit` are
/// mutually exclusive; an empty list counts as not given.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PropertySelector {
    pick: Option<BTreeSet<String>>,
    omit: BTreeSet<String>,
}

impl PropertySelector {
    /// Select every field.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(pick: Option<Vec<String>>, omit: Option<Vec<String>>) -> Result<Self, MapError> {
        let pick: BTreeSet<String> = pick.unwrap_or_default().into_iter().collect();
        let omit: BTreeSet<String> = omit.unwrap_or_default().into_iter().collect();
        if !pick.is_empty() && !omit.is_empty() {
            return Err(MapError::ConflictingSelection);
        }

        Ok(Self {
            pick: (!pick.is_empty()).then_some(pick),
            omit,
        })
    }

    #[must_use]
    pub fn should_include(&self, name: &str) -> bool {
        match &self.pick {
            Some(pick) => pick.contains(name),
            None => !self.omit.contains(name),
        }
    }
}
