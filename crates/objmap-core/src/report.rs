//! Error reporting strategies.
//!
//! The same validation code runs in two modes: fail-fast (runtime calls and
//! static return-type inference) and collecting (static rules). Validation
//! code always goes through an [`ErrorReporter`] and never decides the mode
//! itself.

use crate::error::{Diagnostic, MapError};

///
/// ErrorReporter
///

pub trait ErrorReporter {
    /// Report a finding. Fail-fast reporters return it as an error;
    /// collectors record it and return `Ok`.
    fn report(&mut self, diagnostic: Diagnostic) -> Result<(), MapError>;

    /// A malformed input that another rule is responsible for reporting.
    /// Fail-fast reporters still abort; collectors stay silent.
    fn suppressed(&mut self, error: MapError) -> Result<(), MapError>;

    fn error(&mut self, error: MapError) -> Result<(), MapError> {
        self.report(Diagnostic::new(error))
    }
}

///
/// FailFast
///

#[derive(Clone, Copy, Debug, Default)]
pub struct FailFast;

impl ErrorReporter for FailFast {
    fn report(&mut self, diagnostic: Diagnostic) -> Result<(), MapError> {
        Err(diagnostic.error)
    }

    fn suppressed(&mut self, error: MapError) -> Result<(), MapError> {
        Err(error)
    }
}

///
/// Collector
/// Records diagnostics under an identifier prefix such as `dto`.
///

#[derive(Clone, Debug)]
pub struct Collector {
    prefix: &'static str,
    diagnostics: Vec<Diagnostic>,
}

impl Collector {
    #[must_use]
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            diagnostics: Vec::new(),
        }
    }

    /// Record a diagnostic under this collector's prefix.
    pub fn push(&mut self, mut diagnostic: Diagnostic) {
        diagnostic.identifier = format!("{}.{}", self.prefix, diagnostic.identifier);
        self.diagnostics.push(diagnostic);
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl ErrorReporter for Collector {
    fn report(&mut self, diagnostic: Diagnostic) -> Result<(), MapError> {
        self.push(diagnostic);

        Ok(())
    }

    fn suppressed(&mut self, _: MapError) -> Result<(), MapError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fail_fast_returns_the_first_error() {
        let mut reporter = FailFast;
        let err = reporter.error(MapError::ConflictingSelection).unwrap_err();

        assert_eq!(err, MapError::ConflictingSelection);
        assert!(reporter.suppressed(MapError::ConflictingSelection).is_err());
    }

    #[test]
    fn collector_prefixes_identifiers_and_keeps_going() {
        let mut reporter = Collector::new("dto");
        reporter.error(MapError::ConflictingSelection).unwrap();
        reporter
            .suppressed(MapError::InvalidOptionName {
                option: "pick".into(),
            })
            .unwrap();

        let diagnostics = reporter.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].identifier, "dto.options.pickAndOmit");
    }

    #[test]
    fn push_records_without_a_result() {
        let mut reporter = Collector::new("cloneWith");
        reporter.push(Diagnostic::new(MapError::ConflictingSelection).with_tip("pick one"));

        assert_eq!(reporter.diagnostics().len(), 1);
        assert_eq!(
            reporter.diagnostics()[0].identifier,
            "cloneWith.options.pickAndOmit"
        );
    }
}
