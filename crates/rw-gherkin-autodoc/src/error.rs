//! Autodoc errors and host diagnostics.

use std::fmt;

use rw_gherkin::{KeywordKind, StoreError, StructureError};

use crate::options::OptionError;

/// Error raised while dispatching or generating a directive.
///
/// Content problems ([`is_recoverable`](Self::is_recoverable)) only affect the
/// directive that raised them. The remaining variants mean the registry or the
/// keyword tree broke their contract and must abort the build.
#[derive(Debug, thiserror::Error)]
pub enum AutodocError {
    /// The directive's keyword label has no registered documenter.
    #[error("No documenter registered for keyword '{keyword}' (directive {directive})")]
    UnregisteredKind {
        /// Directive name as invoked.
        directive: String,
        /// Derived keyword label.
        keyword: String,
    },
    /// An option is unknown or has an invalid value.
    #[error("An option to {directive} is either unknown or has an invalid value: {source}")]
    InvalidOption {
        /// Directive name as invoked.
        directive: String,
        /// Validation failure.
        source: OptionError,
    },
    /// The reference does not resolve to any keyword.
    #[error(transparent)]
    NotFound(#[from] StoreError),
    /// The reference resolves to a keyword the directive cannot document.
    #[error("{directive} documents a {objtype}, but '{reference}' is a {found} keyword")]
    WrongKind {
        /// Directive name as invoked.
        directive: String,
        /// Reference argument as given.
        reference: String,
        /// Objtype the directive dispatches to.
        objtype: String,
        /// Kind of the resolved keyword.
        found: KeywordKind,
    },
    /// Nested dispatch found no documenter for a child keyword.
    #[error("No documenter registered for objtype '{0}'")]
    MissingDocumenter(String),
    /// A registered documenter does not fulfil its objtype.
    #[error("Documenter of objtype '{objtype}' was of unexpected type: {detail}")]
    RegistryMismatch {
        /// Objtype the documenter was registered or requested for.
        objtype: String,
        /// What did not match.
        detail: String,
    },
    /// Generation reached a keyword that is already being generated.
    #[error("Keyword #{keyword} of document '{document}' contains itself")]
    CyclicTree {
        /// Document name.
        document: String,
        /// Index of the revisited keyword.
        keyword: usize,
    },
    /// The keyword tree is malformed.
    #[error(transparent)]
    Structure(#[from] StructureError),
}

impl AutodocError {
    /// Whether the build can continue after reporting this error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnregisteredKind { .. }
                | Self::InvalidOption { .. }
                | Self::NotFound(_)
                | Self::WrongKind { .. }
        )
    }
}

/// Recoverable build error tied to a location in the host document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    /// Host document containing the directive.
    pub docname: String,
    /// Line of the directive in the host document.
    pub line: usize,
}

impl Diagnostic {
    #[must_use]
    pub fn error(message: impl Into<String>, docname: &str, line: usize) -> Self {
        Self {
            message: message.into(),
            docname: docname.to_owned(),
            line,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: ERROR: {}",
            self.docname, self.line, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(AutodocError::NotFound(StoreError::NotFound("x".to_owned())).is_recoverable());
        assert!(
            AutodocError::UnregisteredKind {
                directive: "gherkin:autofoo".to_owned(),
                keyword: "Foo".to_owned(),
            }
            .is_recoverable()
        );
        let err = AutodocError::WrongKind {
            directive: "gherkin:autostep".to_owned(),
            reference: "Login::Ok".to_owned(),
            objtype: "step".to_owned(),
            found: KeywordKind::Scenario,
        };
        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "gherkin:autostep documents a step, but 'Login::Ok' is a Scenario keyword"
        );
    }

    #[test]
    fn test_fatal_errors() {
        assert!(!AutodocError::MissingDocumenter("step".to_owned()).is_recoverable());
        assert!(
            !AutodocError::CyclicTree {
                document: "a.feature".to_owned(),
                keyword: 1,
            }
            .is_recoverable()
        );
        assert!(
            !AutodocError::RegistryMismatch {
                objtype: "scenario".to_owned(),
                detail: "built a step documenter".to_owned(),
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::error("bad option", "guide/login", 12);
        assert_eq!(diagnostic.to_string(), "guide/login:12: ERROR: bad option");
    }
}
