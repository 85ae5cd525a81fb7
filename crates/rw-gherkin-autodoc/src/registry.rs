//! Documenter registry.
//!
//! Explicit table from objtype tag to the option schema and factory of the
//! documenter handling that objtype. Built once at setup and shared read-only
//! by all directive runs.

use std::collections::BTreeMap;
use std::fmt;

use rw_gherkin::{Document, KeywordId};

use crate::documenter::{
    Documenter, background_documenter, examples_documenter, feature_documenter,
    rule_documenter, scenario_documenter, step_documenter,
};
use crate::error::AutodocError;
use crate::options::{OptionSpec, Options, default_option_spec};

/// Constructor of a documenter bound to one keyword.
pub type DocumenterFactory = for<'a> fn(
    &'a Document,
    KeywordId,
    Options,
) -> Result<Box<dyn Documenter + 'a>, AutodocError>;

/// Registration of one documenter.
#[derive(Clone)]
pub struct DocumenterEntry {
    pub option_spec: OptionSpec,
    pub factory: DocumenterFactory,
}

impl fmt::Debug for DocumenterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumenterEntry")
            .field("option_spec", &self.option_spec)
            .finish_non_exhaustive()
    }
}

/// Table of documenters keyed by objtype.
#[derive(Debug, Default)]
pub struct DocumenterRegistry {
    entries: BTreeMap<String, DocumenterEntry>,
}

impl DocumenterRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the six built-in documenters.
    #[must_use]
    pub fn with_defaults() -> Self {
        let defaults: [(&str, DocumenterFactory); 6] = [
            ("feature", feature_documenter),
            ("rule", rule_documenter),
            ("background", background_documenter),
            ("scenario", scenario_documenter),
            ("examples", examples_documenter),
            ("step", step_documenter),
        ];

        let mut registry = Self::new();
        for (objtype, factory) in defaults {
            registry.register(objtype, default_option_spec(), factory);
        }
        registry
    }

    /// Register a documenter, replacing any previous one for `objtype`.
    pub fn register(&mut self, objtype: &str, option_spec: OptionSpec, factory: DocumenterFactory) {
        let entry = DocumenterEntry {
            option_spec,
            factory,
        };
        if self.entries.insert(objtype.to_owned(), entry).is_some() {
            tracing::warn!(objtype, "Replacing registered documenter");
        }
    }

    /// Remove the documenter registered for `objtype`.
    pub fn unregister(&mut self, objtype: &str) -> Option<DocumenterEntry> {
        self.entries.remove(objtype)
    }

    #[must_use]
    pub fn get(&self, objtype: &str) -> Option<&DocumenterEntry> {
        self.entries.get(objtype)
    }

    /// Registered objtypes, sorted.
    pub fn objtypes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Build the documenter registered for `objtype`, bound to `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AutodocError::MissingDocumenter`] if nothing is registered
    /// and [`AutodocError::RegistryMismatch`] if the factory rejects the
    /// keyword or builds a documenter of another objtype.
    pub fn create<'a>(
        &self,
        objtype: &str,
        document: &'a Document,
        id: KeywordId,
        options: Options,
    ) -> Result<Box<dyn Documenter + 'a>, AutodocError> {
        let entry = self
            .get(objtype)
            .ok_or_else(|| AutodocError::MissingDocumenter(objtype.to_owned()))?;
        let documenter = (entry.factory)(document, id, options)?;
        if documenter.objtype() != objtype {
            return Err(AutodocError::RegistryMismatch {
                objtype: objtype.to_owned(),
                detail: format!("factory built a '{}' documenter", documenter.objtype()),
            });
        }
        Ok(documenter)
    }
}
