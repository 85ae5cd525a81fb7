//! Name-indexed collection of Gherkin documents.
//!
//! Keywords are addressed by qualified references: the summaries of the
//! keyword's ancestry, root first, joined with [`REFERENCE_SEPARATOR`].
//! Nodes without a summary (typically Background) use their keyword label.
//!
//! ```text
//! Login::Valid users::Successful login::I am on the login page
//! Login::Background
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::document::Document;
use crate::error::StoreError;
use crate::keyword::{KeywordId, KeywordKind};

/// Separator between segments of a qualified keyword reference.
pub const REFERENCE_SEPARATOR: &str = "::";

/// Normalize a reference for lookup.
///
/// Trims every segment and collapses runs of whitespace to a single space.
///
/// # Example
///
/// ```
/// use rw_gherkin::normalize_reference;
///
/// assert_eq!(normalize_reference("  Login ::  Happy   path "), "Login::Happy path");
/// ```
#[must_use]
pub fn normalize_reference(reference: &str) -> String {
    reference
        .split(REFERENCE_SEPARATOR)
        .map(|segment| segment.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(REFERENCE_SEPARATOR)
}

/// Map a human keyword label to the objtype tag of its documenter.
///
/// Accepts the English Gherkin keywords and their synonyms, case-insensitive,
/// with or without a trailing colon. Step keywords and the generic `Step`
/// label map to `step`.
///
/// # Example
///
/// ```
/// use rw_gherkin::keyword_to_objtype;
///
/// assert_eq!(keyword_to_objtype("Scenario Outline"), Some("scenario"));
/// assert_eq!(keyword_to_objtype("Given"), Some("step"));
/// assert_eq!(keyword_to_objtype("Unknown"), None);
/// ```
#[must_use]
pub fn keyword_to_objtype(label: &str) -> Option<&'static str> {
    let normalized = label
        .trim()
        .trim_end_matches(':')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let objtype = match normalized.as_str() {
        "feature" | "business need" | "ability" => "feature",
        "rule" => "rule",
        "background" => "background",
        "scenario" | "example" | "scenario outline" | "scenario template" => "scenario",
        "examples" | "scenarios" => "examples",
        "step" | "given" | "when" | "then" | "and" | "but" | "*" => "step",
        _ => return None,
    };
    Some(objtype)
}

/// Objtype tag of the documenter handling a keyword kind.
#[must_use]
pub fn objtype_for_kind(kind: KeywordKind) -> &'static str {
    match kind {
        KeywordKind::Feature => "feature",
        KeywordKind::Rule => "rule",
        KeywordKind::Background => "background",
        KeywordKind::Scenario => "scenario",
        KeywordKind::Step => "step",
        KeywordKind::Examples => "examples",
    }
}

/// Documents keyed by source path, with a qualified-name index.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: BTreeMap<String, Document>,
    index: HashMap<String, (String, KeywordId)>,
}

impl DocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document, replacing any document with the same name.
    ///
    /// Qualified names that already point into another document keep their
    /// first registration; the collision is logged.
    pub fn insert(&mut self, document: Document) {
        let name = document.name().to_owned();
        if self.documents.contains_key(&name) {
            self.index.retain(|_, (doc, _)| *doc != name);
        }

        for id in document.ids() {
            let Some(qualified) = qualified_name(&document, id) else {
                tracing::warn!(document = %name, keyword = id.index(), "Skipping keyword with broken ancestry");
                continue;
            };
            if let Some((existing, _)) = self.index.get(&qualified) {
                tracing::warn!(
                    reference = %qualified,
                    document1 = %existing,
                    document2 = %name,
                    "Gherkin reference collision: two keywords share the same qualified name"
                );
                continue;
            }
            self.index.insert(qualified, (name.clone(), id));
        }

        self.documents.insert(name, document);
    }

    /// All documents keyed by name.
    #[must_use]
    pub fn documents(&self) -> &BTreeMap<String, Document> {
        &self.documents
    }

    /// Get a document by name (source path).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Document> {
        self.documents.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Resolve a qualified reference to its document and keyword.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no keyword has that qualified name.
    pub fn find_one(&self, reference: &str) -> Result<(&Document, KeywordId), StoreError> {
        let normalized = normalize_reference(reference);
        self.index
            .get(&normalized)
            .and_then(|(name, id)| self.documents.get(name).map(|doc| (doc, *id)))
            .ok_or(StoreError::NotFound(normalized))
    }

    /// Objtype tag of the documenter handling a keyword kind.
    #[must_use]
    pub fn objtype_for_keyword_kind(&self, kind: KeywordKind) -> &'static str {
        objtype_for_kind(kind)
    }
}

/// Qualified name of a keyword, `None` if its ancestry is broken.
fn qualified_name(document: &Document, id: KeywordId) -> Option<String> {
    let ancestry = document.get_ancestry(id).ok()?;
    let segments: Vec<&str> = ancestry
        .iter()
        .rev()
        .map(|&ancestor| document.keyword(ancestor).reference_segment())
        .collect();
    Some(normalize_reference(&segments.join(REFERENCE_SEPARATOR)))
}
