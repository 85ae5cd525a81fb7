//! Parsed Gherkin document.
//!
//! # Architecture
//!
//! Keywords are stored in a flat `Vec<Keyword>` with parent/children
//! relationships tracked by [`KeywordId`] indices. The root Feature is always
//! the first entry. This provides:
//! - O(1) keyword and children lookups
//! - O(d) ancestry where d is the keyword depth

use crate::error::StructureError;
use crate::keyword::{Feature, Keyword, KeywordId, KeywordKind};

/// One parsed feature file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    name: String,
    keywords: Vec<Keyword>,
    parents: Vec<Option<KeywordId>>,
    children: Vec<Vec<KeywordId>>,
}

impl Document {
    /// Stable document name (source path), used as dependency key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the root Feature.
    #[must_use]
    pub fn root(&self) -> KeywordId {
        KeywordId(0)
    }

    /// The root Feature.
    #[must_use]
    pub fn feature(&self) -> &Feature {
        match &self.keywords[0] {
            Keyword::Feature(feature) => feature,
            _ => unreachable!("document root is always a Feature"),
        }
    }

    /// Number of keywords in the document, Feature included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Always false: a document holds at least its Feature.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Get a keyword by id, `None` if the id belongs to another document.
    #[must_use]
    pub fn get(&self, id: KeywordId) -> Option<&Keyword> {
        self.keywords.get(id.0)
    }

    /// Get a keyword by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this document.
    #[must_use]
    pub fn keyword(&self, id: KeywordId) -> &Keyword {
        &self.keywords[id.0]
    }

    /// Direct children of a keyword, in source order.
    #[must_use]
    pub fn children(&self, id: KeywordId) -> &[KeywordId] {
        self.children.get(id.0).map_or(&[], Vec::as_slice)
    }

    /// Parent of a keyword, `None` for the Feature.
    #[must_use]
    pub fn parent(&self, id: KeywordId) -> Option<KeywordId> {
        self.parents.get(id.0).copied().flatten()
    }

    /// All keyword ids in document order.
    pub fn ids(&self) -> impl Iterator<Item = KeywordId> + '_ {
        (0..self.keywords.len()).map(KeywordId)
    }

    /// Ancestry of a keyword, from the keyword itself up to the Feature.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::UnknownKeyword`] for a foreign id and
    /// [`StructureError::Cycle`] if the parent chain loops.
    pub fn get_ancestry(&self, id: KeywordId) -> Result<Vec<KeywordId>, StructureError> {
        if self.get(id).is_none() {
            return Err(StructureError::UnknownKeyword {
                document: self.name.clone(),
                id,
            });
        }

        let mut ancestry = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            // A chain longer than the arena must have revisited a node
            if ancestry.len() >= self.keywords.len() || ancestry.contains(&parent) {
                return Err(StructureError::Cycle {
                    document: self.name.clone(),
                    id: parent,
                });
            }
            ancestry.push(parent);
            current = parent;
        }
        Ok(ancestry)
    }
}

/// Builder for constructing [`Document`] instances.
///
/// Nodes can only be appended under existing parents, so a document built
/// through the public API is always a tree rooted at its Feature.
#[derive(Debug)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Start a document with its root Feature.
    #[must_use]
    pub fn new(name: impl Into<String>, feature: Feature) -> Self {
        Self {
            document: Document {
                name: name.into(),
                keywords: vec![Keyword::Feature(feature)],
                parents: vec![None],
                children: vec![Vec::new()],
            },
        }
    }

    /// Id of the root Feature.
    #[must_use]
    pub fn root(&self) -> KeywordId {
        self.document.root()
    }

    /// Append a keyword under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::UnknownKeyword`] if `parent` does not exist
    /// and [`StructureError::InvalidChild`] if the parent kind cannot contain
    /// the keyword (a Feature is never accepted as a child).
    pub fn add(&mut self, parent: KeywordId, keyword: Keyword) -> Result<KeywordId, StructureError> {
        let parent_kind = self
            .document
            .get(parent)
            .map(Keyword::kind)
            .ok_or_else(|| StructureError::UnknownKeyword {
                document: self.document.name.clone(),
                id: parent,
            })?;
        let child_kind = keyword.kind();
        if !parent_kind.accepts(child_kind) {
            return Err(StructureError::InvalidChild {
                parent: parent_kind,
                child: child_kind,
            });
        }

        let id = KeywordId(self.document.keywords.len());
        self.document.keywords.push(keyword);
        self.document.parents.push(Some(parent));
        self.document.children.push(Vec::new());
        self.document.children[parent.0].push(id);
        Ok(id)
    }

    /// Kind of an already added keyword.
    #[must_use]
    pub fn kind(&self, id: KeywordId) -> Option<KeywordKind> {
        self.document.get(id).map(Keyword::kind)
    }

    /// List an existing node among the children of another one, leaving its
    /// parent untouched.
    ///
    /// Only meant for tests that need malformed (cyclic) structures.
    #[cfg(feature = "mock")]
    pub fn link_unchecked(&mut self, parent: KeywordId, child: KeywordId) {
        self.document.children[parent.0].push(child);
    }

    /// Overwrite the parent of an existing node without any checks.
    #[cfg(feature = "mock")]
    pub fn reparent_unchecked(&mut self, child: KeywordId, parent: KeywordId) {
        self.document.parents[child.0] = Some(parent);
    }

    /// Finish the document.
    #[must_use]
    pub fn build(self) -> Document {
        self.document
    }
}
