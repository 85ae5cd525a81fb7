//! Documented-keyword scope.
//!
//! While a keyword is generated, the `(label, summary)` trail from the
//! Feature down to that keyword is published alongside the lines it covers,
//! so nested content can be resolved relative to it.

use std::fmt;
use std::ops::Range;

use rw_gherkin::{Document, KeywordId, StructureError};

/// Root-to-leaf `(label, summary)` snapshot of a keyword's ancestry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentedKeyword {
    entries: Vec<(String, String)>,
}

impl DocumentedKeyword {
    #[must_use]
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    /// Snapshot the ancestry of `id`, Feature first.
    ///
    /// # Errors
    ///
    /// Propagates [`StructureError`] from a malformed ancestry.
    pub fn from_ancestry(document: &Document, id: KeywordId) -> Result<Self, StructureError> {
        let entries = document
            .get_ancestry(id)?
            .into_iter()
            .rev()
            .map(|ancestor| {
                let keyword = document.keyword(ancestor);
                (keyword.label().to_owned(), keyword.summary().to_owned())
            })
            .collect();
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// The documented keyword itself (last entry).
    #[must_use]
    pub fn current(&self) -> Option<(&str, &str)> {
        self.entries
            .last()
            .map(|(label, summary)| (label.as_str(), summary.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for DocumentedKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (label, summary)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" / ")?;
            }
            write!(f, "{label}: {summary}")?;
        }
        Ok(())
    }
}

/// Scope published for a range of generated lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopedRange {
    pub scope: DocumentedKeyword,
    /// Indices into the generated lines (content and children).
    pub lines: Range<usize>,
}

impl ScopedRange {
    /// Shift the range by `offset` lines.
    #[must_use]
    pub(crate) fn shifted(self, offset: usize) -> Self {
        Self {
            scope: self.scope,
            lines: self.lines.start + offset..self.lines.end + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rw_gherkin::{DocumentBuilder, Feature, Keyword, Rule, Scenario, Step};

    #[test]
    fn test_ancestry_root_first() {
        let mut builder = DocumentBuilder::new("login.feature", Feature::new("Feature", "Login"));
        let rule = builder
            .add(builder.root(), Keyword::Rule(Rule::new("Rule", "Valid users")))
            .unwrap();
        let scenario = builder
            .add(rule, Keyword::Scenario(Scenario::new("Scenario", "Success")))
            .unwrap();
        let step = builder
            .add(scenario, Keyword::Step(Step::new("Given", "a user")))
            .unwrap();
        let document = builder.build();

        let scope = DocumentedKeyword::from_ancestry(&document, step).unwrap();
        let labels: Vec<&str> = scope.entries().iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Feature", "Rule", "Scenario", "Given"]);
        assert_eq!(scope.current(), Some(("Given", "a user")));
        assert_eq!(scope.len(), 4);
        assert_eq!(
            scope.to_string(),
            "Feature: Login / Rule: Valid users / Scenario: Success / Given: a user"
        );
    }

    #[test]
    fn test_shifted_range() {
        let range = ScopedRange {
            scope: DocumentedKeyword::default(),
            lines: 2..5,
        };
        assert_eq!(range.shifted(10).lines, 12..15);
    }
}
