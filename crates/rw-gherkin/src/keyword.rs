//! Keyword node types.
//!
//! A [`Keyword`] is one parsed Gherkin construct. Variant payloads carry only
//! their own data; parent/children relationships live in the owning
//! [`Document`](crate::Document).

use std::fmt;

/// Index of a keyword inside its owning document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeywordId(pub(crate) usize);

impl KeywordId {
    /// Position of the keyword in document order.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Closed set of keyword kinds that can appear in the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeywordKind {
    Feature,
    Rule,
    Background,
    Scenario,
    Step,
    Examples,
}

impl KeywordKind {
    /// Kinds allowed as direct children of this kind.
    #[must_use]
    pub fn allowed_children(self) -> &'static [KeywordKind] {
        match self {
            Self::Feature => &[Self::Rule, Self::Background, Self::Scenario],
            Self::Rule => &[Self::Background, Self::Scenario],
            Self::Background => &[Self::Step],
            Self::Scenario => &[Self::Step, Self::Examples],
            Self::Step | Self::Examples => &[],
        }
    }

    /// Whether `child` may be nested directly under this kind.
    #[must_use]
    pub fn accepts(self, child: KeywordKind) -> bool {
        self.allowed_children().contains(&child)
    }
}

impl fmt::Display for KeywordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Feature => "Feature",
            Self::Rule => "Rule",
            Self::Background => "Background",
            Self::Scenario => "Scenario",
            Self::Step => "Step",
            Self::Examples => "Examples",
        };
        f.write_str(name)
    }
}

/// Tabular data attached to a Step or an Examples block.
///
/// Rows are expected to have the same number of cells; this is the parser's
/// responsibility and is not checked here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataTable {
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    #[must_use]
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Docstring attached to a Step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Docstring {
    /// Language tag used for code-block rendering (e.g. `json`).
    pub mediatype: Option<String>,
    /// Raw multi-line content.
    pub content: String,
}

impl Docstring {
    #[must_use]
    pub fn new(mediatype: Option<&str>, content: impl Into<String>) -> Self {
        Self {
            mediatype: mediatype.map(str::to_owned),
            content: content.into(),
        }
    }
}

macro_rules! titled_keyword {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name {
            /// Literal keyword label (e.g. `Scenario Outline`).
            pub keyword: String,
            /// Title text following the keyword.
            pub name: String,
            /// Free-text description below the title.
            pub description: Option<String>,
            /// 1-based source line of the keyword.
            pub line: Option<usize>,
        }

        impl $name {
            #[must_use]
            pub fn new(keyword: impl Into<String>, name: impl Into<String>) -> Self {
                Self {
                    keyword: keyword.into(),
                    name: name.into(),
                    description: None,
                    line: None,
                }
            }

            #[must_use]
            pub fn with_description(mut self, description: impl Into<String>) -> Self {
                self.description = Some(description.into());
                self
            }

            #[must_use]
            pub fn with_line(mut self, line: usize) -> Self {
                self.line = Some(line);
                self
            }
        }
    };
}

titled_keyword!(
    /// Root keyword of a feature file.
    Feature
);
titled_keyword!(
    /// Business rule grouping scenarios.
    Rule
);
titled_keyword!(
    /// Steps shared by every scenario of a feature or rule.
    Background
);
titled_keyword!(
    /// Scenario or Scenario Outline.
    Scenario
);

/// A single Given/When/Then step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    /// Step keyword without trailing whitespace (`Given`, `And`, `*`).
    pub keyword: String,
    pub text: String,
    pub docstring: Option<Docstring>,
    pub datatable: Option<DataTable>,
    pub line: Option<usize>,
}

impl Step {
    #[must_use]
    pub fn new(keyword: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            text: text.into(),
            docstring: None,
            datatable: None,
            line: None,
        }
    }

    #[must_use]
    pub fn with_docstring(mut self, docstring: Docstring) -> Self {
        self.docstring = Some(docstring);
        self
    }

    #[must_use]
    pub fn with_datatable(mut self, datatable: DataTable) -> Self {
        self.datatable = Some(datatable);
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// Examples block of a Scenario Outline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Examples {
    pub keyword: String,
    pub name: String,
    pub description: Option<String>,
    /// Header row followed by the body rows. Empty when the block has no table.
    pub datatable: DataTable,
    pub line: Option<usize>,
}

impl Examples {
    #[must_use]
    pub fn new(keyword: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            name: name.into(),
            description: None,
            datatable: DataTable::default(),
            line: None,
        }
    }

    #[must_use]
    pub fn with_datatable(mut self, datatable: DataTable) -> Self {
        self.datatable = datatable;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

/// One node of the keyword tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Keyword {
    Feature(Feature),
    Rule(Rule),
    Background(Background),
    Scenario(Scenario),
    Step(Step),
    Examples(Examples),
}

impl Keyword {
    #[must_use]
    pub fn kind(&self) -> KeywordKind {
        match self {
            Self::Feature(_) => KeywordKind::Feature,
            Self::Rule(_) => KeywordKind::Rule,
            Self::Background(_) => KeywordKind::Background,
            Self::Scenario(_) => KeywordKind::Scenario,
            Self::Step(_) => KeywordKind::Step,
            Self::Examples(_) => KeywordKind::Examples,
        }
    }

    /// Literal keyword label as written in the source.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Feature(k) => &k.keyword,
            Self::Rule(k) => &k.keyword,
            Self::Background(k) => &k.keyword,
            Self::Scenario(k) => &k.keyword,
            Self::Step(k) => &k.keyword,
            Self::Examples(k) => &k.keyword,
        }
    }

    /// Short title: the name, or the text for steps.
    #[must_use]
    pub fn summary(&self) -> &str {
        match self {
            Self::Feature(k) => &k.name,
            Self::Rule(k) => &k.name,
            Self::Background(k) => &k.name,
            Self::Scenario(k) => &k.name,
            Self::Step(k) => &k.text,
            Self::Examples(k) => &k.name,
        }
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Feature(k) => k.description.as_deref(),
            Self::Rule(k) => k.description.as_deref(),
            Self::Background(k) => k.description.as_deref(),
            Self::Scenario(k) => k.description.as_deref(),
            Self::Examples(k) => k.description.as_deref(),
            Self::Step(_) => None,
        }
    }

    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Feature(k) => k.line,
            Self::Rule(k) => k.line,
            Self::Background(k) => k.line,
            Self::Scenario(k) => k.line,
            Self::Step(k) => k.line,
            Self::Examples(k) => k.line,
        }
    }

    /// Segment used for this node in qualified references.
    ///
    /// Falls back to the keyword label when the summary is empty, which is
    /// common for Background and unnamed Examples blocks.
    #[must_use]
    pub fn reference_segment(&self) -> &str {
        let summary = self.summary().trim();
        if summary.is_empty() {
            self.label().trim()
        } else {
            summary
        }
    }
}
