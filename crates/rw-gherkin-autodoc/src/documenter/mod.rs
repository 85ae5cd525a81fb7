//! Documenters: per-keyword markup generators.
//!
//! A [`Documenter`] describes how one keyword kind is rendered: its directive
//! name, option lines, content and children. The shared recursive algorithm
//! lives in [`Generator`], which emits for every keyword:
//!
//! ```text
//! .. gherkin:scenario:: Successful login
//!
//!     <content>
//!     <directive body>
//!
//!     .. gherkin:given:: I am on the login page
//!     ...
//! ```
//!
//! Children are dispatched through the [`DocumenterRegistry`] by the objtype
//! of their runtime kind, so a replaced registration also applies to nested
//! keywords.

mod variants;

use std::collections::BTreeSet;

use rw_gherkin::{Document, DocumentStore, Keyword, KeywordId};
use rw_gherkin_config::GherkinConfig;

use crate::error::AutodocError;
use crate::lines::{Emitter, MarkupLines};
use crate::options::Options;
use crate::registry::DocumenterRegistry;
use crate::scope::{DocumentedKeyword, ScopedRange};

pub use variants::{
    BackgroundDocumenter, ExamplesDocumenter, FeatureDocumenter, RuleDocumenter,
    ScenarioDocumenter, StepDocumenter, background_documenter, examples_documenter,
    feature_documenter, rule_documenter, scenario_documenter, step_documenter,
};

/// Keyword a documenter is bound to.
#[derive(Clone, Copy, Debug)]
pub struct Target<'a> {
    pub document: &'a Document,
    pub id: KeywordId,
}

impl<'a> Target<'a> {
    #[must_use]
    pub fn new(document: &'a Document, id: KeywordId) -> Self {
        Self { document, id }
    }

    #[must_use]
    pub fn keyword(&self) -> &'a Keyword {
        self.document.keyword(self.id)
    }
}

/// Generator for one keyword kind.
pub trait Documenter {
    /// Objtype tag this documenter is registered under.
    fn objtype(&self) -> &'static str;

    /// Whether children returned by [`child_keywords`](Self::child_keywords)
    /// are generated.
    fn allow_nesting(&self) -> bool {
        false
    }

    /// Bound document and keyword.
    fn target(&self) -> Target<'_>;

    /// Options shared with nested documenters.
    fn options(&self) -> &Options;

    /// Directive name used in the header line.
    fn directive_name(&self) -> String {
        self.objtype().to_owned()
    }

    /// `(name, value)` option lines emitted below the header.
    fn format_options(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Children to generate, in output order.
    fn child_keywords(&self) -> Vec<KeywordId> {
        Vec::new()
    }

    /// Emit keyword-specific content at the content indentation.
    fn add_content(&self, _out: &mut Emitter<'_>) {}
}

/// Output of one generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Generated {
    pub lines: MarkupLines,
    /// Document names the output was generated from.
    pub dependencies: BTreeSet<String>,
    /// Scope of every generated keyword, in pre-order.
    pub scopes: Vec<ScopedRange>,
}

impl Generated {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Runs the recursive generation algorithm.
#[derive(Debug)]
pub struct Generator<'a> {
    registry: &'a DocumenterRegistry,
    store: &'a DocumentStore,
    domain: &'a str,
    unit: String,
}

impl<'a> Generator<'a> {
    #[must_use]
    pub fn new(
        registry: &'a DocumenterRegistry,
        store: &'a DocumentStore,
        config: &'a GherkinConfig,
    ) -> Self {
        Self {
            registry,
            store,
            domain: &config.domain,
            unit: config.content_indent_unit(),
        }
    }

    /// Generate markup for `documenter` and all its descendants.
    ///
    /// `more_content` (the directive body) is appended after the keyword's own
    /// content, keeping its source attribution.
    ///
    /// # Errors
    ///
    /// All errors are fatal: a child kind without documenter, a documenter
    /// that rejects its keyword, or a keyword tree that contains itself.
    pub fn generate(
        &self,
        documenter: &dyn Documenter,
        more_content: Option<&MarkupLines>,
    ) -> Result<Generated, AutodocError> {
        let mut path = Vec::new();
        self.generate_at(documenter, "", more_content, &mut path)
    }

    fn generate_at(
        &self,
        documenter: &dyn Documenter,
        indent: &str,
        more_content: Option<&MarkupLines>,
        path: &mut Vec<KeywordId>,
    ) -> Result<Generated, AutodocError> {
        let target = documenter.target();
        let document = target.document;
        if path.contains(&target.id) {
            return Err(AutodocError::CyclicTree {
                document: document.name().to_owned(),
                keyword: target.id.index(),
            });
        }
        path.push(target.id);

        let keyword = target.keyword();
        let mut dependencies = BTreeSet::from([document.name().to_owned()]);
        let mut out = Emitter::new(indent, &self.unit, document.name()).with_line(keyword.line());

        out.add_line(&format!(
            ".. {}:{}:: {}",
            self.domain,
            documenter.directive_name(),
            keyword.summary()
        ));
        for (name, value) in documenter.format_options() {
            out.add_line(&format!("{}:{name}: {value}", self.unit));
        }
        out.add_line("");
        out.indent();

        let scope = DocumentedKeyword::from_ancestry(document, target.id)?;
        let scope_start = out.len();

        documenter.add_content(&mut out);
        if let Some(more_content) = more_content {
            for line in more_content {
                out.add_line_from(&line.text, &line.source, line.line);
            }
        }
        out.add_line("");

        let mut nested = Vec::new();
        if documenter.allow_nesting() {
            for child in documenter.child_keywords() {
                let objtype = self
                    .store
                    .objtype_for_keyword_kind(document.keyword(child).kind());
                let child_documenter =
                    self.registry
                        .create(objtype, document, child, documenter.options().clone())?;
                let generated =
                    self.generate_at(child_documenter.as_ref(), out.current_indent(), None, path)?;

                let offset = out.len();
                nested.extend(generated.scopes.into_iter().map(|s| s.shifted(offset)));
                dependencies.extend(generated.dependencies);
                out.append(generated.lines);
            }
        }
        path.pop();

        let mut scopes = vec![ScopedRange {
            scope,
            lines: scope_start..out.len(),
        }];
        scopes.extend(nested);

        Ok(Generated {
            lines: out.finish(),
            dependencies,
            scopes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rw_gherkin::{
        Background, DataTable, Docstring, DocumentBuilder, Examples, Feature, Rule, Scenario,
        Step,
    };

    fn login_document() -> Document {
        let mut builder = DocumentBuilder::new(
            "features/login.feature",
            Feature::new("Feature", "Login")
                .with_description("  As a user\n  I want to log in")
                .with_line(1),
        );
        let root = builder.root();
        let background = builder
            .add(root, Keyword::Background(Background::new("Background", "")))
            .unwrap();
        builder
            .add(background, Keyword::Step(Step::new("Given", "a registered user")))
            .unwrap();
        let rule = builder
            .add(root, Keyword::Rule(Rule::new("Rule", "Valid users")))
            .unwrap();
        let outline = builder
            .add(
                rule,
                Keyword::Scenario(Scenario::new("Scenario Outline", "Login as <role>")),
            )
            .unwrap();
        builder
            .add(
                outline,
                Keyword::Examples(Examples::new("Examples", "").with_datatable(DataTable::new(
                    vec![vec!["role".to_owned()], vec!["admin".to_owned()]],
                ))),
            )
            .unwrap();
        builder
            .add(
                outline,
                Keyword::Step(
                    Step::new("When", "I log in").with_docstring(Docstring::new(
                        Some("json"),
                        "{\"role\": \"<role>\"}",
                    )),
                ),
            )
            .unwrap();
        builder.build()
    }

    fn run(document: &Document, id: KeywordId, more: Option<&MarkupLines>) -> Generated {
        let registry = DocumenterRegistry::with_defaults();
        let store = DocumentStore::new();
        let config = GherkinConfig::default();
        let generator = Generator::new(&registry, &store, &config);
        let objtype = store.objtype_for_keyword_kind(document.keyword(id).kind());
        let documenter = registry
            .create(objtype, document, id, Options::default())
            .unwrap();
        generator.generate(documenter.as_ref(), more).unwrap()
    }

    #[test]
    fn test_feature_full_tree() {
        let document = login_document();
        let generated = run(&document, document.root(), None);

        assert_eq!(
            generated.lines.texts(),
            vec![
                ".. gherkin:feature:: Login",
                "",
                "    As a user",
                "    I want to log in",
                "",
                "    .. gherkin:background:: ",
                "",
                "",
                "        .. gherkin:given:: a registered user",
                "",
                "",
                "    .. gherkin:rule:: Valid users",
                "",
                "",
                "        .. gherkin:scenario:: Login as <role>",
                "",
                "",
                "            .. gherkin:when:: I log in",
                "",
                "                .. code-block:: json",
                "",
                "                    {\"role\": \"<role>\"}",
                "",
                "",
                "            .. gherkin:examples:: ",
                "",
                "                .. list-table::",
                "",
                "                    * - role",
                "                    * - admin",
                "",
                "",
            ]
        );
        assert_eq!(
            generated.dependencies,
            BTreeSet::from(["features/login.feature".to_owned()])
        );
    }

    #[test]
    fn test_header_once_before_content() {
        let document = login_document();
        let generated = run(&document, document.root(), None);
        let texts = generated.lines.texts();
        let headers = texts
            .iter()
            .filter(|line| line.contains(".. gherkin:feature::"))
            .count();
        assert_eq!(headers, 1);
        assert_eq!(texts[0], ".. gherkin:feature:: Login");
    }

    #[test]
    fn test_child_indent_is_parent_plus_unit() {
        let document = login_document();
        let generated = run(&document, document.root(), None);
        let indent_of = |needle: &str| {
            let line = generated
                .lines
                .iter()
                .find(|l| l.text.contains(needle))
                .unwrap();
            line.text.len() - line.text.trim_start().len()
        };
        assert_eq!(indent_of("gherkin:feature::"), 0);
        assert_eq!(indent_of("gherkin:rule::"), 4);
        assert_eq!(indent_of("gherkin:scenario::"), 8);
        assert_eq!(indent_of("gherkin:when::"), 12);
    }

    #[test]
    fn test_more_content_after_content_with_attribution() {
        let document = login_document();
        let body = MarkupLines::from_text("guide.rst", 20, "Extra notes.");
        let generated = run(&document, document.root(), Some(&body));
        let extra = generated
            .lines
            .iter()
            .position(|l| l.text == "    Extra notes.")
            .unwrap();
        let description = generated
            .lines
            .iter()
            .position(|l| l.text == "    I want to log in")
            .unwrap();
        assert!(description < extra);

        let line = generated.lines.iter().nth(extra).unwrap();
        assert_eq!((line.source.as_str(), line.line), ("guide.rst", Some(20)));
        let header = generated.lines.iter().next().unwrap();
        assert_eq!(
            (header.source.as_str(), header.line),
            ("features/login.feature", Some(1))
        );
    }

    #[test]
    fn test_step_extras_precede_body() {
        let mut builder =
            DocumentBuilder::new("features/users.feature", Feature::new("Feature", "Users"));
        let scenario = builder
            .add(builder.root(), Keyword::Scenario(Scenario::new("Scenario", "Listing")))
            .unwrap();
        let step = builder
            .add(
                scenario,
                Keyword::Step(
                    Step::new("Given ", "users")
                        .with_line(5)
                        .with_docstring(Docstring::new(Some("json"), "[\"ann\"]"))
                        .with_datatable(DataTable::new(vec![vec![
                            "name".to_owned(),
                            "role".to_owned(),
                        ]])),
                ),
            )
            .unwrap();
        let document = builder.build();
        let body = MarkupLines::from_text("guide.rst", 30, "Body line.");

        let generated = run(&document, step, Some(&body));
        assert_eq!(
            generated.lines.texts(),
            vec![
                ".. gherkin:given:: users",
                "",
                "    .. code-block:: json",
                "",
                "        [\"ann\"]",
                "",
                "    .. list-table::",
                "",
                "        * - name",
                "          - role",
                "",
                "    Body line.",
                "",
            ]
        );

        let attribution: Vec<(&str, Option<usize>)> = generated
            .lines
            .iter()
            .map(|l| (l.source.as_str(), l.line))
            .collect();
        assert_eq!(attribution[11], ("guide.rst", Some(30)));
        assert!(
            attribution[..11]
                .iter()
                .all(|a| *a == ("features/users.feature", Some(5)))
        );
        assert_eq!(attribution[12], ("features/users.feature", Some(5)));
    }

    #[test]
    fn test_scopes_pre_order_root_first() {
        let document = login_document();
        let generated = run(&document, document.root(), None);

        let currents: Vec<(String, String)> = generated
            .scopes
            .iter()
            .map(|s| {
                let (label, summary) = s.scope.current().unwrap();
                (label.to_owned(), summary.to_owned())
            })
            .collect();
        assert_eq!(
            currents,
            vec![
                ("Feature".to_owned(), "Login".to_owned()),
                ("Background".to_owned(), String::new()),
                ("Given".to_owned(), "a registered user".to_owned()),
                ("Rule".to_owned(), "Valid users".to_owned()),
                ("Scenario Outline".to_owned(), "Login as <role>".to_owned()),
                ("When".to_owned(), "I log in".to_owned()),
                ("Examples".to_owned(), String::new()),
            ]
        );

        let root = &generated.scopes[0];
        assert_eq!(root.lines, 2..generated.lines.len());

        let when = &generated.scopes[5];
        let texts = generated.lines.texts();
        assert_eq!(texts[when.lines.start], "                .. code-block:: json");
        assert_eq!(texts[when.lines.start - 2], "            .. gherkin:when:: I log in");
        assert_eq!(
            when.scope.entries().first().map(|(l, _)| l.as_str()),
            Some("Feature")
        );
    }

    #[test]
    fn test_cyclic_tree_is_fatal() {
        let mut builder = DocumentBuilder::new("loop.feature", Feature::new("Feature", "Loop"));
        let rule = builder
            .add(builder.root(), Keyword::Rule(Rule::new("Rule", "R")))
            .unwrap();
        builder.link_unchecked(rule, builder.root());
        let document = builder.build();

        let registry = DocumenterRegistry::with_defaults();
        let store = DocumentStore::new();
        let config = GherkinConfig::default();
        let generator = Generator::new(&registry, &store, &config);
        let documenter = registry
            .create("feature", &document, document.root(), Options::default())
            .unwrap();

        let err = generator.generate(documenter.as_ref(), None).unwrap_err();
        assert!(matches!(err, AutodocError::CyclicTree { keyword: 0, .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_missing_child_documenter_is_fatal() {
        let document = login_document();
        let mut registry = DocumenterRegistry::with_defaults();
        registry.unregister("step");
        let store = DocumentStore::new();
        let config = GherkinConfig::default();
        let generator = Generator::new(&registry, &store, &config);
        let documenter = registry
            .create("feature", &document, document.root(), Options::default())
            .unwrap();

        let err = generator.generate(documenter.as_ref(), None).unwrap_err();
        assert!(matches!(err, AutodocError::MissingDocumenter(ref objtype) if objtype == "step"));
        assert!(!err.is_recoverable());
    }
}
