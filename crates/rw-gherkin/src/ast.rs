//! Loading of parsed Gherkin ASTs.
//!
//! Gherkin parsers emit a `gherkinDocument` JSON object (camelCase keys).
//! Feature files are expected to have their AST stored next to them as a
//! `.feature.json` sidecar, either bare or wrapped in a
//! `{"gherkinDocument": ...}` envelope.

use std::path::Path;

use serde::Deserialize;

use crate::document::{Document, DocumentBuilder};
use crate::error::LoadError;
use crate::keyword::{
    Background, DataTable, Docstring, Examples, Feature, Keyword, KeywordId, Rule, Scenario, Step,
};
use crate::store::DocumentStore;

/// Sidecar suffix appended to the feature file name.
const SIDECAR_SUFFIX: &str = ".json";

#[derive(Deserialize)]
#[serde(untagged)]
enum AstFile {
    Envelope {
        #[serde(rename = "gherkinDocument")]
        gherkin_document: GherkinDocumentAst,
    },
    Bare(GherkinDocumentAst),
}

#[derive(Deserialize)]
struct GherkinDocumentAst {
    feature: Option<FeatureAst>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Location {
    line: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeatureAst {
    #[serde(default)]
    location: Location,
    keyword: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    children: Vec<ChildAst>,
}

/// Child of a Feature or a Rule; exactly one field is set.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ChildAst {
    rule: Option<RuleAst>,
    background: Option<BackgroundAst>,
    scenario: Option<ScenarioAst>,
}

#[derive(Deserialize)]
struct RuleAst {
    #[serde(default)]
    location: Location,
    keyword: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    children: Vec<ChildAst>,
}

#[derive(Deserialize)]
struct BackgroundAst {
    #[serde(default)]
    location: Location,
    keyword: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    steps: Vec<StepAst>,
}

#[derive(Deserialize)]
struct ScenarioAst {
    #[serde(default)]
    location: Location,
    keyword: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    steps: Vec<StepAst>,
    #[serde(default)]
    examples: Vec<ExamplesAst>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepAst {
    #[serde(default)]
    location: Location,
    keyword: String,
    text: String,
    doc_string: Option<DocStringAst>,
    data_table: Option<DataTableAst>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocStringAst {
    media_type: Option<String>,
    content: String,
}

#[derive(Deserialize)]
struct DataTableAst {
    #[serde(default)]
    rows: Vec<RowAst>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExamplesAst {
    #[serde(default)]
    location: Location,
    keyword: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    table_header: Option<RowAst>,
    #[serde(default)]
    table_body: Vec<RowAst>,
}

#[derive(Deserialize)]
struct RowAst {
    #[serde(default)]
    cells: Vec<CellAst>,
}

#[derive(Deserialize)]
struct CellAst {
    value: String,
}

impl RowAst {
    fn into_cells(self) -> Vec<String> {
        self.cells.into_iter().map(|cell| cell.value).collect()
    }
}

/// Empty descriptions are dropped.
fn description(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

impl Document {
    /// Build a document from a Gherkin AST in JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] for malformed JSON, [`LoadError::MissingFeature`]
    /// when the AST has no feature, and [`LoadError::Structure`] if keywords are
    /// nested in a way Gherkin does not allow.
    ///
    /// # Example
    ///
    /// ```
    /// use rw_gherkin::Document;
    ///
    /// let json = r#"{"feature": {"keyword": "Feature", "name": "Login", "children": []}}"#;
    /// let document = Document::from_ast_json("login.feature", json).unwrap();
    /// assert_eq!(document.feature().name, "Login");
    /// ```
    pub fn from_ast_json(name: &str, json: &str) -> Result<Self, LoadError> {
        let file: AstFile = serde_json::from_str(json).map_err(|source| LoadError::Json {
            name: name.to_owned(),
            source,
        })?;
        let ast = match file {
            AstFile::Envelope { gherkin_document } | AstFile::Bare(gherkin_document) => {
                gherkin_document
            }
        };
        let feature = ast
            .feature
            .ok_or_else(|| LoadError::MissingFeature(name.to_owned()))?;

        let mut root = Feature::new(feature.keyword.trim(), feature.name);
        root.description = description(feature.description);
        root.line = feature.location.line;

        let mut builder = DocumentBuilder::new(name, root);
        let parent = builder.root();
        add_children(&mut builder, parent, feature.children)?;
        Ok(builder.build())
    }
}

fn add_children(
    builder: &mut DocumentBuilder,
    parent: KeywordId,
    children: Vec<ChildAst>,
) -> Result<(), LoadError> {
    for child in children {
        if let Some(rule) = child.rule {
            let mut keyword = Rule::new(rule.keyword.trim(), rule.name);
            keyword.description = description(rule.description);
            keyword.line = rule.location.line;
            let id = builder.add(parent, Keyword::Rule(keyword))?;
            add_children(builder, id, rule.children)?;
        }
        if let Some(background) = child.background {
            let mut keyword = Background::new(background.keyword.trim(), background.name);
            keyword.description = description(background.description);
            keyword.line = background.location.line;
            let id = builder.add(parent, Keyword::Background(keyword))?;
            add_steps(builder, id, background.steps)?;
        }
        if let Some(scenario) = child.scenario {
            let mut keyword = Scenario::new(scenario.keyword.trim(), scenario.name);
            keyword.description = description(scenario.description);
            keyword.line = scenario.location.line;
            let id = builder.add(parent, Keyword::Scenario(keyword))?;
            add_steps(builder, id, scenario.steps)?;
            for examples in scenario.examples {
                add_examples(builder, id, examples)?;
            }
        }
    }
    Ok(())
}

fn add_steps(
    builder: &mut DocumentBuilder,
    parent: KeywordId,
    steps: Vec<StepAst>,
) -> Result<(), LoadError> {
    for step in steps {
        let mut keyword = Step::new(step.keyword.trim(), step.text);
        keyword.line = step.location.line;
        keyword.docstring = step.doc_string.map(|doc| Docstring {
            mediatype: doc.media_type.filter(|m| !m.is_empty()),
            content: doc.content,
        });
        keyword.datatable = step
            .data_table
            .map(|table| DataTable::new(table.rows.into_iter().map(RowAst::into_cells).collect()));
        builder.add(parent, Keyword::Step(keyword))?;
    }
    Ok(())
}

fn add_examples(
    builder: &mut DocumentBuilder,
    parent: KeywordId,
    examples: ExamplesAst,
) -> Result<(), LoadError> {
    let rows = examples
        .table_header
        .into_iter()
        .chain(examples.table_body)
        .map(RowAst::into_cells)
        .collect();

    let mut keyword =
        Examples::new(examples.keyword.trim(), examples.name).with_datatable(DataTable::new(rows));
    keyword.description = description(examples.description);
    keyword.line = examples.location.line;
    builder.add(parent, Keyword::Examples(keyword))?;
    Ok(())
}

impl DocumentStore {
    /// Load every `*.feature.json` AST sidecar under `root`.
    ///
    /// Each document is registered under the path of its feature file (the
    /// sidecar path without `.json`). Sidecars that fail to load are logged
    /// and skipped. Returns the number of documents loaded.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Pattern`] if `root` cannot be turned into a glob pattern.
    pub fn load_dir(&mut self, root: &Path) -> Result<usize, LoadError> {
        let pattern = format!(
            "{}/**/*.feature{SIDECAR_SUFFIX}",
            glob::Pattern::escape(&root.to_string_lossy())
        );

        let mut loaded = 0;
        for entry in glob::glob(&pattern)? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to scan Gherkin sources");
                    continue;
                }
            };
            match load_sidecar(&path) {
                Ok(document) => {
                    self.insert(document);
                    loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to load Gherkin AST");
                }
            }
        }

        tracing::info!(root = %root.display(), documents = loaded, "Loaded Gherkin documents");
        Ok(loaded)
    }
}

fn load_sidecar(path: &Path) -> Result<Document, LoadError> {
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let sidecar = path.to_string_lossy();
    let name = sidecar.strip_suffix(SIDECAR_SUFFIX).unwrap_or(&sidecar);
    Document::from_ast_json(name, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyword::KeywordKind;
    use pretty_assertions::assert_eq;

    const LOGIN_AST: &str = r#"{
        "gherkinDocument": {
            "uri": "login.feature",
            "feature": {
                "location": {"line": 1, "column": 1},
                "tags": [],
                "language": "en",
                "keyword": "Feature",
                "name": "Login",
                "description": "  As a user\n  I want to log in",
                "children": [
                    {"background": {
                        "location": {"line": 5, "column": 3},
                        "keyword": "Background",
                        "name": "",
                        "description": "",
                        "steps": [
                            {"location": {"line": 6, "column": 5}, "keyword": "Given ", "text": "a registered user"}
                        ]
                    }},
                    {"rule": {
                        "location": {"line": 8, "column": 3},
                        "keyword": "Rule",
                        "name": "Valid credentials",
                        "description": "",
                        "children": [
                            {"scenario": {
                                "location": {"line": 9, "column": 5},
                                "keyword": "Scenario Outline",
                                "name": "Successful login",
                                "description": "",
                                "steps": [
                                    {
                                        "location": {"line": 10, "column": 7},
                                        "keyword": "When ",
                                        "text": "I submit",
                                        "docString": {"mediaType": "json", "content": "{\"user\": \"<user>\"}", "delimiter": "\"\"\""}
                                    },
                                    {
                                        "location": {"line": 14, "column": 7},
                                        "keyword": "Then ",
                                        "text": "I see",
                                        "dataTable": {"rows": [
                                            {"cells": [{"value": "page"}, {"value": "title"}]},
                                            {"cells": [{"value": "home"}, {"value": "Welcome"}]}
                                        ]}
                                    }
                                ],
                                "examples": [{
                                    "location": {"line": 17, "column": 7},
                                    "keyword": "Examples",
                                    "name": "",
                                    "description": "",
                                    "tableHeader": {"cells": [{"value": "user"}]},
                                    "tableBody": [{"cells": [{"value": "alice"}]}, {"cells": [{"value": "bob"}]}]
                                }]
                            }}
                        ]
                    }}
                ]
            },
            "comments": []
        }
    }"#;

    #[test]
    fn test_load_envelope() {
        let document = Document::from_ast_json("login.feature", LOGIN_AST).unwrap();
        assert_eq!(document.feature().name, "Login");
        assert_eq!(
            document.feature().description.as_deref(),
            Some("  As a user\n  I want to log in")
        );
        assert_eq!(document.feature().line, Some(1));

        let kinds: Vec<KeywordKind> = document
            .ids()
            .map(|id| document.keyword(id).kind())
            .collect();
        assert_eq!(
            kinds,
            vec![
                KeywordKind::Feature,
                KeywordKind::Background,
                KeywordKind::Step,
                KeywordKind::Rule,
                KeywordKind::Scenario,
                KeywordKind::Step,
                KeywordKind::Step,
                KeywordKind::Examples,
            ]
        );
    }

    #[test]
    fn test_step_keyword_trimmed_and_payloads() {
        let document = Document::from_ast_json("login.feature", LOGIN_AST).unwrap();
        let steps: Vec<&Step> = document
            .ids()
            .filter_map(|id| match document.keyword(id) {
                Keyword::Step(step) => Some(step),
                _ => None,
            })
            .collect();

        assert_eq!(steps[0].keyword, "Given");
        assert_eq!(steps[1].docstring, Some(Docstring::new(Some("json"), r#"{"user": "<user>"}"#)));
        assert_eq!(
            steps[2].datatable,
            Some(DataTable::new(vec![
                vec!["page".to_owned(), "title".to_owned()],
                vec!["home".to_owned(), "Welcome".to_owned()],
            ]))
        );
        assert_eq!(steps[2].line, Some(14));
    }

    #[test]
    fn test_examples_header_and_body() {
        let document = Document::from_ast_json("login.feature", LOGIN_AST).unwrap();
        let examples = document
            .ids()
            .find_map(|id| match document.keyword(id) {
                Keyword::Examples(examples) => Some(examples),
                _ => None,
            })
            .unwrap();
        assert_eq!(
            examples.datatable.rows,
            vec![
                vec!["user".to_owned()],
                vec!["alice".to_owned()],
                vec!["bob".to_owned()],
            ]
        );
    }

    #[test]
    fn test_load_bare_document() {
        let json = r#"{"feature": {"keyword": "Feature", "name": "Bare"}}"#;
        let document = Document::from_ast_json("bare.feature", json).unwrap();
        assert_eq!(document.feature().name, "Bare");
        assert_eq!(document.feature().description, None);
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_missing_feature() {
        let result = Document::from_ast_json("empty.feature", r#"{"comments": []}"#);
        assert!(matches!(result, Err(LoadError::MissingFeature(name)) if name == "empty.feature"));
    }

    #[test]
    fn test_invalid_json() {
        let result = Document::from_ast_json("broken.feature", "{");
        assert!(matches!(result, Err(LoadError::Json { .. })));
    }

    #[test]
    fn test_load_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("auth");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(nested.join("login.feature.json"), LOGIN_AST).unwrap();
        std::fs::write(temp_dir.path().join("broken.feature.json"), "not json").unwrap();
        std::fs::write(temp_dir.path().join("notes.json"), "{}").unwrap();

        let mut store = DocumentStore::new();
        let loaded = store.load_dir(temp_dir.path()).unwrap();

        assert_eq!(loaded, 1);
        let expected = nested.join("login.feature");
        assert!(store.get(&expected.to_string_lossy()).is_some());
        assert!(store.find_one("Login::Valid credentials::Successful login").is_ok());
    }
}
