//! Auto-directives: dispatch from a directive invocation to a documenter.
//!
//! One directive is registered per keyword kind (`autofeature`, `autorule`,
//! ..., `autoscenariooutline`). Running a directive resolves its keyword label
//! to a documenter, validates the options against that documenter's schema,
//! resolves the reference argument to a keyword, generates markup and hands
//! it to the [`Host`] for parsing.
//!
//! Bad input (unknown kind, invalid options) is reported to the host as a
//! [`Diagnostic`] and yields no output. Unresolvable references are returned
//! as recoverable errors; everything else is fatal.

use rw_gherkin::{Document, DocumentStore, KeywordId, keyword_to_objtype};
use rw_gherkin_config::GherkinConfig;

use crate::documenter::{Generated, Generator};
use crate::error::{AutodocError, Diagnostic};
use crate::lines::MarkupLines;
use crate::registry::DocumenterRegistry;

/// Length of the `auto` prefix stripped from directive names.
const AUTO_PREFIX_LEN: usize = 4;

/// Label of the Scenario Outline directive, regardless of its name.
const SCENARIO_OUTLINE_LABEL: &str = "Scenario Outline";

/// Argument and body rules shared by all auto-directives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectiveSpec {
    pub required_arguments: usize,
    pub optional_arguments: usize,
    /// Whether the last argument may contain whitespace.
    pub final_argument_whitespace: bool,
    pub has_content: bool,
}

impl Default for DirectiveSpec {
    fn default() -> Self {
        Self {
            required_arguments: 1,
            optional_arguments: 0,
            final_argument_whitespace: true,
            has_content: true,
        }
    }
}

/// One directive occurrence in a host document.
#[derive(Clone, Debug, Default)]
pub struct DirectiveInvocation {
    /// Directive name as written, possibly domain-qualified (`gherkin:autostep`).
    pub name: String,
    /// Keyword reference.
    pub argument: String,
    /// Raw `(name, value)` options; flags have no value.
    pub options: Vec<(String, Option<String>)>,
    /// Directive body.
    pub content: MarkupLines,
    /// Line of the directive in the host document.
    pub lineno: usize,
}

impl DirectiveInvocation {
    #[must_use]
    pub fn new(name: impl Into<String>, argument: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument: argument.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_option(mut self, name: &str, value: Option<&str>) -> Self {
        self.options
            .push((name.to_owned(), value.map(str::to_owned)));
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: MarkupLines) -> Self {
        self.content = content;
        self
    }

    #[must_use]
    pub fn with_lineno(mut self, lineno: usize) -> Self {
        self.lineno = lineno;
        self
    }
}

/// Read-only build state shared by directive runs.
#[derive(Clone, Copy, Debug)]
pub struct AutodocEnv<'a> {
    pub store: &'a DocumentStore,
    pub registry: &'a DocumenterRegistry,
    pub config: &'a GherkinConfig,
    /// Host document being built.
    pub docname: &'a str,
}

/// Services of the documentation framework hosting the directives.
pub trait Host {
    /// Native node produced from generated markup.
    type Node;

    /// Mark a source file as input of the current host document.
    fn record_dependency(&mut self, path: &str);

    /// Report a recoverable build error.
    fn report(&mut self, diagnostic: Diagnostic);

    /// Parse generated markup into native nodes.
    fn parse_generated(&mut self, generated: &Generated) -> Vec<Self::Node>;
}

/// Auto-directive kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AutoDirective {
    Feature,
    Rule,
    Background,
    Scenario,
    ScenarioOutline,
    Examples,
    Step,
}

impl AutoDirective {
    /// All directives, in registration order.
    #[must_use]
    pub fn all() -> [Self; 7] {
        [
            Self::Feature,
            Self::Rule,
            Self::Background,
            Self::Scenario,
            Self::ScenarioOutline,
            Self::Examples,
            Self::Step,
        ]
    }

    /// Registered directive name, without domain.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Feature => "autofeature",
            Self::Rule => "autorule",
            Self::Background => "autobackground",
            Self::Scenario => "autoscenario",
            Self::ScenarioOutline => "autoscenariooutline",
            Self::Examples => "autoexamples",
            Self::Step => "autostep",
        }
    }

    /// Look up a directive by name, with or without domain prefix.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.split_once(':').map_or(name, |(_, name)| name);
        Self::all().into_iter().find(|d| d.name() == name)
    }

    #[must_use]
    pub fn spec(self) -> DirectiveSpec {
        DirectiveSpec::default()
    }

    /// Keyword label used to pick the documenter.
    #[must_use]
    pub fn keyword(self, invocation_name: &str) -> String {
        match self {
            Self::ScenarioOutline => SCENARIO_OUTLINE_LABEL.to_owned(),
            _ => keyword_label(invocation_name),
        }
    }

    /// Run one directive occurrence.
    ///
    /// Returns no nodes when the directive was rejected (the reason is
    /// reported through [`Host::report`]) or generated nothing. A reference
    /// to a keyword of another kind than the directive documents is
    /// rejected the same way.
    ///
    /// # Errors
    ///
    /// Returns [`AutodocError::NotFound`] (recoverable) when the reference
    /// does not resolve, and fatal errors from the registry or generation.
    pub fn run<H: Host>(
        self,
        invocation: &DirectiveInvocation,
        env: &AutodocEnv<'_>,
        host: &mut H,
    ) -> Result<Vec<H::Node>, AutodocError> {
        tracing::debug!(
            docname = env.docname,
            line = invocation.lineno,
            directive = %invocation.name,
            argument = %invocation.argument,
            "Autodoc input"
        );

        let keyword = self.keyword(&invocation.name);
        let Some((objtype, entry)) = keyword_to_objtype(&keyword)
            .and_then(|objtype| env.registry.get(objtype).map(|entry| (objtype, entry)))
        else {
            let err = AutodocError::UnregisteredKind {
                directive: invocation.name.clone(),
                keyword,
            };
            return Ok(reject(&err, invocation, env, host));
        };

        let options = match entry.option_spec.assemble(&invocation.options) {
            Ok(options) => options,
            Err(source) => {
                let err = AutodocError::InvalidOption {
                    directive: invocation.name.clone(),
                    source,
                };
                return Ok(reject(&err, invocation, env, host));
            }
        };

        let reference = invocation.argument.trim();
        let (document, id) = self.resolve(reference, env)?;
        let found = document.keyword(id).kind();
        if env.store.objtype_for_keyword_kind(found) != objtype {
            let err = AutodocError::WrongKind {
                directive: invocation.name.clone(),
                reference: reference.to_owned(),
                objtype: objtype.to_owned(),
                found,
            };
            return Ok(reject(&err, invocation, env, host));
        }

        let documenter = env.registry.create(objtype, document, id, options)?;
        let generated = Generator::new(env.registry, env.store, env.config)
            .generate(documenter.as_ref(), Some(&invocation.content))?;
        if generated.is_empty() {
            return Ok(Vec::new());
        }

        tracing::debug!(
            lines = generated.lines.len(),
            "Autodoc output:\n{}",
            generated.lines.to_text()
        );

        for dependency in &generated.dependencies {
            host.record_dependency(dependency);
        }
        Ok(host.parse_generated(&generated))
    }

    /// Resolve a reference argument to its document and keyword.
    ///
    /// Features are first looked up as a path relative to each configured
    /// source root; only when no root contains that document does the
    /// qualified-name lookup run.
    ///
    /// # Errors
    ///
    /// Returns [`AutodocError::NotFound`] when the reference does not resolve.
    pub fn resolve<'a>(
        self,
        reference: &str,
        env: &AutodocEnv<'a>,
    ) -> Result<(&'a Document, KeywordId), AutodocError> {
        let store = env.store;
        if self == Self::Feature {
            for root in env.config.source_roots() {
                let candidate = root.join(reference);
                if let Some(document) = store.get(&candidate.to_string_lossy()) {
                    tracing::debug!(path = %candidate.display(), "Resolved feature by source path");
                    return Ok((document, document.root()));
                }
            }
        }
        Ok(store.find_one(reference)?)
    }
}

/// Log and report a rejected directive; it produces no nodes.
fn reject<H: Host>(
    err: &AutodocError,
    invocation: &DirectiveInvocation,
    env: &AutodocEnv<'_>,
    host: &mut H,
) -> Vec<H::Node> {
    tracing::error!(docname = env.docname, line = invocation.lineno, "{err}");
    host.report(Diagnostic::error(err.to_string(), env.docname, invocation.lineno));
    Vec::new()
}

/// Keyword label of a directive invocation name.
///
/// Drops a domain qualifier, then the `auto` prefix, and title-cases the rest:
/// `gherkin:autoscenario` gives `Scenario`. The qualifier is only recognized
/// when its colon comes after the fourth character, so a short domain such
/// as `gk:autostep` is cut as if it had none.
///
/// # Example
///
/// ```
/// use rw_gherkin_autodoc::keyword_label;
///
/// assert_eq!(keyword_label("gherkin:autoscenario"), "Scenario");
/// assert_eq!(keyword_label("autofeature"), "Feature");
/// ```
#[must_use]
pub fn keyword_label(invocation_name: &str) -> String {
    let qualified = invocation_name[char_offset(invocation_name, AUTO_PREFIX_LEN)..].contains(':');
    let name = match invocation_name.split_once(':') {
        Some((_, name)) if qualified => name,
        _ => invocation_name,
    };
    title_case(&name[char_offset(name, AUTO_PREFIX_LEN)..])
}

/// Byte offset of the `n`th char, or the length when shorter.
fn char_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map_or(s.len(), |(i, _)| i)
}

/// Uppercase the first letter of every word, lowercase the others.
fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }
    result
}
