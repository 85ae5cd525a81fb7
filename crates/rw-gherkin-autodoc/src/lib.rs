//! Autodoc directives for Gherkin documents.
//!
//! Turns keywords of a [`DocumentStore`](rw_gherkin::DocumentStore) into
//! structured markup, one nested directive per keyword:
//!
//! ```text
//! .. gherkin:feature:: Login
//!
//!     As a user I want to log in.
//!
//!     .. gherkin:scenario:: Successful login
//!
//!
//!         .. gherkin:given:: I am on the login page
//! ```
//!
//! The host documentation framework registers every [`AutoDirective`] and
//! calls [`AutoDirective::run`] for each occurrence, supplying a [`Host`]
//! that records dependencies, collects diagnostics and parses the generated
//! lines.
//!
//! # Example
//!
//! ```
//! use rw_gherkin::{DocumentBuilder, DocumentStore, Feature, Keyword, Scenario};
//! use rw_gherkin_autodoc::{DocumenterRegistry, Generator, Options};
//! use rw_gherkin_config::GherkinConfig;
//!
//! let mut builder = DocumentBuilder::new("login.feature", Feature::new("Feature", "Login"));
//! builder
//!     .add(builder.root(), Keyword::Scenario(Scenario::new("Scenario", "Success")))
//!     .unwrap();
//! let mut store = DocumentStore::new();
//! store.insert(builder.build());
//!
//! let registry = DocumenterRegistry::with_defaults();
//! let config = GherkinConfig::default();
//! let (document, id) = store.find_one("Login::Success").unwrap();
//! let documenter = registry
//!     .create("scenario", document, id, Options::default())
//!     .unwrap();
//!
//! let generated = Generator::new(&registry, &store, &config)
//!     .generate(documenter.as_ref(), None)
//!     .unwrap();
//! assert_eq!(generated.lines.texts(), vec![".. gherkin:scenario:: Success", "", ""]);
//! ```

mod directive;
mod documenter;
mod error;
mod format;
mod lines;
mod options;
mod registry;
mod scope;

pub use directive::{
    AutoDirective, AutodocEnv, DirectiveInvocation, DirectiveSpec, Host, keyword_label,
};
pub use documenter::{
    BackgroundDocumenter, Documenter, ExamplesDocumenter, FeatureDocumenter, Generated,
    Generator, RuleDocumenter, ScenarioDocumenter, StepDocumenter, Target, background_documenter,
    examples_documenter, feature_documenter, rule_documenter, scenario_documenter,
    step_documenter,
};
pub use error::{AutodocError, Diagnostic};
pub use format::{DEFAULT_MEDIATYPE, format_datatable, format_description, format_docstring};
pub use lines::{Emitter, MarkupLines, SourceLine};
pub use options::{OptionError, OptionKind, OptionSpec, OptionValue, Options, default_option_spec};
pub use registry::{DocumenterEntry, DocumenterFactory, DocumenterRegistry};
pub use scope::{DocumentedKeyword, ScopedRange};
