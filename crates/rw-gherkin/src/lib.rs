//! Gherkin keyword tree and document store.
//!
//! Holds already-parsed Gherkin feature files as [`Document`]s. Each document
//! owns one root Feature and stores its keywords in a flat arena, so ancestry
//! and children lookups are index based.
//!
//! Documents are collected in a [`DocumentStore`], which resolves qualified
//! keyword references (`Feature::Scenario::Step text`) and maps keyword kinds
//! to the objtype tags used by the autodoc documenters.
//!
//! # Example
//!
//! ```
//! use rw_gherkin::{DocumentBuilder, DocumentStore, Feature, Keyword, Scenario, Step};
//!
//! let mut builder = DocumentBuilder::new(
//!     "features/login.feature",
//!     Feature::new("Feature", "Login"),
//! );
//! let scenario = builder
//!     .add(builder.root(), Keyword::Scenario(Scenario::new("Scenario", "Successful login")))
//!     .unwrap();
//! builder
//!     .add(scenario, Keyword::Step(Step::new("Given", "I am on the login page")))
//!     .unwrap();
//!
//! let mut store = DocumentStore::new();
//! store.insert(builder.build());
//!
//! let (document, id) = store.find_one("Login::Successful login").unwrap();
//! assert_eq!(document.keyword(id).summary(), "Successful login");
//! ```

mod ast;
mod document;
mod error;
mod keyword;
mod store;

pub use document::{Document, DocumentBuilder};
pub use error::{LoadError, StoreError, StructureError};
pub use keyword::{
    Background, DataTable, Docstring, Examples, Feature, Keyword, KeywordId, KeywordKind, Rule,
    Scenario, Step,
};
pub use store::{
    DocumentStore, REFERENCE_SEPARATOR, keyword_to_objtype, normalize_reference, objtype_for_kind,
};
