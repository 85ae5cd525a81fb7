use rw_gherkin::{
    Background, Document, Examples, Feature, Keyword, KeywordId, KeywordKind, Rule, Scenario,
    Step,
};

use super::{Documenter, Target};
use crate::error::AutodocError;
use crate::format::{format_datatable, format_description, format_docstring};
use crate::lines::Emitter;
use crate::options::Options;

/// Declare a documenter bound to one keyword payload type.
///
/// Generates the struct, its constructor, the registry factory and the
/// `Documenter` impl; the braced block supplies the variant's own methods.
macro_rules! keyword_documenter {
    (
        $(#[$meta:meta])*
        $name:ident, $variant:ident, $objtype:literal, $factory:ident,
        nesting: $nesting:literal,
        { $($methods:tt)* }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<'a> {
            target: Target<'a>,
            keyword: &'a $variant,
            options: Options,
        }

        impl<'a> $name<'a> {
            /// Bind to `id`, which must be a
            #[doc = concat!("`", stringify!($variant), "`.")]
            ///
            /// # Errors
            ///
            /// Returns [`AutodocError::RegistryMismatch`] for any other kind.
            pub fn new(
                document: &'a Document,
                id: KeywordId,
                options: Options,
            ) -> Result<Self, AutodocError> {
                let target = Target::new(document, id);
                match target.keyword() {
                    Keyword::$variant(keyword) => Ok(Self {
                        target,
                        keyword,
                        options,
                    }),
                    other => Err(kind_mismatch($objtype, other.kind())),
                }
            }

            /// Documented keyword payload.
            #[must_use]
            pub fn keyword(&self) -> &'a $variant {
                self.keyword
            }
        }

        impl Documenter for $name<'_> {
            fn objtype(&self) -> &'static str {
                $objtype
            }

            fn allow_nesting(&self) -> bool {
                $nesting
            }

            fn target(&self) -> Target<'_> {
                self.target
            }

            fn options(&self) -> &Options {
                &self.options
            }

            $($methods)*
        }

        /// Registry factory for
        #[doc = concat!("[`", stringify!($name), "`].")]
        pub fn $factory<'a>(
            document: &'a Document,
            id: KeywordId,
            options: Options,
        ) -> Result<Box<dyn Documenter + 'a>, AutodocError> {
            Ok(Box::new($name::new(document, id, options)?))
        }
    };
}

fn kind_mismatch(objtype: &str, kind: KeywordKind) -> AutodocError {
    AutodocError::RegistryMismatch {
        objtype: objtype.to_owned(),
        detail: format!("cannot document a {kind} keyword"),
    }
}

keyword_documenter!(
    /// Documents a Feature, its description and all its children.
    FeatureDocumenter, Feature, "feature", feature_documenter,
    nesting: true,
    {
        fn child_keywords(&self) -> Vec<KeywordId> {
            self.target.document.children(self.target.id).to_vec()
        }

        fn add_content(&self, out: &mut Emitter<'_>) {
            if let Some(description) = &self.keyword.description {
                format_description(out, description);
            }
        }
    }
);

keyword_documenter!(
    /// Documents a Rule and its children.
    RuleDocumenter, Rule, "rule", rule_documenter,
    nesting: true,
    {
        fn child_keywords(&self) -> Vec<KeywordId> {
            self.target.document.children(self.target.id).to_vec()
        }
    }
);

keyword_documenter!(
    /// Documents a Background and its steps.
    BackgroundDocumenter, Background, "background", background_documenter,
    nesting: true,
    {
        fn child_keywords(&self) -> Vec<KeywordId> {
            self.target.document.children(self.target.id).to_vec()
        }
    }
);

keyword_documenter!(
    /// Documents a Scenario or Scenario Outline, steps before examples.
    ScenarioDocumenter, Scenario, "scenario", scenario_documenter,
    nesting: true,
    {
        fn child_keywords(&self) -> Vec<KeywordId> {
            let document = self.target.document;
            let (mut steps, examples): (Vec<KeywordId>, Vec<KeywordId>) = document
                .children(self.target.id)
                .iter()
                .copied()
                .partition(|child| document.keyword(*child).kind() != KeywordKind::Examples);
            steps.extend(examples);
            steps
        }
    }
);

keyword_documenter!(
    /// Documents an Examples block as a table.
    ExamplesDocumenter, Examples, "examples", examples_documenter,
    nesting: true,
    {
        fn add_content(&self, out: &mut Emitter<'_>) {
            format_datatable(out, &self.keyword.datatable);
            out.add_line("");
        }
    }
);

keyword_documenter!(
    /// Documents a single step, its docstring and data table.
    StepDocumenter, Step, "step", step_documenter,
    nesting: false,
    {
        /// Lowercase step keyword without colon (`given`, `when`, `and`, `*`).
        fn directive_name(&self) -> String {
            self.keyword
                .keyword
                .trim()
                .trim_matches(':')
                .to_lowercase()
        }

        fn add_content(&self, out: &mut Emitter<'_>) {
            if let Some(docstring) = &self.keyword.docstring {
                format_docstring(out, docstring);
            }
            if let Some(datatable) = &self.keyword.datatable {
                format_datatable(out, datatable);
                out.add_line("");
            }
        }
    }
);
