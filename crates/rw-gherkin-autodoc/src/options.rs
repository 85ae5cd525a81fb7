//! Directive option schemas and validation.
//!
//! Each documenter declares an [`OptionSpec`]. Raw options given to a
//! directive (`:name: value` pairs, value absent for flags) are checked
//! against it by [`OptionSpec::assemble`].

use std::collections::BTreeMap;

/// Options accepted by every built-in documenter.
///
/// `noindex` is accepted for compatibility with hand-written directives and
/// has no effect on generated output.
#[must_use]
pub fn default_option_spec() -> OptionSpec {
    OptionSpec::new().with("noindex", OptionKind::Flag)
}

/// How an option value is interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    /// No value allowed.
    Flag,
    /// Any non-empty text.
    Text,
    /// Signed integer.
    Integer,
}

/// Validated option value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    Flag,
    Text(String),
    Integer(i64),
}

/// Why a raw option was rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("unknown option: \"{0}\"")]
    Unknown(String),
    #[error("duplicate option \"{0}\"")]
    Duplicate(String),
    #[error("invalid option value for \"{name}\": {reason}")]
    Invalid { name: String, reason: String },
}

/// Option schema of a documenter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionSpec {
    kinds: BTreeMap<String, OptionKind>,
}

impl OptionSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an option.
    #[must_use]
    pub fn with(mut self, name: &str, kind: OptionKind) -> Self {
        self.kinds.insert(name.to_owned(), kind);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<OptionKind> {
        self.kinds.get(name).copied()
    }

    /// Declared option names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.kinds.keys().map(String::as_str)
    }

    /// Validate raw `(name, value)` pairs into [`Options`].
    ///
    /// # Errors
    ///
    /// Returns the first unknown, duplicate or badly typed option.
    ///
    /// # Example
    ///
    /// ```
    /// use rw_gherkin_autodoc::{OptionKind, OptionSpec, OptionValue};
    ///
    /// let spec = OptionSpec::new().with("noindex", OptionKind::Flag);
    /// let options = spec.assemble(&[("noindex".to_owned(), None)]).unwrap();
    /// assert_eq!(options.get("noindex"), Some(&OptionValue::Flag));
    ///
    /// assert!(spec.assemble(&[("bogus".to_owned(), None)]).is_err());
    /// ```
    pub fn assemble(&self, raw: &[(String, Option<String>)]) -> Result<Options, OptionError> {
        let mut values = BTreeMap::new();
        for (name, value) in raw {
            let kind = self
                .get(name)
                .ok_or_else(|| OptionError::Unknown(name.clone()))?;
            if values.contains_key(name) {
                return Err(OptionError::Duplicate(name.clone()));
            }
            values.insert(name.clone(), convert(name, kind, value.as_deref())?);
        }
        Ok(Options { values })
    }
}

fn convert(name: &str, kind: OptionKind, value: Option<&str>) -> Result<OptionValue, OptionError> {
    let invalid = |reason: String| OptionError::Invalid {
        name: name.to_owned(),
        reason,
    };
    let value = value.map(str::trim).filter(|v| !v.is_empty());

    match (kind, value) {
        (OptionKind::Flag, None) => Ok(OptionValue::Flag),
        (OptionKind::Flag, Some(v)) => Err(invalid(format!(
            "no argument is allowed; \"{v}\" supplied"
        ))),
        (OptionKind::Text | OptionKind::Integer, None) => {
            Err(invalid("argument required but none supplied".to_owned()))
        }
        (OptionKind::Text, Some(v)) => Ok(OptionValue::Text(v.to_owned())),
        (OptionKind::Integer, Some(v)) => v
            .parse()
            .map(OptionValue::Integer)
            .map_err(|e| invalid(format!("\"{v}\" is not an integer ({e})"))),
    }
}

/// Validated options of one directive invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    values: BTreeMap<String, OptionValue>,
}

impl Options {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(OptionValue::Flag))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> OptionSpec {
        OptionSpec::new()
            .with("noindex", OptionKind::Flag)
            .with("title", OptionKind::Text)
            .with("depth", OptionKind::Integer)
    }

    fn raw(pairs: &[(&str, Option<&str>)]) -> Vec<(String, Option<String>)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.map(str::to_owned)))
            .collect()
    }

    #[test]
    fn test_empty_options() {
        let options = spec().assemble(&[]).unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn test_all_kinds() {
        let options = spec()
            .assemble(&raw(&[
                ("noindex", None),
                ("title", Some(" Login ")),
                ("depth", Some("2")),
            ]))
            .unwrap();
        assert!(options.has_flag("noindex"));
        assert_eq!(options.get("title"), Some(&OptionValue::Text("Login".to_owned())));
        assert_eq!(options.get("depth"), Some(&OptionValue::Integer(2)));
        assert_eq!(options.iter().count(), 3);
    }

    #[test]
    fn test_flag_with_empty_value() {
        let options = spec().assemble(&raw(&[("noindex", Some(""))])).unwrap();
        assert!(options.has_flag("noindex"));
    }

    #[test]
    fn test_unknown_option() {
        let err = spec().assemble(&raw(&[("bogus", None)])).unwrap_err();
        assert_eq!(err, OptionError::Unknown("bogus".to_owned()));
    }

    #[test]
    fn test_duplicate_option() {
        let err = spec()
            .assemble(&raw(&[("noindex", None), ("noindex", None)]))
            .unwrap_err();
        assert_eq!(err, OptionError::Duplicate("noindex".to_owned()));
    }

    #[test]
    fn test_flag_with_value() {
        let err = spec()
            .assemble(&raw(&[("noindex", Some("yes"))]))
            .unwrap_err();
        assert!(matches!(err, OptionError::Invalid { ref name, .. } if name == "noindex"));
    }

    #[test]
    fn test_integer_parse_error() {
        let err = spec().assemble(&raw(&[("depth", Some("two"))])).unwrap_err();
        assert!(err.to_string().contains("\"two\" is not an integer"));
    }

    #[test]
    fn test_text_requires_value() {
        let err = spec().assemble(&raw(&[("title", None)])).unwrap_err();
        assert!(err.to_string().contains("argument required"));
    }

    #[test]
    fn test_default_spec_only_noindex() {
        let spec = default_option_spec();
        let names: Vec<&str> = spec.names().collect();
        assert_eq!(names, vec!["noindex"]);
    }

    #[test]
    fn test_names_sorted() {
        let spec = spec();
        let names: Vec<&str> = spec.names().collect();
        assert_eq!(names, vec!["depth", "noindex", "title"]);
    }
}
