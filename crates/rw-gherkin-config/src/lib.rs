//! Configuration for RW Gherkin autodoc.
//!
//! Parses the `[gherkin]` table of `rw.toml` with serde and provides
//! auto-discovery of the config file in parent directories.
//!
//! ```toml
//! [gherkin]
//! domain = "gherkin"
//! content_indent = 4
//!
//! [gherkin.sources]
//! features = "features"
//! shared = "${SHARED_FEATURES:-../shared/features}"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! Source paths support `${VAR}`, `${VAR:-default}` and a leading `~`.
//! Relative source paths are resolved against the config file's directory.

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rw.toml";

/// Default domain name used in generated directive headers.
const DEFAULT_DOMAIN: &str = "gherkin";

/// Default number of spaces per content indentation level.
const DEFAULT_CONTENT_INDENT: usize = 4;

/// Largest accepted content indentation.
const MAX_CONTENT_INDENT: usize = 16;

/// Raw file layout: only the `[gherkin]` table is read, other tables are ignored.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    gherkin: GherkinConfigRaw,
}

/// Raw gherkin configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct GherkinConfigRaw {
    domain: Option<String>,
    content_indent: Option<usize>,
    sources: BTreeMap<String, String>,
}

/// Resolved Gherkin autodoc configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GherkinConfig {
    /// Domain name prefixed to generated directives (`gherkin:feature`).
    pub domain: String,
    /// Named source roots that feature references are resolved against.
    ///
    /// Roots are tried in name order.
    pub sources: BTreeMap<String, PathBuf>,
    /// Spaces per content indentation level.
    pub content_indent: usize,
    /// Path to the config file (set after loading).
    pub config_path: Option<PathBuf>,
}

impl Default for GherkinConfig {
    fn default() -> Self {
        Self {
            domain: DEFAULT_DOMAIN.to_owned(),
            sources: BTreeMap::new(),
            content_indent: DEFAULT_CONTENT_INDENT,
            config_path: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`gherkin.sources.features`").
        field: String,
        /// Error message (e.g., "${`FEATURES_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl GherkinConfig {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rw.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// an environment variable is missing, or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML text, resolving relative paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        let raw = file.gherkin;

        let mut sources = BTreeMap::new();
        for (name, path) in raw.sources {
            let field = format!("gherkin.sources.{name}");
            require_non_empty(&name, "gherkin.sources key")?;
            require_non_empty(&path, &field)?;
            let expanded = expand::expand_path(&path, &field)?;
            sources.insert(name, base_dir.join(expanded));
        }

        let domain = match raw.domain {
            Some(domain) => expand::expand_env(&domain, "gherkin.domain")?,
            None => DEFAULT_DOMAIN.to_owned(),
        };

        let config = Self {
            domain,
            sources,
            content_indent: raw.content_indent.unwrap_or(DEFAULT_CONTENT_INDENT),
            config_path: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.domain, "gherkin.domain")?;
        if self
            .domain
            .chars()
            .any(|c| c == ':' || c.is_whitespace())
        {
            return Err(ConfigError::Validation(
                "gherkin.domain cannot contain ':' or whitespace".to_owned(),
            ));
        }

        if self.content_indent == 0 {
            return Err(ConfigError::Validation(
                "gherkin.content_indent must be greater than 0".to_owned(),
            ));
        }
        if self.content_indent > MAX_CONTENT_INDENT {
            return Err(ConfigError::Validation(format!(
                "gherkin.content_indent cannot exceed {MAX_CONTENT_INDENT}"
            )));
        }

        Ok(())
    }

    /// One level of content indentation.
    #[must_use]
    pub fn content_indent_unit(&self) -> String {
        " ".repeat(self.content_indent)
    }

    /// Source roots in lookup order.
    pub fn source_roots(&self) -> impl Iterator<Item = &Path> {
        self.sources.values().map(PathBuf::as_path)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }
}
