//! Prompt configuration: per-language templates and the commit prefix catalogue.
//!
//! The configuration is loaded once, either from an external YAML file or
//! from the default embedded in the binary, and is treated as immutable
//! afterwards. Components that need it receive an `Arc<Config>`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::ConfigError;

/// The default configuration document shipped with the binary.
pub const DEFAULT_CONFIG_YAML: &str = include_str!("default_prompt.yaml");

/// Language whose template is used when the requested one is missing.
pub const FALLBACK_LANGUAGE: &str = "ja";

/// Default output path for `gcm init`.
pub const DEFAULT_CONFIG_PATH: &str = "./prompt.yaml";

/// The entire prompt configuration.
///
/// Only [`Config::from_yaml`] builds one, so the fallback template and a
/// non-empty prefix catalogue are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    fallback_template: PromptTemplate,
    /// Templates for every other language.
    prompt_templates: BTreeMap<String, PromptTemplate>,
    prefixes: Vec<CommitPrefix>,
}

/// On-disk shape of the configuration document.
#[derive(Deserialize)]
struct ConfigDocument {
    prompt_templates: BTreeMap<String, PromptTemplate>,
    semantic_release_prefixes: Vec<CommitPrefix>,
}

/// Prompt template for one language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PromptTemplate {
    pub system_instruction: String,
    #[serde(default)]
    pub guidelines: Vec<String>,
    pub output_format: String,
    /// Body with `{placeholder}` markers, see `commit::prompt`.
    pub template: String,
}

/// A semantic-release commit prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitPrefix {
    #[serde(rename = "type")]
    pub prefix_type: String,
    pub emoji: String,
    pub description_ja: String,
    pub description_en: String,
}

impl CommitPrefix {
    /// The marker recognized at the start of a commit message line, e.g. `feat:`.
    pub fn marker(&self) -> String {
        format!("{}:", self.prefix_type)
    }

    /// Description in the given normalized language.
    pub fn description(&self, lang: &str) -> &str {
        if lang == "ja" {
            &self.description_ja
        } else {
            &self.description_en
        }
    }
}

impl Config {
    /// Load from `path`, or the embedded default when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                let data = fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_yaml(&data)
            }
            None => Self::embedded(),
        }
    }

    /// The embedded default configuration.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_yaml(DEFAULT_CONFIG_YAML)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(data: &str) -> Result<Self, ConfigError> {
        let document: ConfigDocument =
            serde_yaml::from_str(data).map_err(ConfigError::ParseFailed)?;
        Self::from_document(document)
    }

    fn from_document(document: ConfigDocument) -> Result<Self, ConfigError> {
        let ConfigDocument {
            mut prompt_templates,
            semantic_release_prefixes: prefixes,
        } = document;

        let fallback_template = prompt_templates.remove(FALLBACK_LANGUAGE).ok_or_else(|| {
            ConfigError::Invalid(format!(
                "prompt_templates must contain a '{}' template",
                FALLBACK_LANGUAGE
            ))
        })?;

        if prefixes.is_empty() {
            return Err(ConfigError::Invalid(
                "semantic_release_prefixes must not be empty".to_string(),
            ));
        }

        if let Some(prefix) = prefixes.iter().find(|p| p.prefix_type.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "prefix with emoji '{}' has an empty type",
                prefix.emoji
            )));
        }

        Ok(Self {
            fallback_template,
            prompt_templates,
            prefixes,
        })
    }

    /// Template for a normalized language code.
    ///
    /// A language without its own template uses the Japanese one.
    pub fn template(&self, lang: &str) -> &PromptTemplate {
        self.prompt_templates
            .get(lang)
            .unwrap_or(&self.fallback_template)
    }

    /// Whether the document defines a template of its own for `lang`.
    pub fn has_template(&self, lang: &str) -> bool {
        lang == FALLBACK_LANGUAGE || self.prompt_templates.contains_key(lang)
    }

    /// The prefix catalogue in document order.
    pub fn prefixes(&self) -> &[CommitPrefix] {
        &self.prefixes
    }

    /// Prefix markers in catalogue order (`feat:`, `fix:`, ...).
    pub fn prefix_markers(&self) -> Vec<String> {
        self.prefixes.iter().map(CommitPrefix::marker).collect()
    }

    /// Write the embedded default configuration to `path`.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn write_default(path: &Path, force: bool) -> Result<PathBuf, ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::WriteFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, DEFAULT_CONFIG_YAML).map_err(|source| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(path.to_path_buf())
    }
}
