//! Settings loader
//!
//! `defaults/antiqua.default.toml` is embedded into the library so that the
//! documented defaults and runtime behavior stay in sync. Callers layer
//! user files and single-key overrides on top via [`Loader`] before
//! deserializing into [`Settings`].

use crate::pipeline::ProcessSpec;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

const DEFAULT_TOML: &str = include_str!("../defaults/antiqua.default.toml");

/// Top-level settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub pipeline: PipelineSettings,
    pub tree: TreeSettings,
    pub output: OutputSettings,
    /// Per-language step lists replacing the built-in pipelines
    #[serde(default)]
    pub pipelines: HashMap<String, Vec<ProcessSpec>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub fallback_to_default: bool,
    pub validate_stages: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeSettings {
    pub show_all_features: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

/// How the CLI prints an analyzed document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One word per line, tab-separated fields
    Words,
    Json,
    Yaml,
    /// Indented dependency trees
    Tree,
    /// Dependency trees with branch connectors
    Treeviz,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Words,
        OutputFormat::Json,
        OutputFormat::Yaml,
        OutputFormat::Tree,
        OutputFormat::Treeviz,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Words => "words",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Tree => "tree",
            OutputFormat::Treeviz => "treeviz",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<_> = OutputFormat::ALL.iter().map(|f| f.as_str()).collect();
                format!("Unknown output format '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a settings file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional settings file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer settings from TOML text.
    pub fn with_toml(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override (used for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting settings.
    pub fn build(self) -> Result<Settings, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<Settings, ConfigError> {
    Loader::new().build()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            pipeline: PipelineSettings {
                fallback_to_default: true,
                validate_stages: true,
            },
            tree: TreeSettings {
                show_all_features: false,
            },
            output: OutputSettings {
                format: OutputFormat::Words,
            },
            pipelines: HashMap::new(),
        }
    }
}
