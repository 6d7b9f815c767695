//! Pipeline configuration registry
//!
//! This module defines, for each language, which steps its pipeline runs:
//! 1. Which processes, in which order
//! 2. What happens for known languages without a dedicated pipeline
//!
//! Configurations are plain data. Binding them to collaborator algorithms
//! happens in [`PipelineRegistry::resolve`], once per pipeline build.

use crate::collaborators::{Collaborators, TagField};
use crate::error::AnalysisError;
use crate::language::{self, Language};
use crate::pipeline::builder::Pipeline;
use crate::process::{
    DependencyProcess, LanguageBinding, Process, StopsProcess, TaggingProcess,
    TokenizationProcess,
};
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Name of the language-agnostic configuration
pub const DEFAULT_PIPELINE: &str = "default";

/// One step of a configured pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessSpec {
    /// Raw text into words
    Tokenize,
    /// Part-of-speech tags on existing words
    TagPos,
    /// Lemmata on existing words
    Lemmatize,
    /// Full dependency parse of the raw text
    Parse,
    /// Stop-word flags on existing words
    Stops,
}

impl ProcessSpec {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessSpec::Tokenize => "tokenize",
            ProcessSpec::TagPos => "tag-pos",
            ProcessSpec::Lemmatize => "lemmatize",
            ProcessSpec::Parse => "parse",
            ProcessSpec::Stops => "stops",
        }
    }

    /// Build the process for this step, taking its algorithm for `language`
    /// from `collaborators`.
    pub fn build(
        &self,
        binding: LanguageBinding,
        language: &Language,
        collaborators: &Collaborators,
    ) -> Box<dyn Process> {
        let code = language.code;
        match self {
            ProcessSpec::Tokenize => Box::new(TokenizationProcess::new(
                binding,
                collaborators.tokenizer(code),
            )),
            ProcessSpec::TagPos => Box::new(TaggingProcess::new(
                binding,
                TagField::Pos,
                collaborators.tagger(code, TagField::Pos),
            )),
            ProcessSpec::Lemmatize => Box::new(TaggingProcess::new(
                binding,
                TagField::Lemma,
                collaborators.tagger(code, TagField::Lemma),
            )),
            ProcessSpec::Parse => {
                Box::new(DependencyProcess::new(binding, collaborators.parser(code)))
            }
            ProcessSpec::Stops => Box::new(StopsProcess::new(binding, collaborators.stops(code))),
        }
    }
}

impl fmt::Display for ProcessSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named step list: a language code, or [`DEFAULT_PIPELINE`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: String,
    pub steps: Vec<ProcessSpec>,
}

impl PipelineConfig {
    pub fn new(name: impl Into<String>, description: impl Into<String>, steps: Vec<ProcessSpec>) -> Self {
        PipelineConfig {
            name: name.into(),
            description: description.into(),
            steps,
        }
    }

    /// Steps joined with ` → `
    pub fn steps_str(&self) -> String {
        self.steps
            .iter()
            .map(|step| step.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }
}

/// Registry of per-language pipeline configurations
#[derive(Debug, Clone)]
pub struct PipelineRegistry {
    configs: HashMap<String, PipelineConfig>,
    default: PipelineConfig,
    fallback_to_default: bool,
}

impl PipelineRegistry {
    /// Create a registry with no dedicated pipelines; every word-delimited
    /// language falls back to tokenization.
    pub fn new() -> Self {
        PipelineRegistry {
            configs: HashMap::new(),
            default: PipelineConfig::new(
                DEFAULT_PIPELINE,
                "Language-agnostic tokenization",
                vec![ProcessSpec::Tokenize],
            ),
            fallback_to_default: true,
        }
    }

    /// Register a dedicated pipeline, replacing any earlier one of the same
    /// name. Registering [`DEFAULT_PIPELINE`] replaces the fallback.
    pub fn register(&mut self, config: PipelineConfig) {
        if config.name == DEFAULT_PIPELINE {
            self.default = config;
        } else {
            self.configs.insert(config.name.clone(), config);
        }
    }

    /// Get the dedicated pipeline for a language code
    pub fn get(&self, code: &str) -> Option<&PipelineConfig> {
        self.configs.get(code)
    }

    /// Check if a language has a dedicated pipeline
    pub fn has(&self, code: &str) -> bool {
        self.configs.contains_key(code)
    }

    /// List all dedicated pipelines (sorted by language code)
    pub fn list_all(&self) -> Vec<&PipelineConfig> {
        let mut configs: Vec<_> = self.configs.values().collect();
        configs.sort_by(|a, b| a.name.cmp(&b.name));
        configs
    }

    /// The fallback pipeline
    pub fn default_config(&self) -> &PipelineConfig {
        &self.default
    }

    pub fn fallback_to_default(&self) -> bool {
        self.fallback_to_default
    }

    pub fn set_fallback_to_default(&mut self, enabled: bool) {
        self.fallback_to_default = enabled;
    }

    /// Create registry with the standard per-language pipelines
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        for (code, name) in [("lat", "Latin"), ("grc", "Ancient Greek")] {
            registry.register(PipelineConfig::new(
                code,
                format!("{}: dependency parse, then stop words", name),
                vec![ProcessSpec::Parse, ProcessSpec::Stops],
            ));
        }

        for (code, name) in [
            ("chu", "Church Slavonic"),
            ("fro", "Old French"),
            ("got", "Gothic"),
        ] {
            registry.register(PipelineConfig::new(
                code,
                format!("{}: dependency parse", name),
                vec![ProcessSpec::Parse],
            ));
        }

        for code in [
            "akk", "ang", "arb", "arc", "enm", "frm", "gmh", "hin", "non", "pan", "pli", "san",
        ] {
            registry.register(PipelineConfig::new(
                code,
                "Tokenization",
                vec![ProcessSpec::Tokenize],
            ));
        }

        registry
    }

    /// Apply the `pipeline.fallback_to_default` and `pipelines` settings.
    ///
    /// Every key of `pipelines` must be a known language code or
    /// [`DEFAULT_PIPELINE`].
    pub fn apply_settings(&mut self, settings: &Settings) -> Result<(), AnalysisError> {
        self.fallback_to_default = settings.pipeline.fallback_to_default;

        let mut names: Vec<_> = settings.pipelines.keys().collect();
        names.sort();
        for name in names {
            if name != DEFAULT_PIPELINE {
                language::lookup(name)?;
            }
            let steps = settings.pipelines[name].clone();
            debug!(pipeline = %name, steps = steps.len(), "pipeline configured by settings");
            self.register(PipelineConfig::new(name.clone(), "Configured in settings", steps));
        }
        Ok(())
    }

    /// Pick the configuration for `code` without building anything.
    ///
    /// # Errors
    ///
    /// - `UnknownLanguage` when `code` is not in the language registry
    /// - `UnimplementedLanguage` when the language has no dedicated pipeline
    ///   and cannot use the fallback (not word-delimited, or fallback off)
    pub fn config_for(
        &self,
        code: &str,
    ) -> Result<(&'static Language, &PipelineConfig, bool), AnalysisError> {
        let language = language::lookup(code)?;
        if let Some(config) = self.configs.get(code) {
            return Ok((language, config, true));
        }
        if self.fallback_to_default && language.word_delimited {
            return Ok((language, &self.default, false));
        }
        Err(AnalysisError::UnimplementedLanguage {
            code: code.to_string(),
        })
    }

    /// Build the pipeline for `code`.
    ///
    /// Processes of a dedicated pipeline are bound to the language; the
    /// fallback's processes accept any language.
    pub fn resolve(
        &self,
        code: &str,
        collaborators: &Collaborators,
    ) -> Result<Pipeline, AnalysisError> {
        let (language, config, dedicated) = self.config_for(code)?;
        let binding = if dedicated {
            LanguageBinding::code(language.code)
        } else {
            LanguageBinding::Any
        };

        let pipeline = config
            .steps
            .iter()
            .fold(Pipeline::new(language, config.description.clone()), |pipeline, step| {
                pipeline.add_boxed(step.build(binding.clone(), language, collaborators))
            });
        pipeline.validate()?;

        debug!(
            language = language.code,
            pipeline = %config.name,
            processes = ?pipeline.process_names(),
            "resolved pipeline"
        );
        Ok(pipeline)
    }
}

impl Default for PipelineRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_defaults() {
        let registry = PipelineRegistry::with_defaults();
        assert_eq!(registry.get("lat").unwrap().steps, vec![ProcessSpec::Parse, ProcessSpec::Stops]);
        assert_eq!(registry.get("got").unwrap().steps, vec![ProcessSpec::Parse]);
        assert_eq!(registry.get("non").unwrap().steps, vec![ProcessSpec::Tokenize]);
        assert!(!registry.has("goh"));
        assert_eq!(registry.list_all().len(), 17);
    }

    #[test]
    fn test_list_all_sorted() {
        let registry = PipelineRegistry::with_defaults();
        let names: Vec<_> = registry.list_all().iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names[0], "akk");
    }

    #[test]
    fn test_resolve_dedicated() {
        let registry = PipelineRegistry::with_defaults();
        let pipeline = registry.resolve("non", &Collaborators::with_builtins()).unwrap();
        assert_eq!(pipeline.language().code, "non");
        assert_eq!(pipeline.process_names(), vec!["non:tokenize"]);
    }

    #[test]
    fn test_resolve_fallback() {
        let registry = PipelineRegistry::with_defaults();
        let pipeline = registry.resolve("goh", &Collaborators::with_builtins()).unwrap();
        assert_eq!(pipeline.language().code, "goh");
        assert_eq!(pipeline.process_names(), vec!["any:tokenize"]);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = PipelineRegistry::with_defaults();
        assert_eq!(
            registry
                .resolve("xyz-unknown", &Collaborators::with_builtins())
                .unwrap_err(),
            AnalysisError::UnknownLanguage {
                code: "xyz-unknown".into()
            }
        );
    }

    #[test]
    fn test_resolve_not_word_delimited() {
        let registry = PipelineRegistry::with_defaults();
        assert_eq!(
            registry
                .resolve("lzh", &Collaborators::with_builtins())
                .unwrap_err(),
            AnalysisError::UnimplementedLanguage { code: "lzh".into() }
        );
    }

    #[test]
    fn test_fallback_disabled() {
        let mut registry = PipelineRegistry::with_defaults();
        registry.set_fallback_to_default(false);
        assert!(matches!(
            registry.resolve("goh", &Collaborators::with_builtins()),
            Err(AnalysisError::UnimplementedLanguage { .. })
        ));
        assert!(registry.resolve("non", &Collaborators::with_builtins()).is_ok());
    }

    #[test]
    fn test_apply_settings() {
        let mut settings = Settings::default();
        settings
            .pipelines
            .insert("non".into(), vec![ProcessSpec::Tokenize, ProcessSpec::Stops]);
        settings
            .pipelines
            .insert(DEFAULT_PIPELINE.into(), vec![ProcessSpec::Tokenize, ProcessSpec::TagPos]);

        let mut registry = PipelineRegistry::with_defaults();
        registry.apply_settings(&settings).unwrap();
        assert_eq!(registry.get("non").unwrap().steps_str(), "tokenize → stops");
        assert_eq!(registry.default_config().steps_str(), "tokenize → tag-pos");
    }

    #[test]
    fn test_apply_settings_rejects_unknown_code() {
        let mut settings = Settings::default();
        settings.pipelines.insert("zzz".into(), vec![ProcessSpec::Tokenize]);
        let mut registry = PipelineRegistry::with_defaults();
        assert_eq!(
            registry.apply_settings(&settings),
            Err(AnalysisError::UnknownLanguage { code: "zzz".into() })
        );
    }

    #[test]
    fn test_invalid_configured_order() {
        let mut registry = PipelineRegistry::with_defaults();
        registry.register(PipelineConfig::new("non", "stops first", vec![ProcessSpec::Stops]));
        assert!(matches!(
            registry.resolve("non", &Collaborators::with_builtins()),
            Err(AnalysisError::InvalidPipeline { .. })
        ));
    }
}
