//! Analyzer: resolves a language's pipeline and runs text through it

use crate::collaborators::Collaborators;
use crate::document::Document;
use crate::error::AnalysisError;
use crate::language::{self, Language};
use crate::pipeline::builder::Pipeline;
use crate::pipeline::config::PipelineRegistry;
use crate::settings::Settings;
use tracing::debug;

/// Runs the pipeline of one language
#[derive(Debug)]
pub struct Analyzer {
    pipeline: Pipeline,
    validate_stages: bool,
}

impl Analyzer {
    /// Create an analyzer with the built-in pipelines and collaborators
    pub fn new(code: &str) -> Result<Self, AnalysisError> {
        Self::with_registry(
            code,
            &PipelineRegistry::with_defaults(),
            &Collaborators::with_builtins(),
        )
    }

    /// Create an analyzer from a custom registry
    pub fn with_registry(
        code: &str,
        registry: &PipelineRegistry,
        collaborators: &Collaborators,
    ) -> Result<Self, AnalysisError> {
        let pipeline = registry.resolve(code, collaborators)?;
        Ok(Self {
            pipeline,
            validate_stages: true,
        })
    }

    /// Create an analyzer from the built-in pipelines adjusted by `settings`
    pub fn with_settings(
        code: &str,
        settings: &Settings,
        collaborators: &Collaborators,
    ) -> Result<Self, AnalysisError> {
        let mut registry = PipelineRegistry::with_defaults();
        registry.apply_settings(settings)?;
        let analyzer = Self::with_registry(code, &registry, collaborators)?;
        Ok(analyzer.validate_stages(settings.pipeline.validate_stages))
    }

    /// Use `pipeline` instead of resolving one.
    ///
    /// The pipeline must be for `code` and must pass [`Pipeline::validate`].
    pub fn with_pipeline(code: &str, pipeline: Pipeline) -> Result<Self, AnalysisError> {
        let language = language::lookup(code)?;
        if pipeline.language().code != language.code {
            return Err(AnalysisError::InvalidPipeline {
                reason: format!(
                    "pipeline is for '{}' but the analyzer is for '{}'",
                    pipeline.language().code,
                    language.code
                ),
            });
        }
        pipeline.validate()?;
        debug!(language = code, processes = ?pipeline.process_names(), "using custom pipeline");
        Ok(Self {
            pipeline,
            validate_stages: true,
        })
    }

    /// Turn per-stage word checks on or off
    pub fn validate_stages(mut self, enabled: bool) -> Self {
        self.validate_stages = enabled;
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn language(&self) -> &'static Language {
        self.pipeline.language()
    }

    /// Annotate `text`.
    ///
    /// Empty text is valid and yields whatever the processes make of it.
    pub fn analyze(&self, text: &str) -> Result<Document, AnalysisError> {
        self.pipeline.run(text, self.validate_stages)
    }
}

/// Analyze `text` in the language `code` with the built-in pipelines.
pub fn analyze(code: &str, text: &str) -> Result<Document, AnalysisError> {
    Analyzer::new(code)?.analyze(text)
}
