//! Pipeline builder
//!
//! This module provides the `Pipeline` type: a language plus the ordered list of
//! processes that annotate text in that language.
//!
//! # Design
//!
//! Running a pipeline:
//! 1. Creates a fresh `Document` holding the language code and the raw text
//! 2. Hands the document to each process in turn, each process returning a
//!    new document
//! 3. After every stage, checks that the raw text and language code are
//!    untouched and (optionally) that the word-level invariants still hold
//! 4. Returns the final document, or the first error; no partially
//!    annotated document escapes
//!
//! Pipelines for the registered languages come from `PipelineRegistry::resolve`.
//! Custom pipelines are assembled by hand and checked with `validate()`.
//!
//! # Examples
//!
//! ```ignore
//! use antiqua::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::new(language::lookup("lat")?, "Latin tokens and stops")
//!     .add_process(TokenizationProcess::new(LanguageBinding::code("lat"), tokenizer))
//!     .add_process(StopsProcess::new(LanguageBinding::code("lat"), Some(stops)));
//! pipeline.validate()?;
//!
//! let doc = pipeline.run("Gallia est omnis divisa", true)?;
//! ```

use crate::document::Document;
use crate::error::AnalysisError;
use crate::language::Language;
use crate::process::{Process, ProcessInput};
use std::fmt;
use tracing::{debug, trace};

/// An ordered list of processes bound to one language.
///
/// Processes run in the order they were added via `add_process`.
pub struct Pipeline {
    /// The language every document run through this pipeline is in
    language: &'static Language,
    description: String,
    /// The processes to run, in order
    processes: Vec<Box<dyn Process>>,
}

impl Pipeline {
    /// Create a new empty pipeline for `language`.
    ///
    /// An empty pipeline does not validate; add processes with
    /// `add_process()` before running it.
    pub fn new(language: &'static Language, description: impl Into<String>) -> Self {
        Pipeline {
            language,
            description: description.into(),
            processes: Vec::new(),
        }
    }

    /// Add a process to the pipeline.
    ///
    /// Uses the builder pattern, allowing chaining:
    ///
    /// ```ignore
    /// let pipeline = Pipeline::new(latin, "parse then stops")
    ///     .add_process(parse)
    ///     .add_process(stops);
    /// ```
    pub fn add_process<P: Process + 'static>(self, process: P) -> Self {
        self.add_boxed(Box::new(process))
    }

    /// Add an already boxed process to the pipeline.
    pub fn add_boxed(mut self, process: Box<dyn Process>) -> Self {
        self.processes.push(process);
        self
    }

    pub fn language(&self) -> &'static Language {
        self.language
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn processes(&self) -> &[Box<dyn Process>] {
        &self.processes
    }

    /// Names of the processes, in run order
    pub fn process_names(&self) -> Vec<&str> {
        self.processes.iter().map(|process| process.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Check that the processes can run on this pipeline's language in this
    /// order.
    ///
    /// # Errors
    ///
    /// - `InvalidPipeline` when the pipeline is empty, or when a process that
    ///   reads words comes before any process that produces them
    /// - `UnsupportedLanguage` when a process is bound to another language
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.processes.is_empty() {
            return Err(AnalysisError::InvalidPipeline {
                reason: format!("pipeline for '{}' has no processes", self.language.code),
            });
        }

        let mut has_words = false;
        for process in &self.processes {
            if !process.language().accepts(self.language.code) {
                return Err(AnalysisError::UnsupportedLanguage {
                    process: process.name().to_string(),
                    expected: process.language().to_string(),
                    found: self.language.code.to_string(),
                });
            }
            match process.input() {
                ProcessInput::RawText => has_words = true,
                ProcessInput::Words if !has_words => {
                    return Err(AnalysisError::InvalidPipeline {
                        reason: format!(
                            "'{}' reads words but no earlier process produces them",
                            process.name()
                        ),
                    });
                }
                ProcessInput::Words => {}
            }
        }
        Ok(())
    }

    /// Run every process over `text`.
    ///
    /// With `validate_stages`, the word-level invariants are checked after
    /// each stage as well as the raw text and language code.
    pub fn run(&self, text: &str, validate_stages: bool) -> Result<Document, AnalysisError> {
        let code = self.language.code;
        let mut document = Document::new(code, text);

        for process in &self.processes {
            trace!(process = process.name(), "running process");
            document = process.run(document)?;

            if document.raw_text != text || document.language_code != code {
                return Err(AnalysisError::malformed(
                    process.name(),
                    "the raw text or language code was modified",
                ));
            }
            if validate_stages {
                document
                    .check_words()
                    .map_err(|reason| AnalysisError::malformed(process.name(), reason))?;
            }
        }

        debug!(
            language = code,
            processes = self.processes.len(),
            words = document.words.len(),
            "pipeline finished"
        );
        Ok(document)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("language", &self.language.code)
            .field("description", &self.description)
            .field("processes", &self.process_names())
            .finish()
    }
}
