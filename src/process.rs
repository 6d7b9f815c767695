//! Processes: the stages of an analysis pipeline
//!
//! A process consumes a [`Document`] and returns a new one. Every process is
//! bound either to one language or to any language, declares whether it reads
//! the raw text or the words produced by an earlier stage, and declares whether
//! it fills in one field or many.
//!
//! The four kinds of process are:
//! - [`TokenizationProcess`]: raw text → words with offsets
//! - [`TaggingProcess`]: words → POS tags or lemmata
//! - [`StopsProcess`]: words → stop-word flags
//! - [`DependencyProcess`]: raw text → fully annotated words (multi-output)
//!
//! Processes are pure with respect to the raw text and the language code;
//! the pipeline checks both after every stage.

pub mod dependency;
pub mod stops;
pub mod tagging;
pub mod tokenization;

use crate::document::Document;
use crate::error::AnalysisError;
use serde::Serialize;
use std::fmt;

pub use dependency::DependencyProcess;
pub use stops::StopsProcess;
pub use tagging::TaggingProcess;
pub use tokenization::TokenizationProcess;

/// The language a process accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageBinding {
    Any,
    Code(String),
}

impl LanguageBinding {
    pub fn code(code: impl Into<String>) -> Self {
        LanguageBinding::Code(code.into())
    }

    pub fn accepts(&self, code: &str) -> bool {
        match self {
            LanguageBinding::Any => true,
            LanguageBinding::Code(bound) => bound == code,
        }
    }
}

impl fmt::Display for LanguageBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageBinding::Any => write!(f, "any"),
            LanguageBinding::Code(code) => write!(f, "{}", code),
        }
    }
}

/// What a process reads from the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessInput {
    RawText,
    Words,
}

/// How many word fields a process fills in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessOutput {
    Single,
    Multi,
}

/// One stage of a pipeline.
pub trait Process: Send + Sync {
    /// Stable identifier, e.g. `lat:parse`
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn language(&self) -> &LanguageBinding;

    fn input(&self) -> ProcessInput;

    fn output(&self) -> ProcessOutput {
        ProcessOutput::Single
    }

    /// Run this stage.
    ///
    /// # Errors
    /// - `UnsupportedLanguage` when the document's language is not the bound one
    /// - `AlgorithmUnavailable` when the collaborator is missing or fails
    /// - `MalformedOutput` when the collaborator's output is inconsistent
    fn run(&self, document: Document) -> Result<Document, AnalysisError>;

    /// Refuse documents in a language this process is not bound to.
    fn check_language(&self, document: &Document) -> Result<(), AnalysisError> {
        if self.language().accepts(&document.language_code) {
            Ok(())
        } else {
            Err(AnalysisError::UnsupportedLanguage {
                process: self.name().to_string(),
                expected: self.language().to_string(),
                found: document.language_code.clone(),
            })
        }
    }
}

/// `{language}:{step}`
pub(crate) fn process_name(language: &LanguageBinding, step: &str) -> String {
    format!("{}:{}", language, step)
}
