//! Errors surfaced by pipeline resolution and execution

use thiserror::Error;

/// Everything that can stop an `analyze` call.
///
/// None of these are recovered locally: a failing stage aborts the whole run
/// and no partially annotated document is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The code is not in the language registry
    #[error("Unknown language code '{code}'")]
    UnknownLanguage { code: String },

    /// The language is known but no annotation path exists for it
    #[error("Valid language code, however no pipeline is available for '{code}'")]
    UnimplementedLanguage { code: String },

    /// A process was run on a document in a language it was not built for
    #[error("Process '{process}' is bound to '{expected}' but the document is '{found}'")]
    UnsupportedLanguage {
        process: String,
        expected: String,
        found: String,
    },

    /// The collaborator algorithm behind a process is missing or failed
    #[error("Algorithm for '{process}' is unavailable: {reason}")]
    AlgorithmUnavailable { process: String, reason: String },

    /// Collaborator output could not be mapped onto words
    #[error("Malformed output from '{process}': {reason}")]
    MalformedOutput { process: String, reason: String },

    /// A custom pipeline whose processes cannot run in the given order
    #[error("Invalid pipeline: {reason}")]
    InvalidPipeline { reason: String },
}

impl AnalysisError {
    pub(crate) fn unavailable(process: &str, reason: impl Into<String>) -> Self {
        AnalysisError::AlgorithmUnavailable {
            process: process.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(process: &str, reason: impl Into<String>) -> Self {
        AnalysisError::MalformedOutput {
            process: process.to_string(),
            reason: reason.into(),
        }
    }
}
