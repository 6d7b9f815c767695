//! # antiqua
//!
//! Annotation pipelines for historical and ancient languages.
//!
//! Raw text in a given language is threaded through an ordered list of
//! annotation processes (tokenization, tagging, dependency parsing, stop-word
//! marking), producing a [`Document`] of [`Word`] records. Finished sentences
//! can then be turned into rooted dependency trees.
//!
//! ```rust,ignore
//! use antiqua::analyze;
//!
//! let doc = analyze("non", "Gylfi konungr réð þar löndum.")?;
//! assert_eq!(doc.tokens()[0], "Gylfi");
//! ```
//!
//! The linguistic algorithms themselves are collaborators: anything that
//! implements [`collaborators::Tokenizer`], [`collaborators::Tagger`],
//! [`collaborators::DependencyParser`] or [`collaborators::StopWords`] (closures
//! included) can be registered in a [`Collaborators`] registry and picked up
//! when pipelines are resolved.

pub mod collaborators;
pub mod document;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod process;
pub mod settings;
pub mod translate;
pub mod tree;

pub use collaborators::Collaborators;
pub use document::{Document, Word};
pub use error::AnalysisError;
pub use language::Language;
pub use pipeline::{analyze, Analyzer, Pipeline, PipelineRegistry};
pub use process::Process;
pub use settings::Settings;
pub use tree::{DependencyTree, Form, TreeError};
