//! Language pipelines
//!
//! - [`config`]: which steps each language runs ([`PipelineRegistry`])
//! - [`builder`]: an ordered list of processes bound to a language ([`Pipeline`])
//! - [`executor`]: the public entry point ([`Analyzer`], [`analyze`])

pub mod builder;
pub mod config;
pub mod executor;

pub use builder::Pipeline;
pub use config::{PipelineConfig, PipelineRegistry, ProcessSpec, DEFAULT_PIPELINE};
pub use executor::{analyze, Analyzer};
