//! Stop-word marking

use super::{process_name, LanguageBinding, Process, ProcessInput};
use crate::collaborators::StopWords;
use crate::document::Document;
use crate::error::AnalysisError;
use std::sync::Arc;
use tracing::debug;

/// Sets `stop` on every word: true when its string or its lemma is a stop
/// word.
pub struct StopsProcess {
    name: String,
    description: String,
    language: LanguageBinding,
    algorithm: Option<Arc<dyn StopWords>>,
}

impl StopsProcess {
    pub fn new(language: LanguageBinding, algorithm: Option<Arc<dyn StopWords>>) -> Self {
        StopsProcess {
            name: process_name(&language, "stops"),
            description: format!("Stop-word filter for '{}'", language),
            language,
            algorithm,
        }
    }
}

impl Process for StopsProcess {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn language(&self) -> &LanguageBinding {
        &self.language
    }

    fn input(&self) -> ProcessInput {
        ProcessInput::Words
    }

    fn run(&self, mut document: Document) -> Result<Document, AnalysisError> {
        self.check_language(&document)?;
        let stops = self
            .algorithm
            .as_ref()
            .ok_or_else(|| AnalysisError::unavailable(&self.name, "no stop-word list registered"))?;

        for word in &mut document.words {
            let by_lemma = word.lemma.as_deref().map_or(false, |lemma| stops.is_stop(lemma));
            word.stop = Some(by_lemma || stops.is_stop(&word.string));
        }

        debug!(
            process = %self.name,
            stops = document.words.iter().filter(|w| w.stop == Some(true)).count(),
            "marked stop words"
        );
        Ok(document)
    }
}
