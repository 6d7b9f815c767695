//! Tagging: one tag per word, sentence by sentence

use super::{process_name, LanguageBinding, Process, ProcessInput};
use crate::collaborators::{TagField, Tagger};
use crate::document::Document;
use crate::error::AnalysisError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Fills in either `part_of_speech` or `lemma` on every word.
///
/// The tagger is called once per sentence and must return exactly one tag per
/// token.
pub struct TaggingProcess {
    name: String,
    description: String,
    language: LanguageBinding,
    field: TagField,
    algorithm: Option<Arc<dyn Tagger>>,
}

impl TaggingProcess {
    pub fn new(language: LanguageBinding, field: TagField, algorithm: Option<Arc<dyn Tagger>>) -> Self {
        let step = match field {
            TagField::Pos => "tag-pos",
            TagField::Lemma => "lemmatize",
        };
        let description = match field {
            TagField::Pos => format!("Part-of-speech tagger for '{}'", language),
            TagField::Lemma => format!("Lemmatizer for '{}'", language),
        };
        TaggingProcess {
            name: process_name(&language, step),
            description,
            language,
            field,
            algorithm,
        }
    }

    pub fn field(&self) -> TagField {
        self.field
    }
}

impl Process for TaggingProcess {
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
        let tagger = self.algorithm.as_ref().ok_or_else(|| {
            AnalysisError::unavailable(&self.name, format!("no {} tagger registered", self.field))
        })?;

        let mut sentences: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (position, word) in document.words.iter().enumerate() {
            sentences.entry(word.sentence_index).or_default().push(position);
        }

        for (sentence_index, positions) in sentences {
            let tags = {
                let tokens: Vec<&str> = positions
                    .iter()
                    .map(|&position| document.words[position].string.as_str())
                    .collect();
                tagger
                    .tag(&tokens)
                    .map_err(|reason| AnalysisError::unavailable(&self.name, reason))?
            };
            if tags.len() != positions.len() {
                return Err(AnalysisError::malformed(
                    &self.name,
                    format!(
                        "sentence {} has {} tokens but {} tags",
                        sentence_index,
                        positions.len(),
                        tags.len()
                    ),
                ));
            }
            for (position, tag) in positions.into_iter().zip(tags) {
                let word = &mut document.words[position];
                match self.field {
                    TagField::Pos => word.part_of_speech = Some(tag),
                    TagField::Lemma => word.lemma = Some(tag),
                }
            }
        }

        debug!(process = %self.name, words = document.words.len(), "tagged");
        Ok(document)
    }
}
