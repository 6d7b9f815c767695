//! Tokenization: raw text into words

use super::{process_name, LanguageBinding, Process, ProcessInput};
use crate::collaborators::Tokenizer;
use crate::document::{Document, Word};
use crate::error::AnalysisError;
use std::sync::Arc;
use tracing::debug;

/// Replaces the document's words with the tokenizer's output.
///
/// Every token must slice back out of the raw text at its offsets. Empty
/// sentences are dropped before sentences are numbered.
pub struct TokenizationProcess {
    name: String,
    description: String,
    language: LanguageBinding,
    algorithm: Arc<dyn Tokenizer>,
}

impl TokenizationProcess {
    pub fn new(language: LanguageBinding, algorithm: Arc<dyn Tokenizer>) -> Self {
        let description = match &language {
            LanguageBinding::Any => "Language-agnostic tokenizer".to_string(),
            LanguageBinding::Code(code) => format!("Tokenizer for '{}'", code),
        };
        TokenizationProcess {
            name: process_name(&language, "tokenize"),
            description,
            language,
            algorithm,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Process for TokenizationProcess {
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
        ProcessInput::RawText
    }

    fn run(&self, mut document: Document) -> Result<Document, AnalysisError> {
        self.check_language(&document)?;

        let sentences = self
            .algorithm
            .tokenize(&document.raw_text)
            .map_err(|reason| AnalysisError::unavailable(&self.name, reason))?;

        let mut words = Vec::new();
        for (sentence_index, sentence) in sentences
            .iter()
            .filter(|sentence| !sentence.is_empty())
            .enumerate()
        {
            for (token_index, span) in sentence.iter().enumerate() {
                let found = document.raw_text.get(span.char_start..span.char_stop);
                if found != Some(span.text.as_str()) {
                    return Err(AnalysisError::malformed(
                        &self.name,
                        format!(
                            "token '{}' does not match the text at {}..{}",
                            span.text, span.char_start, span.char_stop
                        ),
                    ));
                }
                words.push(Word {
                    char_start: Some(span.char_start),
                    char_stop: Some(span.char_stop),
                    ..Word::new(sentence_index, token_index, span.text.clone())
                });
            }
        }

        debug!(process = %self.name, words = words.len(), "tokenized");
        document.words = words;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{BuiltinTokenizer, TokenSpan};

    fn builtin(language: LanguageBinding) -> TokenizationProcess {
        TokenizationProcess::new(language, Arc::new(BuiltinTokenizer))
    }

    #[test]
    fn test_tokenize_old_norse() {
        let process = builtin(LanguageBinding::code("non"));
        let document = process
            .run(Document::new("non", "Gylfi konungr réð þar löndum."))
            .unwrap();
        assert_eq!(
            document.tokens(),
            vec!["Gylfi", "konungr", "réð", "þar", "löndum", "."]
        );
        let red = &document.words[2];
        assert_eq!((red.char_start, red.char_stop), (Some(14), Some(19)));
        assert_eq!(red.sentence_index, 0);
        assert_eq!(red.token_index, 2);
        assert_eq!(process.name(), "non:tokenize");
    }

    #[test]
    fn test_sentences_numbered() {
        let process = builtin(LanguageBinding::Any);
        let document = process.run(Document::new("lat", "Veni. Vidi.")).unwrap();
        let positions: Vec<_> = document
            .words
            .iter()
            .map(|w| (w.sentence_index, w.token_index))
            .collect();
        assert_eq!(positions, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_replaces_existing_words() {
        let process = builtin(LanguageBinding::Any);
        let mut document = Document::new("lat", "Veni");
        document.words.push(Word::new(0, 0, "stale"));
        document.words.push(Word::new(0, 1, "words"));
        let document = process.run(document).unwrap();
        assert_eq!(document.tokens(), vec!["Veni"]);
    }

    #[test]
    fn test_misaligned_span_is_malformed() {
        let shifted = |text: &str| -> Result<Vec<Vec<TokenSpan>>, String> {
            Ok(vec![vec![TokenSpan::new(text, 1, text.len() + 1)]])
        };
        let process = TokenizationProcess::new(LanguageBinding::Any, Arc::new(shifted));
        assert!(matches!(
            process.run(Document::new("lat", "Veni")),
            Err(AnalysisError::MalformedOutput { .. })
        ));
    }

    #[test]
    fn test_failing_tokenizer_is_unavailable() {
        let failing =
            |_: &str| -> Result<Vec<Vec<TokenSpan>>, String> { Err("model not loaded".into()) };
        let process = TokenizationProcess::new(LanguageBinding::Any, Arc::new(failing));
        assert_eq!(
            process.run(Document::new("lat", "Veni")),
            Err(AnalysisError::AlgorithmUnavailable {
                process: "any:tokenize".into(),
                reason: "model not loaded".into()
            })
        );
    }

    #[test]
    fn test_wrong_language() {
        let process = builtin(LanguageBinding::code("lat"));
        assert!(matches!(
            process.run(Document::new("grc", "ὅτι")),
            Err(AnalysisError::UnsupportedLanguage { .. })
        ));
    }
}
