//! Dependency parsing: raw text into fully annotated words

use super::{process_name, LanguageBinding, Process, ProcessInput, ProcessOutput};
use crate::collaborators::DependencyParser;
use crate::document::{Document, Word};
use crate::error::AnalysisError;
use crate::translate::{to_words, ParsedDocument};
use std::sync::Arc;
use tracing::debug;

/// Runs a dependency parser over the raw text and replaces the document's
/// words with the translated parse.
///
/// Fills in indices, strings, POS, lemma, morphological features, relation
/// and governor in one step. Word offsets are recovered by locating each
/// surface token in the raw text, left to right; a token that cannot be found
/// leaves its word without offsets.
pub struct DependencyProcess {
    name: String,
    description: String,
    language: LanguageBinding,
    algorithm: Option<Arc<dyn DependencyParser>>,
}

impl DependencyProcess {
    pub fn new(language: LanguageBinding, algorithm: Option<Arc<dyn DependencyParser>>) -> Self {
        DependencyProcess {
            name: process_name(&language, "parse"),
            description: format!("Dependency parser for '{}'", language),
            language,
            algorithm,
        }
    }
}

/// Locate `surface` in `raw_text` at or after `cursor`.
///
/// A match right after the cursor (past whitespace) wins; otherwise the first
/// later match that does not start or end inside a word.
fn locate(raw_text: &str, cursor: usize, surface: &str) -> Option<usize> {
    if surface.is_empty() {
        return None;
    }
    let rest = &raw_text[cursor..];
    let skipped = rest.len() - rest.trim_start().len();
    if rest[skipped..].starts_with(surface) {
        return Some(cursor + skipped);
    }

    let is_word_char = |c: char| c.is_alphanumeric();
    rest.match_indices(surface)
        .map(|(offset, _)| cursor + offset)
        .find(|&start| {
            let before = raw_text[..start].chars().next_back();
            let after = raw_text[start + surface.len()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
}

/// Best-effort byte offsets: each word gets the span of its surface token.
///
/// Tokens are searched left to right; a token that cannot be located leaves
/// its word's offsets `None` and does not move the cursor.
fn align(raw_text: &str, parsed: &ParsedDocument, words: &mut [Word]) -> usize {
    let tokens = parsed.sentences.iter().flat_map(|sentence| &sentence.tokens);
    let mut cursor = 0;
    let mut unaligned = 0;
    for (word, token) in words.iter_mut().zip(tokens) {
        match locate(raw_text, cursor, &token.text) {
            Some(start) => {
                let stop = start + token.text.len();
                word.char_start = Some(start);
                word.char_stop = Some(stop);
                cursor = stop;
            }
            None => unaligned += 1,
        }
    }
    unaligned
}

impl Process for DependencyProcess {
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

    fn output(&self) -> ProcessOutput {
        ProcessOutput::Multi
    }

    fn run(&self, mut document: Document) -> Result<Document, AnalysisError> {
        self.check_language(&document)?;
        let parser = self
            .algorithm
            .as_ref()
            .ok_or_else(|| AnalysisError::unavailable(&self.name, "no dependency parser registered"))?;

        let parsed = parser
            .parse(&document.raw_text)
            .map_err(|reason| AnalysisError::unavailable(&self.name, reason))?;
        let mut words = to_words(&parsed, &self.name)?;
        let unaligned = align(&document.raw_text, &parsed, &mut words);

        debug!(
            process = %self.name,
            sentences = parsed.sentences.len(),
            words = words.len(),
            unaligned,
            "parsed"
        );
        document.words = words;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::{ParsedDocument, ParsedSentence, ParsedToken, ParsedWord};

    fn gallia(_: &str) -> Result<ParsedDocument, String> {
        let mut gallia = ParsedWord::new(1, "Gallia", 4, "nsubj");
        gallia.lemma = Some("Gallia".into());
        gallia.upos = Some("PROPN".into());
        gallia.xpos = Some("Ne".into());
        gallia.pos = Some("Ne".into());
        gallia.feats = "Case=Nom|Number=Sing".into();
        let words = vec![
            gallia,
            ParsedWord::new(2, "est", 4, "cop"),
            ParsedWord::new(3, "omnis", 4, "det"),
            ParsedWord::new(4, "divisa", 0, "root"),
        ];
        Ok(ParsedDocument {
            sentences: vec![ParsedSentence {
                text: None,
                tokens: words.into_iter().map(ParsedToken::single).collect(),
            }],
        })
    }

    #[test]
    fn test_parse_fills_words() {
        let process = DependencyProcess::new(LanguageBinding::code("lat"), Some(Arc::new(gallia)));
        let document = process
            .run(Document::new("lat", "Gallia est omnis divisa"))
            .unwrap();

        assert_eq!(process.output(), ProcessOutput::Multi);
        assert_eq!(document.tokens(), vec!["Gallia", "est", "omnis", "divisa"]);
        assert_eq!(document.pos()[0], Some("Ne"));
        assert_eq!(document.words[0].upos.as_deref(), Some("PROPN"));
        assert_eq!(document.words[0].governor, Some(3));
        assert_eq!(document.words[3].governor, None);
        assert_eq!(document.words[3].dependency_relation.as_deref(), Some("root"));
        assert_eq!(
            (document.words[2].char_start, document.words[2].char_stop),
            (Some(11), Some(16))
        );
    }

    #[test]
    fn test_forms_absent_from_text_keep_no_offsets() {
        let process = DependencyProcess::new(LanguageBinding::code("lat"), Some(Arc::new(gallia)));
        let document = process
            .run(Document::new("lat", "GALLIA est omnis diuisa"))
            .unwrap();

        assert_eq!(document.words.len(), 4);
        let offsets: Vec<_> = document
            .words
            .iter()
            .map(|w| (w.char_start, w.char_stop))
            .collect();
        assert_eq!(
            offsets,
            vec![(None, None), (Some(7), Some(10)), (Some(11), Some(16)), (None, None)]
        );
    }

    fn nobiscum(_: &str) -> Result<ParsedDocument, String> {
        let mut cum = ParsedWord::new(1, "cum", 3, "case");
        cum.parent_token_index = 1;
        let mut nobis = ParsedWord::new(2, "nobis", 3, "obl");
        nobis.parent_token_index = 1;
        Ok(ParsedDocument {
            sentences: vec![ParsedSentence {
                text: Some("nobiscum venit".into()),
                tokens: vec![
                    ParsedToken {
                        index: 1,
                        text: "nobiscum".into(),
                        words: vec![cum, nobis],
                    },
                    ParsedToken::single(ParsedWord::new(3, "venit", 0, "root")),
                ],
            }],
        })
    }

    #[test]
    fn test_multiword_token_aligns_on_surface() {
        let process = DependencyProcess::new(LanguageBinding::code("lat"), Some(Arc::new(nobiscum)));
        let document = process.run(Document::new("lat", "nobiscum venit")).unwrap();

        assert_eq!(document.tokens(), vec!["cum", "venit"]);
        assert_eq!(
            (document.words[0].char_start, document.words[0].char_stop),
            (Some(0), Some(8))
        );
        assert_eq!(
            (document.words[1].char_start, document.words[1].char_stop),
            (Some(9), Some(14))
        );
    }

    #[test]
    fn test_locate_respects_word_boundaries() {
        assert_eq!(locate("nobiscum venit", 0, "cum"), None);
        assert_eq!(locate("et cum eo", 0, "cum"), Some(3));
        assert_eq!(locate("  venit", 0, "venit"), Some(2));
        assert_eq!(locate("virumque", 5, "que"), Some(5));
        assert_eq!(locate("venit", 0, ""), None);
    }

    #[test]
    fn test_missing_parser_is_unavailable() {
        let process = DependencyProcess::new(LanguageBinding::code("got"), None);
        assert_eq!(
            process.run(Document::new("got", "Atta unsar")),
            Err(AnalysisError::AlgorithmUnavailable {
                process: "got:parse".into(),
                reason: "no dependency parser registered".into()
            })
        );
    }

    #[test]
    fn test_align_moves_forward() {
        let parsed = ParsedDocument {
            sentences: vec![ParsedSentence {
                text: None,
                tokens: vec![
                    ParsedToken::single(ParsedWord::new(1, "et", 0, "root")),
                    ParsedToken::single(ParsedWord::new(2, "et", 1, "conj")),
                ],
            }],
        };
        let mut words = vec![Word::new(0, 0, "et"), Word::new(0, 1, "et")];
        assert_eq!(align("et tu et", &parsed, &mut words), 0);
        assert_eq!(words[0].char_start, Some(0));
        assert_eq!(words[1].char_start, Some(6));
    }
}
