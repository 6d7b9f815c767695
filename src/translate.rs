//! Translation of rich dependency parses into flat words
//!
//! External parsers hand back a nested object (sentences → tokens → words)
//! whose indices are 1-based, with index 0 standing for the artificial
//! sentence root. [`to_words`] flattens it into zero-based [`Word`] records:
//!
//! - `sentence_index`: position of the sentence, from 0
//! - `token_index`: external word index − 1
//! - `governor`: external governor − 1, or `None` when the governor is 0
//! - `parent`: external parent token index − 1, kept only when it differs
//!   from the word's own `token_index`
//! - `morphological_features`: `Key=Value` pairs split on `|`, empty for the
//!   `_` marker
//!
//! Only the first word of each token is consulted; multi-word tokens are not
//! expanded. A governor that names a word inside a multi-word token is
//! redirected to the Word that token yields; when that is the word itself,
//! the absorbed word's own governor is followed instead.

use crate::document::Word;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Feature column value meaning "no features"
pub const NO_FEATURES: &str = "_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub sentences: Vec<ParsedSentence>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSentence {
    /// Surface text of the sentence, when the parser reports it
    #[serde(default)]
    pub text: Option<String>,
    pub tokens: Vec<ParsedToken>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedToken {
    /// 1-based position of the token in its sentence
    pub index: usize,
    pub text: String,
    pub words: Vec<ParsedWord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedWord {
    /// 1-based position of the word in its sentence
    pub index: usize,
    pub text: String,
    pub lemma: Option<String>,
    pub pos: Option<String>,
    pub xpos: Option<String>,
    pub upos: Option<String>,
    pub feats: String,
    /// 1-based index of the head word, 0 for the sentence root
    pub governor: usize,
    pub dependency_relation: Option<String>,
    /// 1-based index of the token this word belongs to
    pub parent_token_index: usize,
}

impl ParsedWord {
    /// A word that is its own token, with no features.
    pub fn new(index: usize, text: impl Into<String>, governor: usize, relation: &str) -> Self {
        ParsedWord {
            index,
            text: text.into(),
            feats: NO_FEATURES.to_string(),
            governor,
            dependency_relation: Some(relation.to_string()),
            parent_token_index: index,
            ..Default::default()
        }
    }
}

impl ParsedToken {
    /// A token holding exactly `word`.
    pub fn single(word: ParsedWord) -> Self {
        ParsedToken {
            index: word.index,
            text: word.text.clone(),
            words: vec![word],
        }
    }
}

/// Parse a `Key=Value|Key=Value` feature column.
pub fn parse_features(feats: &str) -> Result<BTreeMap<String, String>, String> {
    let feats = feats.trim();
    if feats.is_empty() || feats == NO_FEATURES {
        return Ok(BTreeMap::new());
    }
    feats
        .split('|')
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
            _ => Err(format!("feature '{}' is not of the form Key=Value", pair)),
        })
        .collect()
}

/// External word index → zero-based token index of the Word its token yields,
/// plus external word index → external governor.
fn word_maps(sentence: &ParsedSentence) -> (HashMap<usize, usize>, HashMap<usize, usize>) {
    let mut owners = HashMap::new();
    let mut heads = HashMap::new();
    for token in &sentence.tokens {
        let Some(owner) = token.words.first().and_then(|w| w.index.checked_sub(1)) else {
            continue;
        };
        for word in &token.words {
            owners.insert(word.index, owner);
            heads.insert(word.index, word.governor);
        }
    }
    (owners, heads)
}

fn resolve_governor(
    word: &ParsedWord,
    owners: &HashMap<usize, usize>,
    heads: &HashMap<usize, usize>,
) -> Option<usize> {
    let own = word.index - 1;
    let mut head = word.governor;
    for _ in 0..=heads.len() {
        if head == 0 {
            return None;
        }
        match owners.get(&head) {
            Some(&owner) if owner != own => return Some(owner),
            Some(_) => match heads.get(&head) {
                Some(&next) if next != head => head = next,
                _ => break,
            },
            None => break,
        }
    }
    head.checked_sub(1)
}

/// Flatten a parse into words, sentence-major then token-minor.
///
/// `process` names the caller in error messages.
pub fn to_words(parsed: &ParsedDocument, process: &str) -> Result<Vec<Word>, AnalysisError> {
    let mut words = Vec::new();

    for (sentence_index, sentence) in parsed.sentences.iter().enumerate() {
        let (owners, heads) = word_maps(sentence);
        for token in &sentence.tokens {
            let external = token.words.first().ok_or_else(|| {
                AnalysisError::malformed(
                    process,
                    format!(
                        "token '{}' in sentence {} has no words",
                        token.text, sentence_index
                    ),
                )
            })?;
            if external.index == 0 {
                return Err(AnalysisError::malformed(
                    process,
                    format!(
                        "word '{}' in sentence {} has index 0; indices start at 1",
                        external.text, sentence_index
                    ),
                ));
            }

            let token_index = external.index - 1;
            let governor = resolve_governor(external, &owners, &heads);
            let parent = external
                .parent_token_index
                .checked_sub(1)
                .filter(|parent| *parent != token_index);
            let morphological_features = parse_features(&external.feats)
                .map_err(|reason| AnalysisError::malformed(process, reason))?;

            words.push(Word {
                char_start: None,
                char_stop: None,
                token_index,
                sentence_index,
                string: external.text.clone(),
                part_of_speech: external.pos.clone(),
                lemma: external.lemma.clone(),
                xpos: external.xpos.clone(),
                upos: external.upos.clone(),
                morphological_features,
                dependency_relation: external.dependency_relation.clone(),
                governor,
                parent,
                stop: None,
            });
        }
    }

    debug!(
        process,
        sentences = parsed.sentences.len(),
        words = words.len(),
        "translated parse into words"
    );
    Ok(words)
}
