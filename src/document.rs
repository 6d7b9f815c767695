//! Word and Document records threaded through every pipeline stage
//!
//! A [`Document`] holds the raw text and a flat list of [`Word`]s in
//! sentence-major, token-minor order. Word-to-word references (`governor`,
//! `parent`) are plain token indices into the same sentence, so words stay
//! plain data and sentences can be regrouped at any time.

use crate::tree::{DependencyTree, TreeError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Relation label that marks the head of a sentence
pub const ROOT_RELATION: &str = "root";

/// One token's accumulated annotations.
///
/// Created by a tokenizing (or parsing) process and enriched by later ones.
/// `token_index` is zero-based within its sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub char_start: Option<usize>,
    pub char_stop: Option<usize>,
    pub token_index: usize,
    pub sentence_index: usize,
    pub string: String,
    pub part_of_speech: Option<String>,
    pub lemma: Option<String>,
    pub xpos: Option<String>,
    pub upos: Option<String>,
    pub morphological_features: BTreeMap<String, String>,
    pub dependency_relation: Option<String>,
    /// Token index of the syntactic head, `None` for the root
    pub governor: Option<usize>,
    pub parent: Option<usize>,
    pub stop: Option<bool>,
}

impl Word {
    pub fn new(sentence_index: usize, token_index: usize, string: impl Into<String>) -> Self {
        Word {
            sentence_index,
            token_index,
            string: string.into(),
            ..Default::default()
        }
    }

    pub fn is_root(&self) -> bool {
        self.dependency_relation.as_deref() == Some(ROOT_RELATION)
    }
}

/// The aggregate annotation state for one input text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub language_code: String,
    pub raw_text: String,
    pub words: Vec<Word>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trees: Option<Vec<DependencyTree>>,
}

impl Document {
    pub fn new(language_code: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Document {
            language_code: language_code.into(),
            raw_text: raw_text.into(),
            words: Vec::new(),
            trees: None,
        }
    }

    /// Words grouped by `sentence_index`, each group sorted by `token_index`.
    ///
    /// Groups come out in ascending sentence order; gaps in the sentence
    /// numbering are simply skipped.
    pub fn sentences(&self) -> Vec<Vec<&Word>> {
        let mut grouped: BTreeMap<usize, Vec<&Word>> = BTreeMap::new();
        for word in &self.words {
            grouped.entry(word.sentence_index).or_default().push(word);
        }
        grouped
            .into_values()
            .map(|mut sentence| {
                sentence.sort_by_key(|word| word.token_index);
                sentence
            })
            .collect()
    }

    pub fn tokens(&self) -> Vec<&str> {
        self.words.iter().map(|word| word.string.as_str()).collect()
    }

    pub fn lemmata(&self) -> Vec<Option<&str>> {
        self.words.iter().map(|word| word.lemma.as_deref()).collect()
    }

    /// `part_of_speech` of every word; for parsed words that is the XPOS,
    /// or the UPOS when the parser gave no XPOS.
    pub fn pos(&self) -> Vec<Option<&str>> {
        self.words
            .iter()
            .map(|word| word.part_of_speech.as_deref())
            .collect()
    }

    pub fn morphological_features(&self) -> Vec<&BTreeMap<String, String>> {
        self.words
            .iter()
            .map(|word| &word.morphological_features)
            .collect()
    }

    pub fn sentences_tokens(&self) -> Vec<Vec<&str>> {
        self.sentences()
            .into_iter()
            .map(|sentence| sentence.iter().map(|word| word.string.as_str()).collect())
            .collect()
    }

    /// Each sentence rebuilt from its tokens, joined by single spaces.
    pub fn sentences_strings(&self) -> Vec<String> {
        self.sentences_tokens()
            .into_iter()
            .map(|tokens| tokens.join(" "))
            .collect()
    }

    /// Tokens whose word has not been marked as a stop word.
    pub fn tokens_stops_filtered(&self) -> Vec<&str> {
        self.words
            .iter()
            .filter(|word| word.stop != Some(true))
            .map(|word| word.string.as_str())
            .collect()
    }

    /// Build one dependency tree per sentence and store them on the document.
    pub fn build_trees(&mut self) -> Result<&[DependencyTree], TreeError> {
        let trees = self
            .sentences()
            .into_iter()
            .map(|sentence| {
                let owned: Vec<Word> = sentence.into_iter().cloned().collect();
                DependencyTree::build(&owned)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.trees.insert(trees).as_slice())
    }

    /// Check the word-level invariants, returning a description of the first
    /// violation.
    ///
    /// - `token_index` is unique within a sentence
    /// - a word labelled `root` has no governor
    /// - any governor names a token of the same sentence
    pub fn check_words(&self) -> Result<(), String> {
        for sentence in self.sentences() {
            let mut seen = HashSet::new();
            for word in &sentence {
                if !seen.insert(word.token_index) {
                    return Err(format!(
                        "token index {} appears twice in sentence {}",
                        word.token_index, word.sentence_index
                    ));
                }
            }
            for word in &sentence {
                match word.governor {
                    Some(_) if word.is_root() => {
                        return Err(format!(
                            "root word '{}' in sentence {} has a governor",
                            word.string, word.sentence_index
                        ));
                    }
                    Some(governor) if !seen.contains(&governor) => {
                        return Err(format!(
                            "governor {} of '{}' is not a token of sentence {}",
                            governor, word.string, word.sentence_index
                        ));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
