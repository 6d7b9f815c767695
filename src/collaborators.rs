//! Collaborator algorithms and the registry that hands them to processes
//!
//! The linguistic algorithms are opaque to the pipeline: a process only knows
//! the contract of the collaborator it was built with. Each contract is a
//! small trait, implemented for plain closures where that makes sense, so a
//! caller can inject anything from a full parser wrapper to a one-line lambda.
//!
//! [`Collaborators`] is built once, before pipelines are resolved, and is
//! passed by reference to every pipeline build. Nothing here is global.

pub mod conllu;
pub mod stopwords;
pub mod tokenizer;

use crate::translate::ParsedDocument;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub use conllu::{parse_conllu, ConlluError, ConlluParser};
pub use stopwords::StopList;
pub use tokenizer::BuiltinTokenizer;

/// One token found by a tokenizer, with byte offsets into the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpan {
    pub text: String,
    pub char_start: usize,
    pub char_stop: usize,
}

impl TokenSpan {
    pub fn new(text: impl Into<String>, char_start: usize, char_stop: usize) -> Self {
        TokenSpan {
            text: text.into(),
            char_start,
            char_stop,
        }
    }
}

/// Splits raw text into sentences of tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<Vec<TokenSpan>>, String>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Result<Vec<Vec<TokenSpan>>, String> + Send + Sync,
{
    fn tokenize(&self, text: &str) -> Result<Vec<Vec<TokenSpan>>, String> {
        self(text)
    }
}

/// Assigns one tag to every token of a sentence.
pub trait Tagger: Send + Sync {
    fn tag(&self, tokens: &[&str]) -> Result<Vec<String>, String>;
}

impl<F> Tagger for F
where
    F: Fn(&[&str]) -> Result<Vec<String>, String> + Send + Sync,
{
    fn tag(&self, tokens: &[&str]) -> Result<Vec<String>, String> {
        self(tokens)
    }
}

/// Produces a full dependency parse of raw text.
pub trait DependencyParser: Send + Sync {
    fn parse(&self, text: &str) -> Result<ParsedDocument, String>;
}

impl<F> DependencyParser for F
where
    F: Fn(&str) -> Result<ParsedDocument, String> + Send + Sync,
{
    fn parse(&self, text: &str) -> Result<ParsedDocument, String> {
        self(text)
    }
}

/// Membership test for stop words.
pub trait StopWords: Send + Sync {
    fn is_stop(&self, token: &str) -> bool;
}

/// Which word field a tagger fills in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagField {
    Pos,
    Lemma,
}

impl fmt::Display for TagField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagField::Pos => write!(f, "pos"),
            TagField::Lemma => write!(f, "lemma"),
        }
    }
}

/// Registry of collaborator algorithms, keyed by language code.
#[derive(Clone)]
pub struct Collaborators {
    default_tokenizer: Arc<dyn Tokenizer>,
    tokenizers: HashMap<String, Arc<dyn Tokenizer>>,
    taggers: HashMap<(String, TagField), Arc<dyn Tagger>>,
    parsers: HashMap<String, Arc<dyn DependencyParser>>,
    stops: HashMap<String, Arc<dyn StopWords>>,
}

impl Collaborators {
    /// A registry holding only the language-agnostic tokenizer.
    pub fn new() -> Self {
        Collaborators {
            default_tokenizer: Arc::new(BuiltinTokenizer),
            tokenizers: HashMap::new(),
            taggers: HashMap::new(),
            parsers: HashMap::new(),
            stops: HashMap::new(),
        }
    }

    /// The language-agnostic tokenizer plus the bundled stop-word lists.
    pub fn with_builtins() -> Self {
        Self::new()
            .with_stops("lat", stopwords::latin())
            .with_stops("grc", stopwords::ancient_greek())
    }

    pub fn with_default_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.default_tokenizer = Arc::new(tokenizer);
        self
    }

    pub fn with_tokenizer(mut self, code: &str, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizers.insert(code.to_string(), Arc::new(tokenizer));
        self
    }

    pub fn with_tagger(
        mut self,
        code: &str,
        field: TagField,
        tagger: impl Tagger + 'static,
    ) -> Self {
        self.taggers
            .insert((code.to_string(), field), Arc::new(tagger));
        self
    }

    pub fn with_parser(mut self, code: &str, parser: impl DependencyParser + 'static) -> Self {
        self.parsers.insert(code.to_string(), Arc::new(parser));
        self
    }

    pub fn with_stops(mut self, code: &str, stops: impl StopWords + 'static) -> Self {
        self.stops.insert(code.to_string(), Arc::new(stops));
        self
    }

    pub fn default_tokenizer(&self) -> Arc<dyn Tokenizer> {
        Arc::clone(&self.default_tokenizer)
    }

    /// The tokenizer registered for `code`, or the language-agnostic one.
    pub fn tokenizer(&self, code: &str) -> Arc<dyn Tokenizer> {
        self.tokenizers
            .get(code)
            .cloned()
            .unwrap_or_else(|| self.default_tokenizer())
    }

    pub fn tagger(&self, code: &str, field: TagField) -> Option<Arc<dyn Tagger>> {
        self.taggers.get(&(code.to_string(), field)).cloned()
    }

    pub fn parser(&self, code: &str) -> Option<Arc<dyn DependencyParser>> {
        self.parsers.get(code).cloned()
    }

    pub fn stops(&self, code: &str) -> Option<Arc<dyn StopWords>> {
        self.stops.get(code).cloned()
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn sorted<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<&'a String> {
            let mut keys: Vec<_> = keys.collect();
            keys.sort();
            keys
        }
        let mut taggers: Vec<String> = self
            .taggers
            .keys()
            .map(|(code, field)| format!("{}:{}", code, field))
            .collect();
        taggers.sort();
        f.debug_struct("Collaborators")
            .field("tokenizers", &sorted(self.tokenizers.keys()))
            .field("taggers", &taggers)
            .field("parsers", &sorted(self.parsers.keys()))
            .field("stops", &sorted(self.stops.keys()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole_text(text: &str) -> Result<Vec<Vec<TokenSpan>>, String> {
        Ok(vec![vec![TokenSpan::new(text, 0, text.len())]])
    }

    #[test]
    fn test_tokenizer_falls_back_to_default() {
        let collaborators = Collaborators::new().with_tokenizer("lat", whole_text);
        let latin = collaborators.tokenizer("lat").tokenize("Gallia est").unwrap();
        assert_eq!(latin[0].len(), 1);

        let norse = collaborators.tokenizer("non").tokenize("Gylfi konungr").unwrap();
        assert_eq!(norse[0].len(), 2);
    }

    #[test]
    fn test_closure_tagger() {
        let collaborators = Collaborators::new().with_tagger(
            "lat",
            TagField::Pos,
            |tokens: &[&str]| -> Result<Vec<String>, String> {
                Ok(tokens.iter().map(|_| "X".to_string()).collect())
            },
        );
        let tagger = collaborators.tagger("lat", TagField::Pos).unwrap();
        assert_eq!(tagger.tag(&["a", "b"]).unwrap(), vec!["X", "X"]);
        assert!(collaborators.tagger("lat", TagField::Lemma).is_none());
        assert!(collaborators.tagger("grc", TagField::Pos).is_none());
    }

    #[test]
    fn test_builtins() {
        let collaborators = Collaborators::with_builtins();
        assert!(collaborators.stops("lat").unwrap().is_stop("est"));
        assert!(collaborators.stops("grc").is_some());
        assert!(collaborators.stops("non").is_none());
        assert!(collaborators.parser("lat").is_none());
    }

    #[test]
    fn test_debug_lists_keys() {
        let collaborators = Collaborators::with_builtins()
            .with_parser("lat", |_: &str| -> Result<ParsedDocument, String> {
                Ok(ParsedDocument::default())
            });
        let debug = format!("{:?}", collaborators);
        assert!(debug.contains("parsers: [\"lat\"]"), "{}", debug);
        assert!(debug.contains("stops: [\"grc\", \"lat\"]"), "{}", debug);
    }
}
