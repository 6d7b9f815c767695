//! Language-agnostic tokenizer
//!
//! Used by the default pipeline and by any language without a dedicated
//! tokenizer. Tokenization is done entirely by a logos lexer:
//! - runs of whitespace separate tokens and are dropped
//! - runs of sentence-final marks (`.` `!` `?`, the Greek question mark and
//!   the ano teleia) form one token and close the current sentence
//! - other punctuation becomes a single-character token
//! - everything else is a word
//!
//! Offsets are byte offsets into the input, so every span slices back to its
//! token text.

use super::{TokenSpan, Tokenizer};
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"\s+")]
enum Lexeme {
    #[regex(r"[.!?\x{37E}\x{387}\x{B7}]+")]
    SentenceEnd,

    #[regex(r#"[,:;"()\[\]\x{AB}\x{BB}\x{201C}\x{201D}\x{201E}\x{2013}\x{2014}]"#)]
    Punctuation,

    #[regex(r#"[^\s.!?\x{37E}\x{387}\x{B7},:;"()\[\]\x{AB}\x{BB}\x{201C}\x{201D}\x{201E}\x{2013}\x{2014}]+"#)]
    Word,
}

/// Split `source` into sentences of tokens.
pub fn tokenize(source: &str) -> Vec<Vec<TokenSpan>> {
    let mut lexer = Lexeme::lexer(source);
    let mut sentences = Vec::new();
    let mut current = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(lexeme) = result {
            let span = lexer.span();
            current.push(TokenSpan::new(lexer.slice(), span.start, span.end));
            if lexeme == Lexeme::SentenceEnd {
                sentences.push(std::mem::take(&mut current));
            }
        }
    }
    if !current.is_empty() {
        sentences.push(current);
    }

    sentences
}

/// [`tokenize`] as a collaborator
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTokenizer;

impl Tokenizer for BuiltinTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Vec<TokenSpan>>, String> {
        Ok(tokenize(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sentences: &[Vec<TokenSpan>]) -> Vec<Vec<&str>> {
        sentences
            .iter()
            .map(|s| s.iter().map(|t| t.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_latin_sentence() {
        let sentences = tokenize("Gallia est omnis divisa in partes tres, quarum unam incolunt Belgae.");
        assert_eq!(
            texts(&sentences),
            vec![vec![
                "Gallia", "est", "omnis", "divisa", "in", "partes", "tres", ",", "quarum", "unam",
                "incolunt", "Belgae", "."
            ]]
        );
    }

    #[test]
    fn test_sentence_boundaries() {
        let sentences = tokenize("Veni. Vidi! Vici");
        assert_eq!(
            texts(&sentences),
            vec![vec!["Veni", "."], vec!["Vidi", "!"], vec!["Vici"]]
        );
    }

    #[test]
    fn test_greek_question_mark_and_ano_teleia() {
        let sentences = tokenize("τί ἐστιν\u{37E} οὐδέν\u{387} πάντα");
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[0][1].text, "ἐστιν");
        assert_eq!(sentences[0][2].text, "\u{37E}");
    }

    #[test]
    fn test_spans_slice_the_source() {
        let source = "Gylfi konungr réð þar löndum, er nú heitir Svíþjóð.";
        for token in tokenize(source).iter().flatten() {
            assert_eq!(&source[token.char_start..token.char_stop], token.text);
        }
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t").is_empty());
    }

    #[test]
    fn test_elision_stays_in_word() {
        let sentences = tokenize("l'armée");
        assert_eq!(texts(&sentences), vec![vec!["l'armée"]]);
    }
}
