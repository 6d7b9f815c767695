//! CoNLL-U reader
//!
//! Reads dependency parses in the CoNLL-U format into a [`ParsedDocument`],
//! so that parses produced elsewhere can be replayed through a pipeline.
//!
//! Grammar (over characters):
//!
//!     document := "\n"* (sentence ("\n"+ sentence)*)? "\n"*
//!     sentence := comment* row+
//!     comment  := "#" [^\n]* "\n"
//!     row      := cell ("\t" cell)* "\n"
//!     cell     := [^\t\n]+
//!
//! Rows must have the ten CoNLL-U columns. A multi-word token range (`1-2`)
//! becomes one token owning the words it spans; empty nodes (`1.1`) are
//! skipped. A `# text = ...` comment becomes the sentence text.

use super::DependencyParser;
use crate::translate::{ParsedDocument, ParsedSentence, ParsedToken, ParsedWord};
use chumsky::prelude::*;
use chumsky::primitive::filter;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

const COLUMNS: usize = 10;
const EMPTY: &str = "_";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConlluError {
    #[error("CoNLL-U syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Invalid CoNLL-U row on line {line}: {reason}")]
    Row { line: usize, reason: String },
}

type ParserError = Simple<char>;

struct RawSentence {
    text: Option<String>,
    rows: Vec<(Vec<String>, Range<usize>)>,
}

fn sentence_text(comment: &str) -> Option<String> {
    let rest = comment.trim().strip_prefix("text")?;
    let text = rest.trim_start().strip_prefix('=')?;
    Some(text.trim().to_string())
}

fn document() -> impl Parser<char, Vec<RawSentence>, Error = ParserError> {
    let cell = filter(|c: &char| *c != '\t' && *c != '\n')
        .repeated()
        .at_least(1)
        .collect::<String>();

    let comment = just('#')
        .ignore_then(filter(|c: &char| *c != '\n').repeated().collect::<String>())
        .then_ignore(just('\n'))
        .map(|body| sentence_text(&body));

    let row = cell
        .separated_by(just('\t'))
        .at_least(1)
        .map_with_span(|cells, span| (cells, span))
        .then_ignore(just('\n'));

    let sentence = comment
        .repeated()
        .then(row.repeated().at_least(1))
        .map(|(comments, rows)| RawSentence {
            text: comments.into_iter().flatten().last(),
            rows,
        });

    just('\n')
        .repeated()
        .ignore_then(
            sentence
                .separated_by(just('\n').repeated().at_least(1))
                .allow_trailing(),
        )
        .then_ignore(end())
}

/// Char offsets of line starts, for turning spans into line numbers.
struct Lines {
    newlines: Vec<usize>,
}

impl Lines {
    fn new(source: &str) -> Self {
        Lines {
            newlines: source
                .chars()
                .enumerate()
                .filter(|(_, c)| *c == '\n')
                .map(|(offset, _)| offset)
                .collect(),
        }
    }

    /// 1-based line holding char offset `offset`
    fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&newline| newline < offset) + 1
    }
}

fn parse_index(value: &str, column: &str) -> Result<usize, String> {
    value
        .parse::<usize>()
        .map_err(|_| format!("{} column '{}' is not a number", column, value))
}

fn optional(value: &str) -> Option<String> {
    (value != EMPTY).then(|| value.to_string())
}

/// What a single row contributes to its sentence
enum Row {
    /// `a-b`: one surface token spanning words `a` to `b`
    Range { first: usize, last: usize, form: String },
    Word(ParsedWord),
    /// `a.b`: empty nodes carry no token
    Empty,
}

fn row_from_cells(cells: &[String]) -> Result<Row, String> {
    if cells.len() != COLUMNS {
        return Err(format!(
            "expected {} tab-separated columns, found {}",
            COLUMNS,
            cells.len()
        ));
    }
    let id = cells[0].as_str();
    if id.contains('.') {
        return Ok(Row::Empty);
    }
    if let Some((first, last)) = id.split_once('-') {
        let first = parse_index(first, "ID")?;
        let last = parse_index(last, "ID")?;
        if first == 0 || last <= first {
            return Err(format!("ID range '{}' is not of the form a-b with 0 < a < b", id));
        }
        return Ok(Row::Range {
            first,
            last,
            form: cells[1].clone(),
        });
    }
    let index = parse_index(id, "ID")?;
    if index == 0 {
        return Err("ID column must start at 1".to_string());
    }
    let governor = parse_index(&cells[6], "HEAD")?;
    let upos = optional(&cells[3]);
    let xpos = optional(&cells[4]);

    Ok(Row::Word(ParsedWord {
        index,
        text: cells[1].clone(),
        lemma: optional(&cells[2]),
        pos: xpos.clone().or_else(|| upos.clone()),
        xpos,
        upos,
        feats: cells[5].clone(),
        governor,
        dependency_relation: optional(&cells[7]),
        parent_token_index: index,
    }))
}

/// Group a sentence's rows into tokens.
///
/// Words inside an open range join the range's token and take its first
/// index as their parent token; every other word is a token of its own.
fn tokens_from_rows(
    rows: &[(Vec<String>, Range<usize>)],
    lines: &Lines,
) -> Result<Vec<ParsedToken>, ConlluError> {
    let mut tokens: Vec<ParsedToken> = Vec::with_capacity(rows.len());
    // (last word index, line) of the range still collecting words
    let mut open: Option<(usize, usize)> = None;

    for (cells, span) in rows {
        let line = lines.line_of(span.start);
        let row = row_from_cells(cells).map_err(|reason| ConlluError::Row { line, reason })?;
        match row {
            Row::Empty => {}
            Row::Range { first, last, form } => {
                if let Some((_, opened)) = open {
                    return Err(ConlluError::Row {
                        line,
                        reason: format!("range opens before the range on line {} is complete", opened),
                    });
                }
                tokens.push(ParsedToken {
                    index: first,
                    text: form,
                    words: Vec::new(),
                });
                open = Some((last, line));
            }
            Row::Word(mut word) => match (open, tokens.last_mut()) {
                (Some((last, _)), Some(token)) if word.index <= last => {
                    word.parent_token_index = token.index;
                    token.words.push(word);
                    if word_closes(token, last) {
                        open = None;
                    }
                }
                _ => tokens.push(ParsedToken::single(word)),
            },
        }
    }

    if let Some((_, line)) = open {
        let incomplete = tokens.last().is_some_and(|token| token.words.is_empty());
        let reason = if incomplete {
            "range has no words".to_string()
        } else {
            "range ends before all of its words appear".to_string()
        };
        return Err(ConlluError::Row { line, reason });
    }
    Ok(tokens)
}

fn word_closes(token: &ParsedToken, last: usize) -> bool {
    token.words.last().is_some_and(|word| word.index == last)
}

/// Parse CoNLL-U source text.
pub fn parse_conllu(source: &str) -> Result<ParsedDocument, ConlluError> {
    let mut normalized = source.replace("\r\n", "\n");
    if !normalized.ends_with('\n') {
        normalized.push('\n');
    }
    let lines = Lines::new(&normalized);

    let raw = document().parse(normalized.as_str()).map_err(|errors| {
        let line = errors
            .first()
            .map(|error| lines.line_of(error.span().start))
            .unwrap_or(1);
        let message = errors
            .iter()
            .map(|error| error.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        ConlluError::Syntax { line, message }
    })?;

    let mut sentences = Vec::with_capacity(raw.len());
    for sentence in raw {
        let tokens = tokens_from_rows(&sentence.rows, &lines)?;
        sentences.push(ParsedSentence {
            text: sentence.text,
            tokens,
        });
    }

    debug!(sentences = sentences.len(), "read CoNLL-U document");
    Ok(ParsedDocument { sentences })
}

/// A dependency parser that replays a fixed CoNLL-U parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConlluParser {
    document: ParsedDocument,
}

impl ConlluParser {
    pub fn new(document: ParsedDocument) -> Self {
        ConlluParser { document }
    }

    pub fn document(&self) -> &ParsedDocument {
        &self.document
    }

    /// The text the parse covers: each sentence's `# text` comment, or its
    /// tokens joined by spaces, sentences joined by spaces.
    pub fn text(&self) -> String {
        self.document
            .sentences
            .iter()
            .map(|sentence| match &sentence.text {
                Some(text) => text.clone(),
                None => sentence
                    .tokens
                    .iter()
                    .map(|token| token.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for ConlluParser {
    type Err = ConlluError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        parse_conllu(source).map(ConlluParser::new)
    }
}

impl DependencyParser for ConlluParser {
    fn parse(&self, _text: &str) -> Result<ParsedDocument, String> {
        Ok(self.document.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GALLIA: &str = "\
# sent_id = caes-1
# text = Gallia est omnis divisa
1\tGallia\tGallia\tPROPN\tA1|grn1|casA|gen2\tCase=Nom|Gender=Fem|Number=Sing\t4\tnsubj\t_\t_
2\test\tsum\tAUX\tN3|modA|tem1|gen6\tMood=Ind|Number=Sing|Person=3\t4\tcop\t_\t_
3\tomnis\tomnis\tDET\tA1|grn1|casA|gen2\tCase=Nom|Gender=Fem|Number=Sing\t4\tdet\t_\t_
4\tdivisa\tdivido\tVERB\tL2|casA|gen2\tCase=Nom|Gender=Fem|VerbForm=Part\t0\troot\t_\t_

# text = Hi differunt
1\tHi\thic\tDET\t_\t_\t2\tnsubj\t_\t_
2\tdifferunt\tdiffero\tVERB\t_\t_\t0\troot\t_\t_
";

    #[test]
    fn test_parse_sentences_and_words() {
        let document = parse_conllu(GALLIA).unwrap();
        assert_eq!(document.sentences.len(), 2);

        let first = &document.sentences[0];
        assert_eq!(first.text.as_deref(), Some("Gallia est omnis divisa"));
        assert_eq!(first.tokens.len(), 4);

        let gallia = &first.tokens[0].words[0];
        assert_eq!(gallia.index, 1);
        assert_eq!(gallia.text, "Gallia");
        assert_eq!(gallia.lemma.as_deref(), Some("Gallia"));
        assert_eq!(gallia.upos.as_deref(), Some("PROPN"));
        assert_eq!(gallia.pos.as_deref(), Some("A1|grn1|casA|gen2"));
        assert_eq!(gallia.governor, 4);
        assert_eq!(gallia.dependency_relation.as_deref(), Some("nsubj"));

        let hi = &document.sentences[1].tokens[0].words[0];
        assert_eq!(hi.xpos, None);
        assert_eq!(hi.pos.as_deref(), Some("DET"));
        assert_eq!(hi.feats, "_");
    }

    #[test]
    fn test_range_becomes_one_token() {
        let source = "\
# text = vámonos ya
1-2\tvámonos\t_\t_\t_\t_\t_\t_\t_\t_
1\tvamos\tir\tVERB\t_\t_\t0\troot\t_\t_
2\tnos\tnosotros\tPRON\t_\t_\t1\tobj\t_\t_
2.1\tnos\t_\t_\t_\t_\t_\t_\t_\t_
3\tya\tya\tADV\t_\t_\t1\tadvmod\t_\t_
";
        let document = parse_conllu(source).unwrap();
        let tokens = &document.sentences[0].tokens;
        let shape: Vec<_> = tokens
            .iter()
            .map(|t| (t.index, t.text.as_str(), t.words.len()))
            .collect();
        assert_eq!(shape, vec![(1, "vámonos", 2), (3, "ya", 1)]);
        assert_eq!(tokens[0].words[1].text, "nos");
        assert_eq!(tokens[0].words[1].parent_token_index, 1);
        assert_eq!(tokens[1].words[0].parent_token_index, 3);
    }

    #[test]
    fn test_range_without_words_is_an_error() {
        let source = "1-2\tnobiscum\t_\t_\t_\t_\t_\t_\t_\t_\n";
        assert_eq!(
            parse_conllu(source),
            Err(ConlluError::Row {
                line: 1,
                reason: "range has no words".to_string()
            })
        );
        assert!(matches!(
            parse_conllu("2-1\tx\t_\t_\t_\t_\t_\t_\t_\t_\n"),
            Err(ConlluError::Row { line: 1, .. })
        ));
    }

    #[test]
    fn test_missing_trailing_newline_and_crlf() {
        let source = "1\tveni\tvenio\tVERB\t_\t_\t0\troot\t_\t_\r\n2\tvidi\tvideo\tVERB\t_\t_\t1\tconj\t_\t_";
        let document = parse_conllu(source).unwrap();
        assert_eq!(document.sentences[0].tokens.len(), 2);
        assert_eq!(document.sentences[0].tokens[1].text, "vidi");
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_conllu("").unwrap().sentences.is_empty());
        assert!(parse_conllu("\n\n").unwrap().sentences.is_empty());
    }

    #[test]
    fn test_wrong_column_count_reports_line() {
        let source = "# text = veni\n1\tveni\tvenio\tVERB\n";
        assert_eq!(
            parse_conllu(source),
            Err(ConlluError::Row {
                line: 2,
                reason: "expected 10 tab-separated columns, found 4".to_string()
            })
        );
    }

    #[test]
    fn test_bad_head_is_an_error() {
        let source = "1\tveni\tvenio\tVERB\t_\t_\tX\troot\t_\t_\n";
        let err = parse_conllu(source).unwrap_err();
        assert!(err.to_string().contains("HEAD column 'X'"), "{}", err);
    }

    #[test]
    fn test_empty_cell_is_a_syntax_error() {
        let source = "1\t\tvenio\tVERB\t_\t_\t0\troot\t_\t_\n";
        assert!(matches!(
            parse_conllu(source),
            Err(ConlluError::Syntax { .. })
        ));
    }

    #[test]
    fn test_parser_replays_document() {
        let parser: ConlluParser = GALLIA.parse().unwrap();
        assert_eq!(parser.text(), "Gallia est omnis divisa Hi differunt");
        assert_eq!(
            DependencyParser::parse(&parser, "anything").unwrap(),
            *parser.document()
        );
    }
}
