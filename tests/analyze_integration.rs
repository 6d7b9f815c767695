//! Integration tests for the analyze entry point
//!
//! These tests validate that:
//! 1. Every known language either resolves to a pipeline for itself or fails
//!    with a language error
//! 2. Tokenizing pipelines produce consistent words on real sentences
//! 3. Parse pipelines without a registered parser fail cleanly

use antiqua::collaborators::TagField;
use antiqua::language;
use antiqua::pipeline::ProcessSpec;
use antiqua::settings::Loader;
use antiqua::{analyze, AnalysisError, Analyzer, Collaborators, PipelineRegistry};
use rstest::rstest;
use std::collections::HashSet;

#[test]
fn test_every_known_language_resolves_to_itself() {
    let registry = PipelineRegistry::with_defaults();
    let collaborators = Collaborators::with_builtins();

    for language in language::all() {
        match registry.resolve(language.code, &collaborators) {
            Ok(pipeline) => {
                assert_eq!(pipeline.language().code, language.code);
                assert!(!pipeline.is_empty());
            }
            Err(AnalysisError::UnimplementedLanguage { code }) => {
                assert_eq!(code, language.code);
                assert!(!language.word_delimited);
            }
            Err(other) => panic!("unexpected error for {}: {}", language.code, other),
        }
    }
}

#[rstest]
#[case("akk")]
#[case("ang")]
#[case("arb")]
#[case("arc")]
#[case("enm")]
#[case("frm")]
#[case("gmh")]
#[case("hin")]
#[case("non")]
#[case("pan")]
#[case("pli")]
#[case("san")]
#[case("goh")]
#[case("xcl")]
fn test_tokenizing_languages(#[case] code: &str) {
    let document = analyze(code, "alpha beta gamma. delta epsilon").unwrap();
    assert_eq!(document.language_code, code);
    assert_eq!(document.sentences().len(), 2);
    assert_eq!(
        document.sentences_tokens(),
        vec![vec!["alpha", "beta", "gamma", "."], vec!["delta", "epsilon"]]
    );
}

#[rstest]
#[case("lat")]
#[case("grc")]
#[case("chu")]
#[case("fro")]
#[case("got")]
fn test_parse_languages_need_a_parser(#[case] code: &str) {
    match analyze(code, "text") {
        Err(AnalysisError::AlgorithmUnavailable { process, .. }) => {
            assert_eq!(process, format!("{}:parse", code));
        }
        other => panic!("expected AlgorithmUnavailable, got {:?}", other),
    }
}

#[rstest]
#[case("lzh")]
#[case("egy")]
#[case("gmy")]
#[case("ojp")]
fn test_unimplemented_languages(#[case] code: &str) {
    assert_eq!(
        analyze(code, "text").unwrap_err(),
        AnalysisError::UnimplementedLanguage {
            code: code.to_string()
        }
    );
}

#[rstest]
#[case("xyz-unknown")]
#[case("")]
#[case("LAT")]
#[case("la")]
#[case("latin")]
#[case("zzz")]
fn test_unknown_languages(#[case] code: &str) {
    assert_eq!(
        analyze(code, "text").unwrap_err(),
        AnalysisError::UnknownLanguage {
            code: code.to_string()
        }
    );
}

#[rstest]
#[case("non", "Gylfi konungr réð þar löndum, er nú heitir Svíþjóð. Frá honum er þat sagt.")]
#[case("ang", "Hwæt! We Gardena in geardagum þeodcyninga þrym gefrunon.")]
#[case("enm", "Whan that Aprill with his shoures soote the droghte of March hath perced to the roote.")]
#[case("san", "धर्मक्षेत्रे कुरुक्षेत्रे समवेता युयुत्सवः")]
fn test_word_invariants_hold(#[case] code: &str, #[case] text: &str) {
    let document = analyze(code, text).unwrap();
    assert_eq!(document.raw_text, text);
    assert!(!document.words.is_empty());

    for sentence in document.sentences() {
        let indices: HashSet<_> = sentence.iter().map(|w| w.token_index).collect();
        assert_eq!(indices.len(), sentence.len());
    }
    for word in &document.words {
        let (start, stop) = (word.char_start.unwrap(), word.char_stop.unwrap());
        assert_eq!(&text[start..stop], word.string);
    }
}

#[test]
fn test_analyze_is_repeatable() {
    let text = "Gylfi konungr réð þar löndum.";
    assert_eq!(analyze("non", text).unwrap(), analyze("non", text).unwrap());
}

#[test]
fn test_fallback_can_be_disabled_in_settings() {
    let settings = Loader::new()
        .set_override("pipeline.fallback_to_default", false)
        .unwrap()
        .build()
        .unwrap();
    let collaborators = Collaborators::with_builtins();
    assert!(matches!(
        Analyzer::with_settings("goh", &settings, &collaborators),
        Err(AnalysisError::UnimplementedLanguage { .. })
    ));
    assert!(Analyzer::with_settings("non", &settings, &collaborators).is_ok());
}

#[test]
fn test_configured_pipeline_with_injected_taggers() {
    let settings = Loader::new()
        .with_toml("[pipelines]\nnon = [\"tokenize\", \"lemmatize\", \"tag-pos\"]\n")
        .build()
        .unwrap();
    let collaborators = Collaborators::with_builtins()
        .with_tagger(
            "non",
            TagField::Lemma,
            |tokens: &[&str]| -> Result<Vec<String>, String> {
                Ok(tokens.iter().map(|t| t.to_lowercase()).collect())
            },
        )
        .with_tagger(
            "non",
            TagField::Pos,
            |tokens: &[&str]| -> Result<Vec<String>, String> {
                Ok(tokens
                    .iter()
                    .map(|t| if *t == "." { "PUNCT" } else { "X" }.to_string())
                    .collect())
            },
        );

    let analyzer = Analyzer::with_settings("non", &settings, &collaborators).unwrap();
    assert_eq!(
        analyzer.pipeline().process_names(),
        vec!["non:tokenize", "non:lemmatize", "non:tag-pos"]
    );

    let document = analyzer.analyze("Gylfi konungr.").unwrap();
    assert_eq!(
        document.lemmata(),
        vec![Some("gylfi"), Some("konungr"), Some(".")]
    );
    assert_eq!(document.pos(), vec![Some("X"), Some("X"), Some("PUNCT")]);
}

#[test]
fn test_missing_tagger_surfaces_as_unavailable() {
    let mut registry = PipelineRegistry::with_defaults();
    registry.register(antiqua::pipeline::PipelineConfig::new(
        "ang",
        "tokens and tags",
        vec![ProcessSpec::Tokenize, ProcessSpec::TagPos],
    ));
    let analyzer =
        Analyzer::with_registry("ang", &registry, &Collaborators::with_builtins()).unwrap();
    assert!(matches!(
        analyzer.analyze("Hwæt"),
        Err(AnalysisError::AlgorithmUnavailable { .. })
    ));
}
