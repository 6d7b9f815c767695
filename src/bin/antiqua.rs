//! Command-line interface for antiqua
//! Annotates text in historical languages and prints words, trees or serialized documents.
//!
//! Usage:
//!   antiqua analyze --lang `<code>` [`<path>` | --text `<text>`] [--conllu `<file>`] [--format `<format>`]
//!   antiqua tree `<conllu file>` [--all-features]                - Print dependency trees
//!   antiqua languages                                          - List known languages
//!   antiqua pipelines                                          - List pipeline configurations

use antiqua::collaborators::{parse_conllu, ConlluParser};
use antiqua::settings::{Loader, OutputFormat, Settings};
use antiqua::translate::to_words;
use antiqua::{language, Analyzer, Collaborators, Document, PipelineRegistry};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("antiqua")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Annotation pipelines and dependency trees for historical languages")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Settings file layered over the built-in defaults"),
        )
        .subcommand(
            Command::new("analyze")
                .about("Run a language's pipeline over text")
                .arg(
                    Arg::new("lang")
                        .long("lang")
                        .short('l')
                        .required(true)
                        .help("ISO 639-3 language code (e.g., 'lat', 'grc', 'non')"),
                )
                .arg(
                    Arg::new("path")
                        .help("File holding the text to analyze")
                        .index(1)
                        .conflicts_with("text"),
                )
                .arg(
                    Arg::new("text")
                        .long("text")
                        .short('t')
                        .help("Text to analyze"),
                )
                .arg(
                    Arg::new("conllu")
                        .long("conllu")
                        .help("CoNLL-U file to use as the language's dependency parse"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format: words, json, yaml, tree, treeviz"),
                )
                .arg(
                    Arg::new("all-features")
                        .long("all-features")
                        .help("Show every feature on tree nodes")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the dependency trees of a CoNLL-U file")
                .arg(
                    Arg::new("path")
                        .help("Path to the CoNLL-U file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("all-features")
                        .long("all-features")
                        .help("Show every feature on tree nodes")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("languages").about("List known languages"))
        .subcommand(Command::new("pipelines").about("List pipeline configurations"))
        .get_matches();

    let settings = load_settings(&matches);

    match matches.subcommand() {
        Some(("analyze", sub)) => handle_analyze_command(sub, &settings),
        Some(("tree", sub)) => handle_tree_command(sub, &settings),
        Some(("languages", _)) => handle_languages_command(),
        Some(("pipelines", _)) => handle_pipelines_command(&settings),
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| fail(format!("Cannot read '{}': {}", path, e)))
}

/// Defaults, then `--config`, then the output flags of the subcommand
fn load_settings(matches: &ArgMatches) -> Settings {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }

    if let Some((_, sub)) = matches.subcommand() {
        if let Ok(Some(format)) = sub.try_get_one::<String>("format") {
            let format: OutputFormat = format.parse().unwrap_or_else(|e: String| fail(e));
            loader = loader
                .set_override("output.format", format.as_str())
                .unwrap_or_else(|e| fail(e));
        }
        if let Ok(Some(true)) = sub.try_get_one::<bool>("all-features").map(|v| v.copied()) {
            loader = loader
                .set_override("tree.show_all_features", true)
                .unwrap_or_else(|e| fail(e));
        }
    }

    loader
        .build()
        .unwrap_or_else(|e| fail(format!("Invalid settings: {}", e)))
}

/// Handle the analyze command
fn handle_analyze_command(matches: &ArgMatches, settings: &Settings) {
    let code = matches
        .get_one::<String>("lang")
        .expect("lang is a required argument");

    let mut collaborators = Collaborators::with_builtins();
    let mut conllu_text = None;
    if let Some(path) = matches.get_one::<String>("conllu") {
        let parser: ConlluParser = read_file(path)
            .parse()
            .unwrap_or_else(|e| fail(format!("{}: {}", path, e)));
        conllu_text = Some(parser.text());
        collaborators = collaborators.with_parser(code, parser);
    }

    let text = match (
        matches.get_one::<String>("text"),
        matches.get_one::<String>("path"),
    ) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_file(path),
        (None, None) => conllu_text
            .unwrap_or_else(|| fail("Provide text with --text, a file path, or --conllu")),
    };

    let analyzer = Analyzer::with_settings(code, settings, &collaborators).unwrap_or_else(|e| fail(e));
    let document = analyzer.analyze(&text).unwrap_or_else(|e| fail(e));
    print!("{}", format_document(document, settings));
}

/// Handle the tree command
fn handle_tree_command(matches: &ArgMatches, settings: &Settings) {
    let path = matches
        .get_one::<String>("path")
        .expect("path is a required argument");
    let parsed = parse_conllu(&read_file(path)).unwrap_or_else(|e| fail(format!("{}: {}", path, e)));
    let text = ConlluParser::new(parsed.clone()).text();

    let mut document = Document::new("und", text);
    document.words = to_words(&parsed, "conllu").unwrap_or_else(|e| fail(e));

    let format = match settings.output.format {
        OutputFormat::Treeviz => OutputFormat::Treeviz,
        _ => OutputFormat::Tree,
    };
    print!("{}", render_trees(&mut document, format, settings.tree.show_all_features));
}

/// Handle the languages command
fn handle_languages_command() {
    println!("Known languages:\n");
    for language in language::all() {
        let delimited = if language.word_delimited { "" } else { " (not word-delimited)" };
        println!(
            "  {}  {} [{}]{}",
            language.code,
            language.name,
            language.epoch.as_str(),
            delimited
        );
    }
}

/// Handle the pipelines command
fn handle_pipelines_command(settings: &Settings) {
    let mut registry = PipelineRegistry::with_defaults();
    registry.apply_settings(settings).unwrap_or_else(|e| fail(e));

    println!("Pipeline configurations:\n");
    for config in registry.list_all() {
        println!("  {}", config.name);
        println!("    {}: {}", config.description, config.steps_str());
        println!();
    }

    let default = registry.default_config();
    let fallback = if registry.fallback_to_default() {
        "used for word-delimited languages without their own pipeline"
    } else {
        "disabled"
    };
    println!("  {} ({})", default.name, fallback);
    println!("    {}: {}", default.description, default.steps_str());
}

fn format_document(mut document: Document, settings: &Settings) -> String {
    match settings.output.format {
        OutputFormat::Words => format_words(&document),
        OutputFormat::Json => serde_json::to_string_pretty(&document)
            .map(|json| json + "\n")
            .unwrap_or_else(|e| fail(format!("Error formatting document: {}", e))),
        OutputFormat::Yaml => serde_yaml::to_string(&document)
            .unwrap_or_else(|e| fail(format!("Error formatting document: {}", e))),
        format @ (OutputFormat::Tree | OutputFormat::Treeviz) => {
            render_trees(&mut document, format, settings.tree.show_all_features)
        }
    }
}

/// One word per line: sentence, token, string, lemma, pos, relation, governor, stop
fn format_words(document: &Document) -> String {
    fn or_blank(value: Option<&str>) -> &str {
        value.unwrap_or("_")
    }

    let mut result = String::new();
    for word in &document.words {
        let governor = word
            .governor
            .map(|g| g.to_string())
            .unwrap_or_else(|| "_".to_string());
        let stop = match word.stop {
            Some(true) => "stop",
            Some(false) => "-",
            None => "_",
        };
        let pos = word.upos.as_deref().or(word.part_of_speech.as_deref());
        result.push_str(&format!(
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
            word.sentence_index,
            word.token_index,
            word.string,
            or_blank(word.lemma.as_deref()),
            or_blank(pos),
            or_blank(word.dependency_relation.as_deref()),
            governor,
            stop
        ));
    }
    result
}

fn render_trees(document: &mut Document, format: OutputFormat, show_all_features: bool) -> String {
    let trees = document
        .build_trees()
        .unwrap_or_else(|e| fail(format!("Cannot build dependency trees: {}", e)));
    trees
        .iter()
        .map(|tree| match format {
            OutputFormat::Treeviz => antiqua::tree::to_treeviz_str(tree),
            _ => tree.render(show_all_features),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
