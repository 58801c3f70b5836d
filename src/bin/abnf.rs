//! Command-line interface for abnf
//! This binary compiles a grammar file and tests input against it.
//!
//! Usage:
//!   abnf `<path>` --input `<text>` [--rule `<entry>`] [--format `<format>`]  - Match input against the grammar
//!   abnf `<path>` --input-file `<file>`                                  - Same, reading the input from a file
//!   abnf `<path>` --list-rules                                         - List the rules the grammar defines

use clap::{Arg, ArgAction, Command};
use serde::Serialize;

use abnf::abnf::diagnostics;

/// Match report emitted by the `--input` path.
#[derive(Serialize)]
struct MatchReport {
    rule: String,
    input_length: usize,
    matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<usize>,
}

fn main() {
    let matches = Command::new("abnf")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile an ABNF grammar and match input against it")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the grammar file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("rule")
                .long("rule")
                .short('r')
                .help("Entry rule name (default: first rule in the grammar)"),
        )
        .arg(
            Arg::new("input")
                .long("input")
                .short('i')
                .help("Input text to match")
                .conflicts_with("input-file"),
        )
        .arg(
            Arg::new("input-file")
                .long("input-file")
                .help("Read the input text from a file"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: text, json, or yaml")
                .default_value("text"),
        )
        .arg(
            Arg::new("list-rules")
                .long("list-rules")
                .help("List the rules the grammar defines")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let path = matches.get_one::<String>("path").expect("path is required");
    let entry = matches.get_one::<String>("rule").map(String::as_str);
    let format = matches.get_one::<String>("format").expect("has default");

    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read '{}': {}", path, e);
        std::process::exit(1);
    });

    let grammar = abnf::compile_source(&text, path, entry).unwrap_or_else(|e| {
        eprint!("{}", diagnostics::render_compile_error(path, &text, &e));
        std::process::exit(1);
    });

    if matches.get_flag("list-rules") {
        handle_list_rules(&grammar, format);
        return;
    }

    let input = match (
        matches.get_one::<String>("input"),
        matches.get_one::<String>("input-file"),
    ) {
        (Some(input), _) => input.clone(),
        (None, Some(file)) => std::fs::read_to_string(file).unwrap_or_else(|e| {
            eprintln!("Cannot read '{}': {}", file, e);
            std::process::exit(1);
        }),
        (None, None) => {
            eprintln!("Nothing to do: pass --input, --input-file, or --list-rules");
            std::process::exit(1);
        }
    };

    handle_match(&grammar, &input, format);
}

/// Handle the match command
fn handle_match(grammar: &abnf::Grammar, input: &str, format: &str) {
    let length = grammar.test(input);
    let report = MatchReport {
        rule: grammar.entry_name().to_string(),
        input_length: input.chars().count(),
        matched: length.is_some(),
        length,
    };

    match format {
        "json" => println!("{}", to_json(&report)),
        "yaml" => print!("{}", to_yaml(&report)),
        _ => match length {
            Some(length) => println!(
                "matched {} of {} characters against '{}'",
                length, report.input_length, report.rule
            ),
            None => {
                println!("no match against '{}'", report.rule);
                std::process::exit(2);
            }
        },
    }

    if length.is_none() && format != "text" {
        std::process::exit(2);
    }
}

/// Handle the list-rules command
fn handle_list_rules(grammar: &abnf::Grammar, format: &str) {
    let rules = grammar.rule_infos();
    match format {
        "json" => println!("{}", to_json(&rules)),
        "yaml" => print!("{}", to_yaml(&rules)),
        _ => {
            for rule in &rules {
                println!("{:4}  {}", rule.line, rule.name);
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error formatting output: {}", e);
        std::process::exit(1);
    })
}

fn to_yaml<T: Serialize>(value: &T) -> String {
    serde_yaml::to_string(value).unwrap_or_else(|e| {
        eprintln!("Error formatting output: {}", e);
        std::process::exit(1);
    })
}
