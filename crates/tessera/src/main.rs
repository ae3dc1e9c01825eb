//! Tessera - An atomic CSS compiler
//!
//! Usage: tessera <definitions.json> [--resolve <refs>]

mod loader;

use std::env;
use std::fs;
use std::process::ExitCode;

use tessera_css::Scalar;
use tessera_style::{ClassRef, StyleResult};

use loader::{load, LoadError};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("tessera");

    if args.len() < 2 {
        print_usage(program);
        return ExitCode::FAILURE;
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_usage(program);
            ExitCode::SUCCESS
        }
        "--version" | "-V" => {
            println!("Tessera {}", VERSION);
            ExitCode::SUCCESS
        }
        path => {
            let refs = match args.get(2).map(String::as_str) {
                None => None,
                Some("--resolve") => match args.get(3) {
                    Some(refs) => Some(refs.as_str()),
                    None => {
                        eprintln!("Usage: {} <PATH> --resolve <REFS>", program);
                        return ExitCode::FAILURE;
                    }
                },
                Some(other) => {
                    eprintln!("Unknown option: {}", other);
                    return ExitCode::FAILURE;
                }
            };

            if let Err(e) = run(path, refs) {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

fn print_usage(program: &str) {
    println!(
        r#"Tessera {} - An atomic CSS compiler

USAGE:
    {} [OPTIONS] <PATH>

OPTIONS:
    -h, --help          Print this help message
    -V, --version       Print version information
    --resolve <REFS>    After compiling, merge a comma-separated list of refs
                        (name, name(arg, ...), theme:namespace.name)

EXAMPLES:
    {} styles.json
    {} styles.json --resolve "button, fade(0.5), theme:colors.dark"

"#,
        VERSION, program, program, program
    );
}

/// Compile a definitions file, print its CSS and optionally resolve refs
fn run(path: &str, refs: Option<&str>) -> Result<(), LoadError> {
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })?;
    let (config, sheet) = load(&source, path)?;
    let styles = sheet.compile(&config)?;

    for warning in styles.warnings() {
        eprintln!("warning: {}", warning);
    }
    println!("{}", styles.css());

    if let Some(refs) = refs {
        let refs = parse_refs(refs)?;
        let resolved = styles.resolve(&refs)?;
        println!();
        println!("class: {}", resolved.class_string);
        if let Some(style) = resolved.inline_style {
            println!("style: {}", style);
        }
    }
    Ok(())
}

/// Parse `a, fade(0.5), theme:colors.dark`
fn parse_refs(input: &str) -> StyleResult<Vec<ClassRef>> {
    split_top_level(input)
        .into_iter()
        .filter(|part| !part.is_empty())
        .map(parse_ref)
        .collect()
}

fn parse_ref(text: &str) -> StyleResult<ClassRef> {
    if let Some(theme) = text.strip_prefix("theme:") {
        let (namespace, name) = theme
            .split_once('.')
            .ok_or_else(|| tessera_style::StyleError::resolve(text, "expected theme:namespace.name"))?;
        return Ok(ClassRef::theme(namespace, name));
    }

    match text.split_once('(') {
        Some((name, rest)) => {
            let args = rest
                .strip_suffix(')')
                .ok_or_else(|| tessera_style::StyleError::resolve(text, "missing ')'"))?;
            let args: Vec<Scalar> = split_top_level(args)
                .into_iter()
                .map(|arg| match arg.parse::<f64>() {
                    Ok(n) => Scalar::Number(n),
                    Err(_) => Scalar::Str(arg.to_string()),
                })
                .collect();
            Ok(ClassRef::Dynamic(name.trim().to_string(), args))
        }
        None => Ok(ClassRef::from(text)),
    }
}

/// Split on commas outside parentheses, trimming each part
fn split_top_level(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(input[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(input[start..].trim());
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_refs() {
        let refs = parse_refs("button, fade(0.5, red), theme:colors.dark").unwrap();
        assert_eq!(
            refs,
            vec![
                ClassRef::from("button"),
                ClassRef::Dynamic("fade".into(), vec![Scalar::Number(0.5), Scalar::Str("red".into())]),
                ClassRef::theme("colors", "dark"),
            ]
        );
    }

    #[test]
    fn test_parse_ref_errors() {
        assert!(parse_ref("theme:colors").is_err());
        assert!(parse_ref("fade(0.5").is_err());
    }
}
