//! Whatalang CLI - runs `.wa` / `.what` programs.
//!
//! Input resolution: a positional argument is tried as a file path
//! (with the `.wa` and `.what` extensions as fallbacks); when no such
//! file exists it is treated as inline source, same as `--eval`.

use std::path::Path;
use std::process;

use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use wa_lexer::Lexer;
use wa_runtime::execute;

#[derive(Parser)]
#[command(
    name = "whatalang",
    about = "Whatalang - a reactive programming language",
    version
)]
struct Cli {
    /// Source file (.wa or .what), or inline source code
    input: Option<String>,

    /// Execute source code directly
    #[arg(short, long, value_name = "SOURCE")]
    eval: Option<String>,

    /// Echo the source and show the final state
    #[arg(short, long)]
    verbose: bool,

    /// Dump the token stream before execution
    #[arg(long)]
    tokens: bool,

    /// Dump the parsed AST before execution
    #[arg(long)]
    ast: bool,

    /// Emit the execution report as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let source = match load_source(&cli) {
        Ok(Some(source)) => source,
        Ok(None) => {
            // No input at all: show usage.
            let _ = Cli::command().print_help();
            return;
        }
        Err(message) => {
            eprintln!("error: {message}");
            process::exit(1);
        }
    };

    if let Err(message) = run(&cli, &source) {
        eprintln!("error: {message}");
        process::exit(1);
    }
}

/// Resolve the program source from `--eval` or the positional input.
fn load_source(cli: &Cli) -> Result<Option<String>, String> {
    if let Some(source) = &cli.eval {
        return Ok(Some(source.clone()));
    }
    let Some(input) = &cli.input else {
        return Ok(None);
    };
    for ext in ["", ".wa", ".what"] {
        let candidate = format!("{input}{ext}");
        if Path::new(&candidate).is_file() {
            let source = std::fs::read_to_string(&candidate)
                .map_err(|e| format!("cannot read '{candidate}': {e}"))?;
            return Ok(Some(source));
        }
    }
    // Not a file; run it as inline source.
    Ok(Some(input.clone()))
}

/// Lex, parse and execute, honoring the dump flags.
fn run(cli: &Cli, source: &str) -> Result<(), String> {
    if cli.verbose {
        for (i, line) in source.lines().enumerate() {
            eprintln!("{:3} | {line}", i + 1);
        }
    }

    let tokens = Lexer::new(source).lex().map_err(|e| e.to_string())?;
    debug!(tokens = tokens.len(), "lexed");
    if cli.tokens {
        for token in &tokens {
            println!("{} {:?}", token.span, token.kind);
        }
    }

    let program = wa_parser::Parser::new(tokens)
        .parse()
        .map_err(|e| e.to_string())?;
    debug!(statements = program.statements.len(), "parsed");
    if cli.ast {
        println!("{program:#?}");
    }

    let report = execute(&program).map_err(|e| e.to_string())?;

    if cli.json {
        let json = serde_json::json!({
            "output": report.output,
            "state": report.state,
        });
        let rendered = serde_json::to_string_pretty(&json).map_err(|e| e.to_string())?;
        println!("{rendered}");
    } else {
        for line in &report.output {
            println!("{line}");
        }
    }

    if cli.verbose {
        eprintln!("final state: {}", report.state);
    }
    Ok(())
}
