//! CLI entry point: a REPL when run with no arguments, a file runner when
//! given a source path.

use std::error::Error as StdError;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser as ClapParser;
use log::{info, warn};
use simpl::object::{Environment, Object};
use simpl::EvalOutcome;

#[derive(Debug, ClapParser)]
#[command(author, version, about = "Lexer, Pratt parser, and tree-walking evaluator for Simpl")]
struct Cli {
    /// Path to a Simpl source file. Omit to start the REPL.
    file: Option<PathBuf>,
}

/// Wraps an I/O failure at the file-runner boundary. The interpreter's own
/// error surface stays exactly `Object::Error` values and a parser error
/// list; this type exists only for "the file could not be read at all".
#[derive(Debug)]
struct FileLoadError {
    path: PathBuf,
    source: io::Error,
}

impl fmt::Display for FileLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not read '{}': {}", self.path.display(), self.source)
    }
}

impl StdError for FileLoadError {}

fn main() {
    simple_logger::init_with_level(log::Level::Warn).expect("logger already initialized");
    let cli = Cli::parse();

    let result = match cli.file {
        Some(path) => run_file(path),
        None => {
            run_repl();
            Ok(())
        }
    };

    if let Err(error) = result {
        warn!("{error}");
        std::process::exit(1);
    }
}

fn run_file(path: PathBuf) -> Result<(), FileLoadError> {
    let contents = std::fs::read_to_string(&path).map_err(|source| FileLoadError { path, source })?;

    // Concatenate every line with its line break removed before handing the
    // buffer to the lexer.
    let buffer: String = contents.lines().collect();

    let env = Environment::new();
    match simpl::eval_source(&buffer, &env) {
        EvalOutcome::ParseErrors(errors) => print_parser_errors(&errors),
        EvalOutcome::Value(value) => println!("{}", value.inspect()),
    }

    Ok(())
}

fn print_parser_errors(errors: &[String]) {
    println!("Errors:");
    for (i, message) in errors.iter().enumerate() {
        println!("\t{}: {message}", i + 1);
    }
}

fn run_repl() {
    info!("starting Simpl REPL");
    println!("Welcome to Simpl!");
    println!("Write your code below");

    let env = Environment::new();
    let stdin = io::stdin();

    loop {
        print!(">> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        let bytes_read = match stdin.read_line(&mut line) {
            Ok(bytes_read) => bytes_read,
            Err(error) => {
                warn!("failed to read from stdin: {error}");
                break;
            }
        };
        if bytes_read == 0 {
            break;
        }

        let line = line.trim_end_matches(['\n', '\r']);
        if line == "quit" {
            println!("Goodbye!");
            break;
        }

        match simpl::eval_source(line, &env) {
            EvalOutcome::ParseErrors(errors) => {
                for message in &errors {
                    println!("\t{message}");
                }
            }
            EvalOutcome::Value(value) => {
                if !matches!(value, Object::Null) {
                    println!("{}", value.inspect());
                }
            }
        }
    }
}
