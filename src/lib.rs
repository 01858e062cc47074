//! Simpl: a small dynamically-evaluated, statically-typed-declaration
//! scripting language. `lexer` tokenizes, `parser` builds an AST with a
//! Pratt parser, `evaluator` walks that AST against an `object::Environment`.

pub mod ast;
pub mod builtins;
pub mod evaluator;
pub mod lexer;
pub mod object;
pub mod parser;
pub mod token;

use lexer::Lexer;
use object::{Environment, Object};
use parser::Parser;

/// The result of running a chunk of source: either the final evaluated
/// value, or the list of parser errors collected along the way (a non-empty
/// error list means the caller should not evaluate a partial AST).
pub enum EvalOutcome {
    Value(Object),
    ParseErrors(Vec<String>),
}

/// Runs the full lexer -> parser -> evaluator pipeline against `source`
/// using `env`, the entry point both the REPL and the file runner drive.
pub fn eval_source(source: &str, env: &Environment) -> EvalOutcome {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();

    if !parser.errors().is_empty() {
        return EvalOutcome::ParseErrors(parser.errors().to_vec());
    }

    EvalOutcome::Value(evaluator::eval_program(&program, env))
}
