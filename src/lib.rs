//! Crate root: wires together the compilation pipeline.
//!
//! The stages are intentionally small and composable so they can be evolved
//! independently:
//! - `tokenizer` performs lexical analysis and produces a flat token stream.
//! - `parser` owns all syntactic knowledge and returns a checked statement tree.
//! - `ast` holds the tree itself plus the semantic rules that validate it.
//! - `codegen` lowers the tree into a three-address-code listing.
//! - `symbol` is the flat declaration table threaded through checking.
//! - `error` centralises reporting shared by the other modules.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod parser;
pub mod symbol;
pub mod tokenizer;

pub use codegen::{IrGenerator, TacInstruction};
pub use error::{CompileError, CompileResult};

use snafu::ResultExt;
use std::fs;

use crate::parser::Parser;
use crate::tokenizer::Lexer;

/// Compile a source string into its three-address-code listing.
pub fn generate_tac(source: &str) -> CompileResult<Vec<TacInstruction>> {
  let mut lexer = Lexer::new();
  lexer.set_source(source);
  let tokens = lexer.tokenize()?;

  let mut parser = Parser::new();
  parser.set_tokens(tokens);
  let ast = parser.parse()?;

  Ok(IrGenerator::new().generate_code(&ast))
}

/// Read `input_path`, compile it, and write the listing to `output_path`,
/// one instruction per line. Nothing is written unless the whole pipeline
/// succeeds.
pub fn compile(input_path: &str, output_path: &str) -> CompileResult<()> {
  let source = fs::read_to_string(input_path).context(error::InputFileSnafu { path: input_path })?;

  let code = generate_tac(&source)?;

  let listing: String = code
    .iter()
    .map(|instruction| format!("{instruction}\n"))
    .collect();
  fs::write(output_path, listing).context(error::OutputFileSnafu { path: output_path })?;

  Ok(())
}
