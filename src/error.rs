//! Shared error utilities used across the compilation pipeline.
//!
//! Every stage reports through the same `CompileError` enum so the driver
//! can print a single diagnostic line and exit. Messages are kept stable –
//! the integration tests assert on their exact text.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CompileError {
  #[snafu(display("Expected closing single quote for character literal"))]
  UnterminatedCharacterLiteral,

  #[snafu(display("Unexpected token: {token}"))]
  UnexpectedToken { token: String },

  #[snafu(display("Unexpected token after identifier: {token}"))]
  UnexpectedAfterIdentifier { token: String },

  #[snafu(display("Unexpected token in expression: {token}"))]
  UnexpectedInExpression { token: String },

  /// Expectation mismatches share one variant; `expected` carries the tail
  /// of the message, e.g. `';' after assignment`.
  #[snafu(display("Expected {expected}"))]
  Expected { expected: String },

  #[snafu(display("Function calls not yet supported."))]
  FunctionCallsUnsupported,

  #[snafu(display("Unknown binary operator: {token}"))]
  UnknownBinaryOperator { token: String },

  #[snafu(display("Variable '{name}' is already declared"))]
  AlreadyDeclared { name: String },

  #[snafu(display("Variable '{name}' is not declared"))]
  NotDeclared { name: String },

  #[snafu(display("Type mismatch in binary expression: {left} {op} {right}"))]
  BinaryTypeMismatch {
    left: String,
    op: String,
    right: String,
  },

  #[snafu(display("Cannot assign float to int without explicit cast"))]
  NarrowingAssignment,

  #[snafu(display(
    "Type mismatch: Cannot initialize variable of type '{declared}' with value of type '{actual}'"
  ))]
  InitializerTypeMismatch { declared: String, actual: String },

  #[snafu(display("Type mismatch in assignment: Cannot assign {actual} to {declared}"))]
  AssignmentTypeMismatch { actual: String, declared: String },

  #[snafu(display("Condition in 'if' statement must be of type int or bool"))]
  InvalidCondition,

  #[snafu(display("Could not open input file: {path}"))]
  InputFile {
    path: String,
    source: std::io::Error,
  },

  #[snafu(display("Could not open output file: {path}"))]
  OutputFile {
    path: String,
    source: std::io::Error,
  },
}
