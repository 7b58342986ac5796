//! The symbol table: one flat scope for the life of a compilation.
//!
//! Nested blocks do not shadow and nothing is ever popped; the table only
//! grows as declarations are checked.

use std::collections::HashMap;

use crate::error::{AlreadyDeclaredSnafu, CompileResult, NotDeclaredSnafu};

#[derive(Default)]
pub struct SymbolTable {
  symbols: HashMap<String, String>,
}

impl SymbolTable {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a declaration. Redeclaring a name is fatal.
  pub fn declare(&mut self, name: &str, type_name: &str) -> CompileResult<()> {
    if self.symbols.contains_key(name) {
      return AlreadyDeclaredSnafu { name }.fail();
    }
    self.symbols.insert(name.to_string(), type_name.to_string());
    Ok(())
  }

  /// Return the declared type of a name, or fail if it was never declared.
  pub fn lookup(&self, name: &str) -> CompileResult<String> {
    self
      .symbols
      .get(name)
      .cloned()
      .ok_or_else(|| NotDeclaredSnafu { name }.build())
  }
}
