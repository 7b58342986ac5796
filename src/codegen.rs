//! Code generation: lower the checked tree into three-address code.
//!
//! Every instruction is a quadruple `op arg1 arg2 result`; absent operands
//! stay as empty strings so the rendered listing keeps its four columns.
//! Temporaries (`t0`, `t1`, …) and labels (`L1`, `L2`, …) come from
//! monotonic counters that are never reset within one generator.

use std::fmt;

use crate::ast::{Expr, Stmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TacInstruction {
  pub op: String,
  pub arg1: String,
  pub arg2: String,
  pub result: String,
}

impl TacInstruction {
  pub fn new(
    op: impl Into<String>,
    arg1: impl Into<String>,
    arg2: impl Into<String>,
    result: impl Into<String>,
  ) -> Self {
    Self {
      op: op.into(),
      arg1: arg1.into(),
      arg2: arg2.into(),
      result: result.into(),
    }
  }
}

impl fmt::Display for TacInstruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} {} {}", self.op, self.arg1, self.arg2, self.result)
  }
}

pub struct IrGenerator {
  code: Vec<TacInstruction>,
  temp_count: usize,
  label_count: usize,
}

impl IrGenerator {
  pub fn new() -> Self {
    Self {
      code: Vec::new(),
      temp_count: 0,
      label_count: 0,
    }
  }

  /// Lower the root statement into the flat instruction listing.
  pub fn generate_code(mut self, ast: &Stmt) -> Vec<TacInstruction> {
    if let Stmt::Block { statements } = ast {
      for statement in statements {
        self.generate_statement(statement);
      }
    } else {
      self.generate_statement(ast);
    }
    self.code
  }

  fn generate_statement(&mut self, stmt: &Stmt) {
    match stmt {
      Stmt::VariableDeclaration {
        name, initializer, ..
      } => {
        // A declaration without an initializer emits nothing.
        if let Some(initializer) = initializer {
          let temp = self.generate_expression(initializer);
          self.code.push(TacInstruction::new("MOV", temp, "", name));
        }
      }

      Stmt::Assignment { name, value } => {
        let temp = self.generate_expression(value);
        self.code.push(TacInstruction::new("MOV", temp, "", name));
      }

      Stmt::If {
        condition,
        then_branch,
        else_branch,
      } => {
        let condition_var = self.generate_expression(condition);
        let false_label = self.new_label();
        let end_label = self.new_label();

        self
          .code
          .push(TacInstruction::new("IF_FALSE", condition_var, "", &false_label));

        self.generate_statement(then_branch);
        self.code.push(TacInstruction::new("GOTO", "", "", &end_label));

        self.code.push(TacInstruction::new("LABEL", "", "", &false_label));
        if let Some(else_branch) = else_branch {
          self.generate_statement(else_branch);
        }
        self.code.push(TacInstruction::new("LABEL", "", "", &end_label));
      }

      Stmt::Block { statements } => {
        for statement in statements {
          self.generate_statement(statement);
        }
      }

      Stmt::Return { value } => {
        if let Some(value) = value {
          let temp = self.generate_expression(value);
          self.code.push(TacInstruction::new("RET", temp, "", ""));
        } else {
          self.code.push(TacInstruction::new("RET", "", "", ""));
        }
      }

      Stmt::FunctionDeclaration { name, body, .. } => {
        self.code.push(TacInstruction::new("LABEL", "", "", name));

        for statement in body {
          self.generate_statement(statement);
          if let Some(instruction) = self.code.last()
            && instruction.op == "RET"
          {
            return;
          }
        }

        // Fall off the end of the body: synthesise the return.
        self.code.push(TacInstruction::new("RET", "", "", ""));
      }
    }
  }

  /// Lower an expression and return the operand naming its result:
  /// literals and variables stand for themselves, binaries get a fresh
  /// temporary.
  fn generate_expression(&mut self, expr: &Expr) -> String {
    match expr {
      Expr::Literal { lexeme } => lexeme.clone(),
      Expr::Variable { name } => name.clone(),
      Expr::Binary { left, op, right } => {
        let left_var = self.generate_expression(left);
        let right_var = self.generate_expression(right);
        let result = self.new_temp();
        self.code.push(TacInstruction::new(
          op.symbol(),
          left_var,
          right_var,
          &result,
        ));
        result
      }
    }
  }

  fn new_temp(&mut self) -> String {
    let temp = format!("t{}", self.temp_count);
    self.temp_count += 1;
    temp
  }

  fn new_label(&mut self) -> String {
    self.label_count += 1;
    format!("L{}", self.label_count)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::parser::Parser;
  use crate::tokenizer::Lexer;

  fn lower(source: &str) -> Vec<String> {
    let mut lexer = Lexer::new();
    lexer.set_source(source);
    let tokens = lexer.tokenize().expect("tokenize should succeed");
    let mut parser = Parser::new();
    parser.set_tokens(tokens);
    let ast = parser.parse().expect("parse should succeed");
    IrGenerator::new()
      .generate_code(&ast)
      .iter()
      .map(ToString::to_string)
      .collect()
  }

  #[test]
  fn binary_initializer() {
    assert_eq!(lower("int x = 1 + 2;"), vec!["+ 1 2 t0", "MOV t0  x"]);
  }

  #[test]
  fn promoted_initializer_moves_the_literal() {
    assert_eq!(lower("float y = 3;"), vec!["MOV 3  y"]);
  }

  #[test]
  fn declaration_without_initializer_emits_nothing() {
    assert_eq!(lower("int x;"), Vec::<String>::new());
  }

  #[test]
  fn empty_block_emits_nothing() {
    assert_eq!(lower("{}"), Vec::<String>::new());
  }

  #[test]
  fn sequential_assignments() {
    assert_eq!(lower("int x = 1; x = 2;"), vec!["MOV 1  x", "MOV 2  x"]);
  }

  #[test]
  fn if_else_shape() {
    assert_eq!(
      lower("int x = 1; if (x) { x = 2; } else { x = 3; }"),
      vec![
        "MOV 1  x",
        "IF_FALSE x  L1",
        "MOV 2  x",
        "GOTO   L2",
        "LABEL   L1",
        "MOV 3  x",
        "LABEL   L2",
      ]
    );
  }

  #[test]
  fn if_without_else_still_emits_both_labels() {
    assert_eq!(
      lower("int c = 1; int a = 0; if (c) a = 1;"),
      vec![
        "MOV 1  c",
        "MOV 0  a",
        "IF_FALSE c  L1",
        "MOV 1  a",
        "GOTO   L2",
        "LABEL   L1",
        "LABEL   L2",
      ]
    );
  }

  #[test]
  fn consecutive_ifs_get_distinct_labels() {
    let code = lower("int x = 1; if (x) { x = 2; } if (x) { x = 3; }");
    assert!(code.contains(&"LABEL   L1".to_string()));
    assert!(code.contains(&"LABEL   L2".to_string()));
    assert!(code.contains(&"LABEL   L3".to_string()));
    assert!(code.contains(&"LABEL   L4".to_string()));
  }

  #[test]
  fn function_declaration_brackets_its_body() {
    assert_eq!(
      lower("int f(int a, int b) { return a + b; }"),
      vec!["LABEL   f", "+ a b t0", "RET t0  "]
    );
  }

  #[test]
  fn function_without_return_gets_one_synthesised() {
    assert_eq!(
      lower("int f() { int a = 1; }"),
      vec!["LABEL   f", "MOV 1  a", "RET   "]
    );
  }

  #[test]
  fn function_body_stops_at_the_return() {
    assert_eq!(
      lower("int f(int a) { return a; a = 2; }"),
      vec!["LABEL   f", "RET a  "]
    );
  }

  #[test]
  fn temporaries_count_up_across_statements() {
    assert_eq!(
      lower("int x = 1 + 2; int y = 3 * 4;"),
      vec!["+ 1 2 t0", "MOV t0  x", "* 3 4 t1", "MOV t1  y"]
    );
  }

  #[test]
  fn nested_expression_lowers_leaves_first() {
    assert_eq!(
      lower("int x = 1 + 2 * 3;"),
      vec!["* 2 3 t0", "+ 1 t0 t1", "MOV t1  x"]
    );
  }
}
