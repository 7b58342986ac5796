//! Syntax tree and the semantic checks that walk it.
//!
//! Types are carried as the source spelling of the type name (`int`,
//! `float`, `char`, `std::string`), plus `bool` which only arises as the
//! result of the short-circuit operators. Each node owns its children;
//! `Display` produces a stable pretty-print for diagnostics and tests.

use std::fmt;

use crate::error::{
  AssignmentTypeMismatchSnafu, BinaryTypeMismatchSnafu, CompileResult,
  InitializerTypeMismatchSnafu, InvalidConditionSnafu, NarrowingAssignmentSnafu,
};
use crate::symbol::SymbolTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Subtract,
  Multiply,
  Divide,
  Modulo,
  LessThan,
  GreaterThan,
  Equal,
  NotEqual,
  And,
  Or,
}

impl BinaryOp {
  pub fn symbol(self) -> &'static str {
    match self {
      Self::Add => "+",
      Self::Subtract => "-",
      Self::Multiply => "*",
      Self::Divide => "/",
      Self::Modulo => "%",
      Self::LessThan => "<",
      Self::GreaterThan => ">",
      Self::Equal => "==",
      Self::NotEqual => "!=",
      Self::And => "&&",
      Self::Or => "||",
    }
  }
}

impl fmt::Display for BinaryOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.symbol())
  }
}

/// Expression nodes. Literals keep their raw source spelling; the type is
/// derived from that spelling on demand.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
  Literal {
    lexeme: String,
  },
  Variable {
    name: String,
  },
  Binary {
    left: Box<Expr>,
    op: BinaryOp,
    right: Box<Expr>,
  },
}

/// A literal's type follows from its spelling alone.
fn literal_type(lexeme: &str) -> &'static str {
  if lexeme.len() == 3 && lexeme.starts_with('\'') && lexeme.ends_with('\'') {
    "char"
  } else if lexeme.starts_with('"') && lexeme.ends_with('"') {
    "std::string"
  } else if lexeme.contains('.') {
    "float"
  } else {
    "int"
  }
}

impl Expr {
  /// Compute the expression's type against the symbol table.
  ///
  /// `&&` and `||` always type as `bool`. Mixed int/float arithmetic
  /// promotes to `float`; any other pairing must match exactly and the
  /// common type propagates, so `a < b` over two ints types as `int`.
  pub fn type_name(&self, symbols: &SymbolTable) -> CompileResult<String> {
    match self {
      Self::Literal { lexeme } => Ok(literal_type(lexeme).to_string()),
      Self::Variable { name } => symbols.lookup(name),
      Self::Binary { left, op, right } => {
        let left_type = left.type_name(symbols)?;
        let right_type = right.type_name(symbols)?;

        if matches!(op, BinaryOp::And | BinaryOp::Or) {
          return Ok("bool".to_string());
        }

        if (left_type == "int" && right_type == "float")
          || (left_type == "float" && right_type == "int")
        {
          return Ok("float".to_string());
        }

        if left_type != right_type {
          return BinaryTypeMismatchSnafu {
            left: left_type,
            op: op.symbol(),
            right: right_type,
          }
          .fail();
        }

        Ok(left_type)
      }
    }
  }

  /// Validate that every variable referenced is declared.
  pub fn check_semantics(&self, symbols: &SymbolTable) -> CompileResult<()> {
    match self {
      Self::Literal { .. } => Ok(()),
      Self::Variable { name } => symbols.lookup(name).map(|_| ()),
      Self::Binary { left, right, .. } => {
        left.check_semantics(symbols)?;
        right.check_semantics(symbols)
      }
    }
  }
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Literal { lexeme } => write!(f, "{lexeme}"),
      Self::Variable { name } => write!(f, "{name}"),
      Self::Binary { left, op, right } => write!(f, "({left} {op} {right})"),
    }
  }
}

/// Statement nodes. Function parameters are stored as the concatenated
/// `"type name"` source strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
  Block {
    statements: Vec<Stmt>,
  },
  VariableDeclaration {
    type_name: String,
    name: String,
    initializer: Option<Expr>,
  },
  Assignment {
    name: String,
    value: Expr,
  },
  If {
    condition: Expr,
    then_branch: Box<Stmt>,
    else_branch: Option<Box<Stmt>>,
  },
  Return {
    value: Option<Expr>,
  },
  FunctionDeclaration {
    return_type: String,
    name: String,
    parameters: Vec<String>,
    body: Vec<Stmt>,
  },
}

impl Stmt {
  /// Walk the statement in source order, threading the flat symbol table.
  pub fn check_semantics(&self, symbols: &mut SymbolTable) -> CompileResult<()> {
    match self {
      Self::Block { statements } => {
        for statement in statements {
          statement.check_semantics(symbols)?;
        }
        Ok(())
      }

      Self::VariableDeclaration {
        type_name,
        name,
        initializer,
      } => {
        // The name is visible to its own initializer.
        symbols.declare(name, type_name)?;

        if let Some(initializer) = initializer {
          initializer.check_semantics(symbols)?;
          let mut init_type = initializer.type_name(symbols)?;

          if init_type == "int" && type_name == "float" {
            init_type = "float".to_string();
          } else if init_type == "float" && type_name == "int" {
            return NarrowingAssignmentSnafu.fail();
          }

          if init_type != *type_name {
            return InitializerTypeMismatchSnafu {
              declared: type_name,
              actual: init_type,
            }
            .fail();
          }
        }
        Ok(())
      }

      Self::Assignment { name, value } => {
        value.check_semantics(symbols)?;
        let declared = symbols.lookup(name)?;
        let mut value_type = value.type_name(symbols)?;

        if value_type == "int" && declared == "float" {
          value_type = "float".to_string();
        } else if value_type == "float" && declared == "int" {
          return NarrowingAssignmentSnafu.fail();
        }

        if declared != value_type {
          return AssignmentTypeMismatchSnafu {
            actual: value_type,
            declared,
          }
          .fail();
        }
        Ok(())
      }

      Self::If {
        condition,
        then_branch,
        else_branch,
      } => {
        condition.check_semantics(symbols)?;
        let condition_type = condition.type_name(symbols)?;
        if condition_type != "int" && condition_type != "bool" {
          return InvalidConditionSnafu.fail();
        }

        then_branch.check_semantics(symbols)?;
        if let Some(else_branch) = else_branch {
          else_branch.check_semantics(symbols)?;
        }
        Ok(())
      }

      Self::Return { value } => {
        if let Some(value) = value {
          value.check_semantics(symbols)?;
        }
        Ok(())
      }

      Self::FunctionDeclaration {
        parameters, body, ..
      } => {
        // Parameters land in the same flat table as everything else.
        for parameter in parameters {
          if let Some((param_type, param_name)) = parameter.split_once(' ') {
            symbols.declare(param_name, param_type)?;
          }
        }
        for statement in body {
          statement.check_semantics(symbols)?;
        }
        Ok(())
      }
    }
  }
}

impl fmt::Display for Stmt {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Block { statements } => {
        for statement in statements {
          writeln!(f, "  {statement}")?;
        }
        Ok(())
      }
      Self::VariableDeclaration {
        type_name,
        name,
        initializer,
      } => match initializer {
        Some(initializer) => write!(f, "{type_name} {name} = {initializer};"),
        None => write!(f, "{type_name} {name} = null;"),
      },
      Self::Assignment { name, value } => write!(f, "{name} = {value};"),
      Self::If {
        condition,
        then_branch,
        else_branch,
      } => {
        write!(f, "if ({condition}) {then_branch}")?;
        if let Some(else_branch) = else_branch {
          write!(f, " else {else_branch}")?;
        }
        Ok(())
      }
      Self::Return { value } => match value {
        Some(value) => write!(f, "return {value};"),
        None => write!(f, "return;"),
      },
      Self::FunctionDeclaration {
        return_type,
        name,
        parameters,
        ..
      } => {
        write!(f, "{return_type} {name}({})", parameters.join(", "))
      }
    }
  }
}
