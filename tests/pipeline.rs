//! End-to-end tests driving the whole pipeline through the public API.

use minicc::{TacInstruction, generate_tac};

fn lines(source: &str) -> Vec<String> {
  generate_tac(source)
    .expect("compilation should succeed")
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn failure(source: &str) -> String {
  generate_tac(source)
    .expect_err("compilation should fail")
    .to_string()
}

#[test]
fn binary_initializer_scenario() {
  assert_eq!(lines("int x = 1 + 2;"), vec!["+ 1 2 t0", "MOV t0  x"]);
}

#[test]
fn int_literal_promotes_into_float_variable() {
  assert_eq!(lines("float y = 3;"), vec!["MOV 3  y"]);
}

#[test]
fn declaration_then_reassignment() {
  assert_eq!(lines("int x = 1; x = 2;"), vec!["MOV 1  x", "MOV 2  x"]);
}

#[test]
fn if_else_lowering() {
  assert_eq!(
    lines("int x = 1; if (x) { x = 2; } else { x = 3; }"),
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
fn function_declaration_lowering() {
  assert_eq!(
    lines("int f(int a, int b) { return a + b; }"),
    vec!["LABEL   f", "+ a b t0", "RET t0  "]
  );
}

#[test]
fn redeclaration_fails() {
  assert_eq!(
    failure("int x = 1; int x = 2;"),
    "Variable 'x' is already declared"
  );
}

#[test]
fn undeclared_variable_fails() {
  assert_eq!(failure("int x = y;"), "Variable 'y' is not declared");
}

#[test]
fn narrowing_initializer_fails() {
  assert_eq!(
    failure("int x = 2.5;"),
    "Cannot assign float to int without explicit cast"
  );
}

#[test]
fn non_numeric_condition_fails() {
  assert_eq!(
    failure("std::string s = \"hi\"; if (s) { }"),
    "Condition in 'if' statement must be of type int or bool"
  );
}

#[test]
fn comments_and_stray_characters_do_not_reach_the_parser() {
  assert_eq!(
    lines("// leading comment\nint x /* inline */ = 1; @"),
    vec!["MOV 1  x"]
  );
}

#[test]
fn temporaries_are_defined_before_use() {
  let code = generate_tac("int x = 1 + 2 * 3 - 4; int y = x % 5;").expect("should compile");
  let mut defined: Vec<&str> = Vec::new();
  for instruction in &code {
    for arg in [&instruction.arg1, &instruction.arg2] {
      if arg.starts_with('t') && arg[1..].chars().all(|c| c.is_ascii_digit()) {
        assert!(defined.contains(&arg.as_str()), "{arg} used before defined");
      }
    }
    if instruction.result.starts_with('t') {
      defined.push(&instruction.result);
    }
  }
}

#[test]
fn branch_instructions_balance_per_if() {
  let code = generate_tac("int x = 1; if (x) { x = 2; }").expect("should compile");
  let count = |op: &str| code.iter().filter(|i| i.op == op).count();
  assert_eq!(count("IF_FALSE"), 1);
  assert_eq!(count("GOTO"), 1);
  assert_eq!(count("LABEL"), 2);
}

#[test]
fn literal_lexemes_survive_a_round_trip() {
  // Pretty-printing a literal or variable reproduces its lexeme, and
  // re-tokenizing that text yields the same lexeme again.
  for source in ["42", "3.14", "'a'", "\"hi\"", "someName"] {
    let mut lexer = minicc::tokenizer::Lexer::new();
    lexer.set_source(source);
    let tokens = lexer.tokenize().expect("tokenize should succeed");
    assert_eq!(tokens[0].lexeme, *source);
  }
}

#[test]
fn listing_renders_with_four_columns() {
  let instruction = TacInstruction::new("MOV", "t0", "", "x");
  assert_eq!(instruction.to_string(), "MOV t0  x");
  let ret = TacInstruction::new("RET", "t3", "", "");
  assert_eq!(ret.to_string(), "RET t3  ");
}

#[test]
fn compile_writes_the_listing_to_disk() {
  let dir = std::env::temp_dir().join("minicc-pipeline-test");
  std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
  let input = dir.join("input.src");
  let output = dir.join("output.tac");
  std::fs::write(&input, "int x = 1 + 2;").expect("input should be writable");

  minicc::compile(
    input.to_str().expect("utf-8 path"),
    output.to_str().expect("utf-8 path"),
  )
  .expect("compilation should succeed");

  let written = std::fs::read_to_string(&output).expect("output should exist");
  assert_eq!(written, "+ 1 2 t0\nMOV t0  x\n");
}

#[test]
fn missing_input_file_reports_the_path() {
  let err = minicc::compile("/nonexistent/input.src", "/nonexistent/output.tac")
    .expect_err("compile should fail");
  assert_eq!(
    err.to_string(),
    "Could not open input file: /nonexistent/input.src"
  );
}
