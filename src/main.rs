use std::env;
use std::process;

fn main() {
  let args: Vec<String> = env::args().collect();
  if args.len() != 3 {
    let program = args.first().map(String::as_str).unwrap_or("minicc");
    eprintln!("usage: {program} <input-path> <output-path>");
    process::exit(1);
  }

  if let Err(err) = minicc::compile(&args[1], &args[2]) {
    eprintln!("Compilation failed: {err}");
    process::exit(1);
  }

  println!("Compilation successful. Intermediate code written to {}", args[2]);
}
