// ABOUTME: Command-line entry point: runs a script file or starts the REPL

use clap::Parser as ClapParser;
use lisp_heap_sandbox::config::{HELP_TEXT, VERSION, WELCOME_MESSAGE, WELCOME_SUBTITLE};
use lisp_heap_sandbox::interpreter::Interpreter;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, Editor};
use std::path::PathBuf;

/// A Scheme-flavored Lisp interpreter with a mark-and-sweep heap
#[derive(ClapParser, Debug)]
#[command(name = "lisp-heap-sandbox")]
#[command(version = VERSION)]
#[command(about = "A Scheme-flavored Lisp interpreter")]
struct CliArgs {
    /// Script file to execute (if omitted, starts the REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let mut interpreter = Interpreter::new();

    if let Some(script_path) = args.script {
        return run_script(&script_path, &mut interpreter);
    }

    run_repl(&mut interpreter)
}

/// Executes a script file one top-level form at a time, stopping at the
/// first evaluation error.
fn run_script(
    path: &PathBuf,
    interpreter: &mut Interpreter,
) -> Result<(), Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read script file {}: {}", path.display(), e))?;

    for form in split_top_level_forms(&contents) {
        interpreter
            .interpret(&form)
            .map_err(|e| format!("Evaluation error: {}", e))?;
    }

    Ok(())
}

/// Interactive read-eval-print loop with line history.
fn run_repl(interpreter: &mut Interpreter) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<(), _> = DefaultEditor::with_config(config)
        .map_err(|e| format!("Failed to initialize REPL: {}", e))?;

    let history_file = ".lisp_history";
    let _ = rl.load_history(history_file);

    println!("{}", WELCOME_MESSAGE);
    println!("{}", WELCOME_SUBTITLE);

    loop {
        match rl.readline("lisp> ") {
            Ok(line) => {
                match line.trim() {
                    "" => continue,
                    "(quit)" | "(exit)" => {
                        println!("Goodbye!");
                        break;
                    }
                    "(help)" => {
                        println!("{}", HELP_TEXT);
                        continue;
                    }
                    _ => {}
                }

                match interpreter.interpret(&line) {
                    Ok(result) => println!("=> {}", result),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
    Ok(())
}

/// Splits source text into its top-level S-expressions by tracking paren
/// depth, skipping `;`-to-end-of-line comments. Each returned slice is fed
/// to the interpreter independently, matching its one-expression-per-call
/// interface.
fn split_top_level_forms(source: &str) -> Vec<String> {
    let mut forms = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ';' && depth == 0 && current.trim().is_empty() {
            while let Some(&next) = chars.peek() {
                if next == '\n' {
                    break;
                }
                chars.next();
            }
            continue;
        }
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
                if depth == 0 {
                    forms.push(current.trim().to_string());
                    current.clear();
                }
            }
            _ if depth == 0 && c.is_whitespace() => {
                if !current.trim().is_empty() {
                    forms.push(current.trim().to_string());
                    current.clear();
                }
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        forms.push(current.trim().to_string());
    }
    forms.into_iter().filter(|f| !f.is_empty()).collect()
}
