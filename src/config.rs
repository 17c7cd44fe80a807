// ABOUTME: Configuration and constants for the Lisp interpreter
// This module contains version info and welcome messages for the REPL

pub const VERSION: &str = "1.0.0";
pub const WELCOME_MESSAGE: &str = "Lisp Interpreter v1.0";
pub const WELCOME_SUBTITLE: &str = "A Scheme-flavored Lisp with a mark-and-sweep heap";

pub const HELP_TEXT: &str = r#"
Available commands:
  (quit) or (exit)     - Exit the REPL

Type any Lisp expression to evaluate it. Use Ctrl-D or (quit) to exit.
"#;
