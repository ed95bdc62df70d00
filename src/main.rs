//! CLI tool to tokenize and syntax-check source files.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use minilang_rs::{ErrorPolicy, check_with, split_sections, tokenize};

#[derive(Parser, Debug)]
#[command(name = "minilang", version, about = "Lexer and syntax checker", long_about = None)]
struct Args {
    /// Stop each parse at the first syntax error
    #[arg(long, global = true)]
    fail_fast: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the token table of each file
    Tokens {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check each file for lexical and syntax errors
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Check every `// ===` section of a file as a separate program
    Sections { file: PathBuf },
}

fn main() -> ExitCode {
    let args = Args::parse();
    let policy = if args.fail_fast {
        ErrorPolicy::FailFast
    } else {
        ErrorPolicy::Accumulate
    };

    let files = match &args.command {
        Command::Tokens { files } | Command::Check { files } => files.as_slice(),
        Command::Sections { file } => std::slice::from_ref(file),
    };

    let mut had_error = false;
    let mut unreadable = false;

    for path in files {
        let name = path.display();
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{name}: {e}");
                unreadable = true;
                continue;
            }
        };

        match args.command {
            Command::Tokens { .. } => {
                let lexed = tokenize(&content);
                for token in &lexed.tokens {
                    println!("{token}");
                }
                for err in &lexed.errors {
                    eprintln!("{name}: {err}");
                }
                had_error |= !lexed.is_ok();
            }
            Command::Check { .. } => {
                let report = check_with(&content, policy);
                if report.is_valid() {
                    eprintln!("{name}: valid ({} tokens)", report.tokens.len());
                } else {
                    for err in report.errors() {
                        eprintln!("{name}: {err}");
                    }
                    had_error = true;
                }
            }
            Command::Sections { .. } => {
                let mut summary = Vec::new();
                for section in split_sections(&content) {
                    println!("=== {} ===", section.name);
                    let report = section.check_with(policy);
                    for err in report.errors() {
                        println!("{name}: {err}");
                    }
                    let ok = report.is_valid();
                    println!("Result: {}", if ok { "OK" } else { "ERROR" });
                    had_error |= !ok;
                    summary.push((section.name, ok));
                }

                println!();
                println!("Summary:");
                for (section, ok) in summary {
                    println!("{section}: {}", if ok { "OK" } else { "ERROR" });
                }
            }
        }
    }

    if unreadable {
        ExitCode::from(2)
    } else if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
