#![allow(dead_code)]

use minilang_rs::{Parsed, TokenKind, parse, tokenize};

/// Tokenize, insist on a clean lex, and parse.
pub fn parse_source(input: &str) -> Parsed {
    let lexed = tokenize(input);
    assert!(
        lexed.errors.is_empty(),
        "unexpected lex errors: {:?}\n--- input ---\n{input}",
        lexed.errors
    );
    parse(&lexed.tokens)
}

pub fn token_kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input).tokens.iter().map(|t| t.kind).collect()
}

pub fn assert_valid(input: &str) {
    let parsed = parse_source(input);
    assert!(
        parsed.is_ok(),
        "expected a valid program, got:\n{}\n--- input ---\n{input}",
        parsed
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Wrap declarations and commands in the fixed program skeleton.
pub fn program(decls: &str, body: &str) -> String {
    format!("main {{\n\tvar {{ {decls} }}\n{body}\n}}\n")
}
