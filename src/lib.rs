//! Lexer and error-recovering parser for a small imperative teaching
//! language: a `main` block, a `var` declaration section, assignment,
//! `input`/`print`, `if`/`while`, and arithmetic and relational
//! expressions.
//!
//! Both stages report every problem they find rather than stopping at
//! the first one. The lexer skips past malformed lexemes, and the
//! parser recovers in panic mode at `;` and `}`.
//!
//! # Quick start
//!
//! ```
//! use minilang_rs::check;
//!
//! let report = check("main { var { x : int; } input(x); print(x); }");
//! assert!(report.is_valid());
//! assert_eq!(report.tokens.len(), 20);
//! ```
//!
//! ## Collecting diagnostics
//!
//! ```
//! use minilang_rs::{tokenize, parse};
//!
//! let lexed = tokenize("main { var { x : int; } x <- 1 print(x); }");
//! assert!(lexed.errors.is_empty());
//!
//! let parsed = parse(&lexed.tokens);
//! assert_eq!(parsed.errors.len(), 1);
//! assert_eq!(
//!     parsed.errors[0].to_string(),
//!     "expected SEMICOLON, got PRINT 'print' at line 1, column 32"
//! );
//! ```

#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod lexer;
pub mod parser;
pub mod sections;
pub mod token;

pub use lexer::{LexError, LexErrorKind, Lexed, tokenize};
pub use parser::{
    Construct, ErrorPolicy, Found, ParseError, ParseErrorKind, Parsed, parse, parse_with,
};
pub use sections::{Section, split_sections};
pub use token::{Operator, Span, Token, TokenKind};

/// Unified diagnostic type covering both lexing and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl Error {
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Lex(e) => e.span,
            Self::Parse(e) => e.span,
        }
    }
}

/// Result of running both stages over one source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub tokens: Vec<Token>,
    pub lex_errors: Vec<LexError>,
    pub syntax_errors: Vec<ParseError>,
}

impl Report {
    /// No syntax errors. Lexical errors are not considered.
    #[must_use]
    pub fn syntax_ok(&self) -> bool {
        self.syntax_errors.is_empty()
    }

    /// No diagnostics of either kind.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lex_errors.is_empty() && self.syntax_errors.is_empty()
    }

    /// Every diagnostic, lexical ones first.
    #[must_use]
    pub fn errors(&self) -> Vec<Error> {
        self.lex_errors
            .iter()
            .cloned()
            .map(Error::from)
            .chain(self.syntax_errors.iter().cloned().map(Error::from))
            .collect()
    }
}

/// Tokenize and parse a source string in one step.
///
/// The parser always runs, over whatever tokens the lexer produced.
#[must_use]
pub fn check(source: &str) -> Report {
    check_with(source, ErrorPolicy::default())
}

/// [`check`] with an explicit parser [`ErrorPolicy`].
#[must_use]
pub fn check_with(source: &str, policy: ErrorPolicy) -> Report {
    let Lexed { tokens, errors } = tokenize(source);
    let parsed = parse_with(&tokens, policy);
    Report {
        tokens,
        lex_errors: errors,
        syntax_errors: parsed.errors,
    }
}
