use std::fmt;

use crate::token::{self, Operator, Span, Token, TokenKind};

/// Characters reported as explicitly disallowed rather than merely
/// unrecognized.
const DISALLOWED: [char; 2] = ['@', 'ç'];

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// `/*` without a closing `*/`.
    UnterminatedBlockComment,
    /// `"` without a closing `"`.
    UnterminatedString,
    /// Numeral with more than one `.` (`1.2.3`).
    MultipleDecimalPoints { text: String },
    /// Numeral ending in a bare `.` (`1.`).
    InvalidNumberFormat { text: String },
    /// Numeral glued to letters or underscores (`12abc`).
    MalformedNumber { text: String },
    /// Character the language explicitly rejects.
    DisallowedCharacter(char),
    /// Character that cannot start any token.
    UnexpectedCharacter(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedBlockComment => {
                write!(f, "unterminated block comment")
            }
            Self::UnterminatedString => {
                write!(f, "unterminated string literal")
            }
            Self::MultipleDecimalPoints { text } => {
                write!(f, "multiple decimal points in number: {text}")
            }
            Self::InvalidNumberFormat { text } => {
                write!(f, "invalid number format: {text}")
            }
            Self::MalformedNumber { text } => {
                write!(
                    f,
                    "invalid number format, \
                     number followed by letters: {text}"
                )
            }
            Self::DisallowedCharacter(ch) => {
                write!(f, "invalid character: {ch}")
            }
            Self::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character: {ch}")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Everything one lexing run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl Lexed {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Tokenize a source string.
///
/// Never fails: malformed lexemes are recorded in [`Lexed::errors`]
/// and scanning resumes right after them.
#[must_use]
pub fn tokenize(input: &str) -> Lexed {
    Lexer::new(input).tokenize()
}

struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl Lexer {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn tokenize(mut self) -> Lexed {
        while let Some(ch) = self.peek() {
            let span = self.span();

            match ch {
                c if c.is_whitespace() => {
                    self.advance();
                }
                '#' => self.skip_line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.skip_block_comment(span),
                '"' => self.read_string(span),
                c if c.is_ascii_alphabetic() || c == '_' => self.read_word(span),
                c if c.is_ascii_digit() => self.read_number(span),
                '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.read_number(span);
                }
                '+' | '-' | '*' | '/' | '<' | '>' | '=' | '!' => self.read_operator(span),
                '(' | ')' | '{' | '}' | ';' | ',' | ':' => self.read_punctuation(ch, span),
                c if DISALLOWED.contains(&c) => {
                    self.error(LexErrorKind::DisallowedCharacter(c), span);
                    self.advance();
                }
                c => {
                    self.error(LexErrorKind::UnexpectedCharacter(c), span);
                    self.advance();
                }
            }
        }

        Lexed {
            tokens: self.tokens,
            errors: self.errors,
        }
    }

    const fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.col,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    fn text_from(&self, start: usize) -> String {
        self.input[start..self.pos].iter().collect()
    }

    fn push(&mut self, kind: TokenKind, text: String, span: Span) {
        self.tokens.push(Token { kind, text, span });
    }

    fn error(&mut self, kind: LexErrorKind, span: Span) {
        self.errors.push(LexError { kind, span });
    }

    fn skip_line_comment(&mut self) {
        self.advance_while(|c| c != '\n');
    }

    fn skip_block_comment(&mut self, span: Span) {
        self.advance(); // skip /
        self.advance(); // skip *
        loop {
            match self.peek() {
                None => {
                    self.error(LexErrorKind::UnterminatedBlockComment, span);
                    return;
                }
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    return;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn read_string(&mut self, span: Span) {
        self.advance(); // skip opening quote
        let start = self.pos;
        loop {
            match self.peek() {
                None => {
                    self.error(LexErrorKind::UnterminatedString, span);
                    return;
                }
                Some('\\') => {
                    // escaped character stays in the lexeme verbatim
                    self.advance();
                    self.advance();
                }
                Some('"') => {
                    let text = self.text_from(start);
                    self.advance();
                    self.push(TokenKind::Str, text, span);
                    return;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn read_word(&mut self, span: Span) {
        let start = self.pos;
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let text = self.text_from(start);
        let kind = token::keyword(&text).unwrap_or(TokenKind::Identifier);
        self.push(kind, text, span);
    }

    fn read_number(&mut self, span: Span) {
        let start = self.pos;
        let mut has_dot = false;

        if self.peek() == Some('.') {
            self.advance();
            has_dot = true;
        }
        self.advance_while(|c| c.is_ascii_digit());

        if !has_dot && self.peek() == Some('.') {
            self.advance();
            has_dot = true;
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                if self.peek().is_some_and(is_numeral_glue) {
                    self.read_malformed_number(start, span);
                } else {
                    let text = self.text_from(start);
                    self.error(LexErrorKind::InvalidNumberFormat { text }, span);
                }
                return;
            }
            self.advance_while(|c| c.is_ascii_digit());
        }

        if self.peek().is_some_and(is_numeral_glue) {
            self.read_malformed_number(start, span);
            return;
        }

        let kind = if has_dot {
            TokenKind::NumReal
        } else {
            TokenKind::NumInt
        };
        let text = self.text_from(start);
        self.push(kind, text, span);
    }

    /// Consume the whole contiguous run so no part of it is re-lexed
    /// as a valid token.
    fn read_malformed_number(&mut self, start: usize, span: Span) {
        self.advance_while(is_numeral_glue);
        let text = self.text_from(start);
        let kind = if text.matches('.').count() > 1 {
            LexErrorKind::MultipleDecimalPoints { text }
        } else {
            LexErrorKind::MalformedNumber { text }
        };
        self.error(kind, span);
    }

    fn read_operator(&mut self, span: Span) {
        let Some(first) = self.advance() else {
            return;
        };

        let pair = match (first, self.peek()) {
            ('=', Some('=')) => Some((TokenKind::Operator(Operator::EqualEqual), "==")),
            ('!', Some('=')) => Some((TokenKind::Operator(Operator::BangEqual), "!=")),
            ('<', Some('=')) => Some((TokenKind::Operator(Operator::LessEqual), "<=")),
            ('>', Some('=')) => Some((TokenKind::Operator(Operator::GreaterEqual), ">=")),
            ('<', Some('-')) => Some((TokenKind::Assign, "<-")),
            ('+', Some('+')) => Some((TokenKind::Inc, "++")),
            ('-', Some('-')) => Some((TokenKind::Dec, "--")),
            _ => None,
        };

        if let Some((kind, text)) = pair {
            self.advance();
            self.push(kind, text.to_string(), span);
        } else if let Some(op) = single_operator(first) {
            self.push(TokenKind::Operator(op), first.to_string(), span);
        }
    }

    fn read_punctuation(&mut self, ch: char, span: Span) {
        let kind = match ch {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            _ => TokenKind::Colon,
        };
        self.advance();
        self.push(kind, ch.to_string(), span);
    }
}

const fn is_numeral_glue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

const fn single_operator(c: char) -> Option<Operator> {
    match c {
        '+' => Some(Operator::Plus),
        '-' => Some(Operator::Minus),
        '*' => Some(Operator::Star),
        '/' => Some(Operator::Slash),
        '<' => Some(Operator::Less),
        '>' => Some(Operator::Greater),
        '=' => Some(Operator::Equal),
        '!' => Some(Operator::Bang),
        _ => None,
    }
}
