use std::fmt;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

/// The twelve operator lexemes carried by [`TokenKind::Operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `=`
    Equal,
    /// `!`
    Bang,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
}

impl Operator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Equal => "=",
            Self::Bang => "!",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
        }
    }

    /// `true` for the six operators accepted between two arithmetic
    /// expressions in a condition.
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            Self::Less
                | Self::Greater
                | Self::EqualEqual
                | Self::BangEqual
                | Self::LessEqual
                | Self::GreaterEqual
        )
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Main,
    Var,
    Int,
    Real,
    If,
    Then,
    Else,
    While,
    Input,
    Print,
    Not,
    And,
    Or,
    Identifier,
    /// Integer numeral (`123`).
    NumInt,
    /// Numeral with a decimal point (`3.14`, `.5`).
    NumReal,
    /// Double-quoted string, lexeme holds the raw content.
    Str,
    /// Assignment arrow `<-`.
    Assign,
    /// `++`
    Inc,
    /// `--`
    Dec,
    Operator(Operator),
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Colon,
}

impl TokenKind {
    /// Statement-boundary kinds used as synchronization points.
    #[must_use]
    pub const fn is_boundary(self) -> bool {
        matches!(self, Self::Semicolon | Self::RBrace)
    }

    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(
            self,
            Self::Main
                | Self::Var
                | Self::Int
                | Self::Real
                | Self::If
                | Self::Then
                | Self::Else
                | Self::While
                | Self::Input
                | Self::Print
                | Self::Not
                | Self::And
                | Self::Or
        )
    }

    /// Upper-case tag used in diagnostics and token listings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Main => "MAIN",
            Self::Var => "VAR",
            Self::Int => "INT",
            Self::Real => "REAL",
            Self::If => "IF",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::While => "WHILE",
            Self::Input => "INPUT",
            Self::Print => "PRINT",
            Self::Not => "NOT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Identifier => "IDENTIFIER",
            Self::NumInt => "NUMINT",
            Self::NumReal => "NUMREAL",
            Self::Str => "STRING",
            Self::Assign => "ASSIGN",
            Self::Inc => "INC",
            Self::Dec => "DEC",
            Self::Operator(_) => "OPERATOR",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::Semicolon => "SEMICOLON",
            Self::Comma => "COMMA",
            Self::Colon => "COLON",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operator(op) => write!(f, "OPERATOR '{}'", op.as_str()),
            other => f.write_str(other.name()),
        }
    }
}

const RESERVED_WORDS: [(&str, TokenKind); 13] = [
    ("main", TokenKind::Main),
    ("var", TokenKind::Var),
    ("int", TokenKind::Int),
    ("real", TokenKind::Real),
    ("if", TokenKind::If),
    ("then", TokenKind::Then),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("input", TokenKind::Input),
    ("print", TokenKind::Print),
    ("not", TokenKind::Not),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
];

/// Case-insensitive reserved-word lookup.
#[must_use]
pub fn keyword(word: &str) -> Option<TokenKind> {
    RESERVED_WORDS
        .iter()
        .find(|(kw, _)| kw.eq_ignore_ascii_case(word))
        .map(|&(_, kind)| kind)
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            span: Span { line, column },
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}:{}",
            self.kind.name(),
            self.text,
            self.span.line,
            self.span.column
        )
    }
}
