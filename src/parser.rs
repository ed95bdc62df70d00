use std::fmt;

use crate::token::{Operator, Span, Token, TokenKind};

/// The offending token as it appears in a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found {
    pub kind: TokenKind,
    pub text: String,
}

impl From<&Token> for Found {
    fn from(token: &Token) -> Self {
        Self {
            kind: token.kind,
            text: token.text.clone(),
        }
    }
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind.name(), self.text)
    }
}

/// Grammar construct a token could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construct {
    Command,
    Factor,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Factor => write!(f, "factor"),
        }
    }
}

/// Classifies a parser error. A `found` of `None` means the token
/// stream ended where something else was required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A specific token kind was required.
    ExpectedToken {
        expected: TokenKind,
        found: Option<Found>,
    },
    /// The current token cannot start the given construct.
    UnexpectedToken {
        context: Construct,
        found: Option<Found>,
    },
    /// Declaration type other than `int` or `real`.
    ExpectedType { found: Option<Found> },
    /// `print` argument other than an identifier or a string.
    ExpectedPrintArgument { found: Option<Found> },
    /// Comparison without a relational operator.
    ExpectedRelationalOperator { found: Option<Found> },
    /// Tokens left over after the closing brace of `main`.
    ExtraInput { found: Found },
}

fn write_expected(
    f: &mut fmt::Formatter<'_>,
    what: &dyn fmt::Display,
    found: Option<&Found>,
) -> fmt::Result {
    match found {
        Some(t) => write!(f, "expected {what}, got {t}"),
        None => write!(f, "unexpected end of input, expected {what}"),
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectedToken { expected, found } => write_expected(f, expected, found.as_ref()),
            Self::UnexpectedToken {
                context,
                found: Some(t),
            } => {
                write!(f, "unexpected token in {context}: {t}")
            }
            Self::UnexpectedToken {
                context,
                found: None,
            } => {
                write!(f, "unexpected end of input in {context}")
            }
            Self::ExpectedType { found } => write_expected(f, &"type int or real", found.as_ref()),
            Self::ExpectedPrintArgument { found } => {
                write_expected(f, &"IDENTIFIER or STRING in print", found.as_ref())
            }
            Self::ExpectedRelationalOperator { found } => {
                write_expected(f, &"relational operator", found.as_ref())
            }
            Self::ExtraInput { found } => {
                write!(f, "extra input after program: {found}")
            }
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// What the parser does after recording a diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Recover in panic mode and keep collecting diagnostics.
    #[default]
    Accumulate,
    /// Stop at the first diagnostic.
    FailFast,
}

/// Outcome of one parser run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub errors: Vec<ParseError>,
}

impl Parsed {
    /// The program is syntactically valid iff no diagnostic was
    /// recorded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check a token stream against the grammar, collecting every
/// syntax error.
#[must_use]
pub fn parse(tokens: &[Token]) -> Parsed {
    parse_with(tokens, ErrorPolicy::default())
}

/// Check a token stream against the grammar under the given policy.
#[must_use]
pub fn parse_with(tokens: &[Token], policy: ErrorPolicy) -> Parsed {
    Parser::new(tokens, policy).parse()
}

/// Non-local exits out of the grammar procedures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unwind {
    /// Fail-fast run hit its first diagnostic.
    Halt,
    /// Input was discarded up to a statement boundary; the current
    /// statement or declaration is abandoned.
    Resync,
}

type Step<T = ()> = Result<T, Unwind>;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    policy: ErrorPolicy,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    const fn new(tokens: &'a [Token], policy: ErrorPolicy) -> Self {
        Self {
            tokens,
            pos: 0,
            policy,
            errors: Vec::new(),
        }
    }

    fn parse(mut self) -> Parsed {
        if self.program().is_ok() {
            if let Some(tok) = self.peek() {
                // Extra input is the last possible diagnostic, so a
                // fail-fast halt here changes nothing.
                let _ = self.report(
                    ParseErrorKind::ExtraInput {
                        found: Found::from(tok),
                    },
                    tok.span,
                );
            }
        }
        Parsed {
            errors: self.errors,
        }
    }

    // program = "main" "{" declarations { command } "}"
    fn program(&mut self) -> Step {
        self.require(TokenKind::Main)?;
        self.require(TokenKind::LBrace)?;
        self.declarations()?;
        self.commands()?;
        self.require(TokenKind::RBrace)
    }

    // declarations = "var" "{" { declaration } "}"
    fn declarations(&mut self) -> Step {
        self.require(TokenKind::Var)?;
        self.require(TokenKind::LBrace)?;
        while self.check(TokenKind::Identifier) {
            self.recovering(Self::declaration)?;
        }
        self.require(TokenKind::RBrace)
    }

    // declaration = IDENT ":" ("int" | "real") ";"
    fn declaration(&mut self) -> Step {
        self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Colon)?;
        self.type_name()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    fn type_name(&mut self) -> Step {
        match self.peek() {
            Some(tok) if matches!(tok.kind, TokenKind::Int | TokenKind::Real) => {
                self.pos += 1;
                Ok(())
            }
            Some(tok) => {
                self.report(
                    ParseErrorKind::ExpectedType {
                        found: Some(Found::from(tok)),
                    },
                    tok.span,
                )?;
                // leave the `;` for the declaration
                self.skip_until(|_| false);
                Ok(())
            }
            None => self.fail_at_end(ParseErrorKind::ExpectedType { found: None }),
        }
    }

    fn commands(&mut self) -> Step {
        while let Some(tok) = self.peek() {
            if tok.kind == TokenKind::RBrace {
                break;
            }
            self.recovering(Self::command)?;
        }
        Ok(())
    }

    fn command(&mut self) -> Step {
        let Some(tok) = self.peek() else {
            return self.fail_at_end(ParseErrorKind::UnexpectedToken {
                context: Construct::Command,
                found: None,
            });
        };

        match tok.kind {
            TokenKind::Identifier => self.assignment(),
            TokenKind::Input => self.read(),
            TokenKind::Print => self.write(),
            TokenKind::If => self.conditional(),
            TokenKind::While => self.repetition(),
            TokenKind::LBrace => self.block(),
            _ => {
                self.report(
                    ParseErrorKind::UnexpectedToken {
                        context: Construct::Command,
                        found: Some(Found::from(tok)),
                    },
                    tok.span,
                )?;
                self.synchronize();
                Err(Unwind::Resync)
            }
        }
    }

    // assignment = IDENT "<-" arith_expr ";"
    fn assignment(&mut self) -> Step {
        self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Assign)?;
        self.arith_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    // read = "input" "(" IDENT ")" ";"
    fn read(&mut self) -> Step {
        self.expect(TokenKind::Input)?;
        self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    // write = "print" "(" (IDENT | STRING) ")" ";"
    fn write(&mut self) -> Step {
        self.expect(TokenKind::Print)?;
        self.expect(TokenKind::LParen)?;
        match self.peek() {
            Some(tok) if matches!(tok.kind, TokenKind::Identifier | TokenKind::Str) => {
                self.pos += 1;
            }
            Some(tok) => {
                self.report(
                    ParseErrorKind::ExpectedPrintArgument {
                        found: Some(Found::from(tok)),
                    },
                    tok.span,
                )?;
                self.skip_until(|kind| kind == TokenKind::RParen);
            }
            None => {
                return self.fail_at_end(ParseErrorKind::ExpectedPrintArgument { found: None });
            }
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    // conditional = "if" condition "then" command [ "else" command ]
    fn conditional(&mut self) -> Step {
        self.expect(TokenKind::If)?;
        self.condition()?;
        self.expect(TokenKind::Then)?;
        self.command()?;
        if self.check(TokenKind::Else) {
            self.pos += 1;
            self.command()?;
        }
        Ok(())
    }

    // repetition = "while" condition command
    fn repetition(&mut self) -> Step {
        self.expect(TokenKind::While)?;
        self.condition()?;
        self.command()
    }

    // block = "{" { command } "}"
    fn block(&mut self) -> Step {
        self.expect(TokenKind::LBrace)?;
        self.commands()?;
        self.expect(TokenKind::RBrace)?;
        Ok(())
    }

    // arith_expr = term { ("+" | "-") term }
    fn arith_expr(&mut self) -> Step {
        self.term()?;
        while self.check_operator(|op| matches!(op, Operator::Plus | Operator::Minus)) {
            self.pos += 1;
            self.term()?;
        }
        Ok(())
    }

    // term = factor { ("*" | "/") factor }
    fn term(&mut self) -> Step {
        self.factor()?;
        while self.check_operator(|op| matches!(op, Operator::Star | Operator::Slash)) {
            self.pos += 1;
            self.factor()?;
        }
        Ok(())
    }

    // factor = NUMINT | NUMREAL | IDENT [ "++" | "--" ] | "(" arith_expr ")"
    fn factor(&mut self) -> Step {
        let Some(tok) = self.peek() else {
            return self.fail_at_end(ParseErrorKind::UnexpectedToken {
                context: Construct::Factor,
                found: None,
            });
        };

        match tok.kind {
            TokenKind::NumInt | TokenKind::NumReal => {
                self.pos += 1;
            }
            TokenKind::Identifier => {
                self.pos += 1;
                if self.check(TokenKind::Inc) || self.check(TokenKind::Dec) {
                    self.pos += 1;
                }
            }
            TokenKind::LParen => {
                self.pos += 1;
                self.arith_expr()?;
                self.expect(TokenKind::RParen)?;
            }
            _ => {
                self.report(
                    ParseErrorKind::UnexpectedToken {
                        context: Construct::Factor,
                        found: Some(Found::from(tok)),
                    },
                    tok.span,
                )?;
                self.skip_until(ends_expression);
            }
        }
        Ok(())
    }

    // condition = "not" condition | comparison { ("and" | "or") comparison }
    fn condition(&mut self) -> Step {
        if self.check(TokenKind::Not) {
            self.pos += 1;
            return self.condition();
        }
        self.comparison()?;
        while self.check(TokenKind::And) || self.check(TokenKind::Or) {
            self.pos += 1;
            self.comparison()?;
        }
        Ok(())
    }

    // comparison = "(" condition ")" | arith_expr REL_OP arith_expr
    fn comparison(&mut self) -> Step {
        if self.check(TokenKind::LParen) {
            self.pos += 1;
            self.condition()?;
            self.expect(TokenKind::RParen)?;
            return Ok(());
        }

        self.arith_expr()?;
        if self.check_operator(Operator::is_relational) {
            self.pos += 1;
            return self.arith_expr();
        }

        match self.peek() {
            Some(tok) => {
                self.report(
                    ParseErrorKind::ExpectedRelationalOperator {
                        found: Some(Found::from(tok)),
                    },
                    tok.span,
                )?;
                self.skip_until(ends_condition);
                Ok(())
            }
            None => self.fail_at_end(ParseErrorKind::ExpectedRelationalOperator { found: None }),
        }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn check_operator(&self, pred: impl Fn(Operator) -> bool) -> bool {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Operator(op),
                ..
            }) => pred(*op),
            _ => false,
        }
    }

    /// Consume a token of `kind`. On a mismatch, record it and look
    /// ahead within the current statement for the expected token; if
    /// it is not there, synchronize and abandon the statement.
    fn expect(&mut self, kind: TokenKind) -> Step<&'a Token> {
        if let Some(tok) = self.consume(kind)? {
            return Ok(tok);
        }
        self.synchronize();
        Err(Unwind::Resync)
    }

    /// `expect` for the fixed program skeleton. There is no enclosing
    /// statement to abandon, so a token that cannot be found ahead is
    /// taken as missing and parsing carries on in place.
    fn require(&mut self, kind: TokenKind) -> Step {
        self.consume(kind).map(drop)
    }

    /// Shared mismatch handling of `expect` and `require`. Returns
    /// `None` when the token is neither current nor found before the
    /// next `;` or `}`. Nothing is discarded in that case.
    fn consume(&mut self, kind: TokenKind) -> Step<Option<&'a Token>> {
        let Some(tok) = self.peek() else {
            self.report(
                ParseErrorKind::ExpectedToken {
                    expected: kind,
                    found: None,
                },
                self.eof_span(),
            )?;
            return Ok(None);
        };

        if tok.kind == kind {
            self.pos += 1;
            return Ok(Some(tok));
        }

        self.report(
            ParseErrorKind::ExpectedToken {
                expected: kind,
                found: Some(Found::from(tok)),
            },
            tok.span,
        )?;

        let tokens = self.tokens;
        let rest = &tokens[self.pos..];
        let stop = rest
            .iter()
            .position(|t| t.kind == kind || t.kind.is_boundary());
        match stop {
            Some(offset) if rest[offset].kind == kind => {
                self.pos += offset + 1;
                Ok(Some(&rest[offset]))
            }
            _ => Ok(None),
        }
    }

    /// Run a statement-level production, absorbing its
    /// resynchronization so the enclosing list carries on.
    fn recovering(&mut self, production: impl FnOnce(&mut Self) -> Step) -> Step {
        match production(self) {
            Err(Unwind::Resync) => Ok(()),
            other => other,
        }
    }

    /// Discard tokens up to the next `;` or `}`, consuming a `;` and
    /// leaving a `}` for the block that owns it.
    fn synchronize(&mut self) {
        self.skip_until(|_| false);
        if self.check(TokenKind::Semicolon) {
            self.pos += 1;
        }
    }

    /// Discard tokens until `stop` holds or a statement boundary is
    /// reached. Neither is consumed.
    fn skip_until(&mut self, stop: impl Fn(TokenKind) -> bool) {
        while let Some(tok) = self.peek() {
            if tok.kind.is_boundary() || stop(tok.kind) {
                break;
            }
            self.pos += 1;
        }
    }

    fn report(&mut self, kind: ParseErrorKind, span: Span) -> Step {
        self.errors.push(ParseError { kind, span });
        match self.policy {
            ErrorPolicy::Accumulate => Ok(()),
            ErrorPolicy::FailFast => Err(Unwind::Halt),
        }
    }

    fn fail_at_end<T>(&mut self, kind: ParseErrorKind) -> Step<T> {
        self.report(kind, self.eof_span())?;
        Err(Unwind::Resync)
    }

    fn eof_span(&self) -> Span {
        self.tokens
            .last()
            .map_or(Span { line: 1, column: 1 }, |last| last.span)
    }
}

const fn ends_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RParen
            | TokenKind::Then
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Operator(_)
    )
}

const fn ends_condition(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Then
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::RParen
            | TokenKind::Input
            | TokenKind::Print
            | TokenKind::If
            | TokenKind::While
            | TokenKind::LBrace
    )
}
