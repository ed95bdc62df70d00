//! Property-based tests for the parser.
//!
//! Generate random well-formed programs and check they are accepted,
//! then break them and check recovery always terminates.

use minilang_rs::{ErrorPolicy, check, parse_with, token::keyword, tokenize};
use proptest::prelude::*;

// -- Leaf strategies --

/// Identifier that does not collide with a reserved word.
fn identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,6}".prop_filter("reserved word", |s| keyword(s).is_none())
}

fn number() -> impl Strategy<Value = String> {
    prop_oneof!["[0-9]{1,4}", "[0-9]{1,3}\\.[0-9]{1,3}"]
}

/// Factor that cannot open with `(`.
fn simple_factor() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => identifier(),
        3 => number(),
        1 => identifier().prop_map(|id| format!("{id}++")),
        1 => identifier().prop_map(|id| format!("{id}--")),
    ]
}

fn relational() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![">", "<", ">=", "<=", "==", "!="])
}

fn arith_op() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["+", "-", "*", "/"])
}

// -- Expressions --

fn arith_expr() -> impl Strategy<Value = String> {
    simple_factor().prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (inner.clone(), arith_op(), inner.clone()).prop_map(|(l, op, r)| format!("{l} {op} {r}")),
            inner.prop_map(|e| format!("({e})")),
        ]
    })
}

/// Comparison whose left side starts with a plain factor, so it is
/// never mistaken for a parenthesized condition.
fn comparison() -> impl Strategy<Value = String> {
    (
        simple_factor(),
        prop::option::of((arith_op(), arith_expr())),
        relational(),
        arith_expr(),
    )
        .prop_map(|(first, rest, rel, right)| match rest {
            Some((op, tail)) => format!("{first} {op} {tail} {rel} {right}"),
            None => format!("{first} {rel} {right}"),
        })
}

fn condition() -> impl Strategy<Value = String> {
    comparison().prop_recursive(3, 12, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|c| format!("not {c}")),
            inner.clone().prop_map(|c| format!("({c})")),
            (
                inner,
                prop::sample::select(vec!["and", "or"]),
                comparison()
            )
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
        ]
    })
}

// -- Commands --

fn simple_command() -> impl Strategy<Value = String> {
    prop_oneof![
        (identifier(), arith_expr()).prop_map(|(id, e)| format!("{id} <- {e};")),
        identifier().prop_map(|id| format!("input({id});")),
        identifier().prop_map(|id| format!("print({id});")),
        "[a-z ,.!]{0,12}".prop_map(|s| format!("print(\"{s}\");")),
    ]
}

fn command() -> impl Strategy<Value = String> {
    simple_command().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            (condition(), inner.clone()).prop_map(|(c, then)| format!("if {c} then {then}")),
            (condition(), inner.clone(), inner.clone())
                .prop_map(|(c, then, other)| format!("if {c} then {then} else {other}")),
            (condition(), inner.clone()).prop_map(|(c, body)| format!("while {c} {body}")),
            prop::collection::vec(inner, 0..4)
                .prop_map(|body| format!("{{\n{}\n}}", body.join("\n"))),
        ]
    })
}

fn declaration() -> impl Strategy<Value = String> {
    (identifier(), prop::sample::select(vec!["int", "real", "INT", "Real"]))
        .prop_map(|(id, ty)| format!("{id} : {ty};"))
}

fn program() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(declaration(), 0..5),
        prop::collection::vec(command(), 0..6),
    )
        .prop_map(|(decls, body)| {
            format!(
                "main {{\n\tvar {{\n{}\n\t}}\n{}\n}}\n",
                decls.join("\n"),
                body.join("\n")
            )
        })
}

/// Any token the lexer can produce, for building garbage.
fn any_lexeme() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "main", "var", "int", "real", "if", "then", "else", "while", "input", "print", "not",
        "and", "or", "x", "y", "1", "2.5", "\"s\"", "<-", "++", "--", "+", "-", "*", "/", "<",
        ">=", "==", "!=", "=", "!", "(", ")", "{", "}", ";", ",", ":",
    ])
}

// -- Properties --

proptest! {
    #[test]
    fn generated_programs_are_valid(source in program()) {
        let report = check(&source);
        prop_assert!(
            report.is_valid(),
            "{:?}\n--- input ---\n{}",
            report.errors(),
            source
        );
    }

    #[test]
    fn dropping_a_semicolon_is_reported(source in program()) {
        prop_assume!(source.contains(';'));
        let broken = source.replacen(';', " ", 1);
        let report = check(&broken);
        prop_assert!(report.lex_errors.is_empty());
        prop_assert!(!report.syntax_ok(), "--- input ---\n{}", broken);
    }

    #[test]
    fn recovery_terminates_on_token_soup(
        soup in prop::collection::vec(any_lexeme(), 0..60)
    ) {
        let tokens = tokenize(&soup.join(" ")).tokens;
        let all = parse_with(&tokens, ErrorPolicy::Accumulate);
        let first = parse_with(&tokens, ErrorPolicy::FailFast);

        prop_assert!(first.errors.len() <= 1);
        prop_assert_eq!(all.errors.first(), first.errors.first());
    }
}
