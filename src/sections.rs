//! Files holding several independent programs, each introduced by a
//! `// === name ===` header line.

use crate::{ErrorPolicy, Report, check_with};

/// Header prefix, matched after trimming the line.
const HEADER: &str = "// ===";

/// One program cut out of a sectioned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Header text without the `//` and `=` decoration.
    pub name: String,
    /// Lines between this header and the next, newlines kept.
    pub source: String,
    /// 1-based line of the header.
    pub line: usize,
}

impl Section {
    /// Analyze this section on its own. Reported lines refer to the
    /// enclosing file.
    #[must_use]
    pub fn check_with(&self, policy: ErrorPolicy) -> Report {
        let mut report = check_with(&self.source, policy);
        for token in &mut report.tokens {
            token.span.line += self.line;
        }
        for err in &mut report.lex_errors {
            err.span.line += self.line;
        }
        for err in &mut report.syntax_errors {
            err.span.line += self.line;
        }
        report
    }
}

/// Split `input` at header lines. Text before the first header is
/// ignored.
#[must_use]
pub fn split_sections(input: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for (idx, line) in input.split_inclusive('\n').enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with(HEADER) {
            sections.push(Section {
                name: trimmed
                    .trim_start_matches('/')
                    .trim_matches(|c: char| c == '=' || c.is_whitespace())
                    .to_string(),
                source: String::new(),
                line: idx + 1,
            });
        } else if let Some(current) = sections.last_mut() {
            current.source.push_str(line);
        }
    }

    sections
}
