//! Source text -> statement strings.
//!
//! Statements are `;`-terminated and may share a line. `//` starts a comment
//! that runs to the end of the line. The grammar never sees comments or
//! terminators: it receives one trimmed statement string at a time.

use crate::diagnostic::Diagnostic;
use crate::span::Span;

const COMMENT: &str = "//";
const TERMINATOR: char = ';';

/// One statement's text together with where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceStatement {
    pub text: String,
    pub span: Span,
}

impl SourceStatement {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Self {
            text: text.into(),
            span,
        }
    }
}

/// Split a whole source file into statements.
///
/// A line whose final statement lacks a terminator still yields that
/// statement, plus a warning.
pub fn split_statements(source: &str) -> (Vec<SourceStatement>, Vec<Diagnostic>) {
    let mut statements = Vec::new();
    let mut warnings = Vec::new();
    let mut line_start = 0usize;

    for (idx, raw_line) in source.split('\n').enumerate() {
        let line_no = idx as u32 + 1;
        let offset = line_start;
        line_start += raw_line.len() + 1;

        let code = match raw_line.find(COMMENT) {
            Some(pos) => &raw_line[..pos],
            None => raw_line,
        };
        let code = code.trim_end_matches('\r');
        if code.trim().is_empty() {
            continue;
        }

        let mut piece_start = 0usize;
        let mut terminated = true;
        let pieces: Vec<&str> = code.split(TERMINATOR).collect();
        let last = pieces.len() - 1;
        for (i, piece) in pieces.iter().enumerate() {
            let start = piece_start;
            piece_start += piece.len() + 1;
            let trimmed = piece.trim();
            if trimmed.is_empty() {
                continue;
            }
            if i == last {
                terminated = false;
            }
            let lead = piece.len() - piece.trim_start().len();
            let begin = offset + start + lead;
            let span = Span::new(line_no, begin as u32, (begin + trimmed.len()) as u32);
            statements.push(SourceStatement::new(trimmed, span));
        }

        if !terminated {
            warnings.push(Diagnostic::warning(
                "does not end in a semicolon".to_string(),
                Span::line(line_no),
            ));
        }
    }

    (statements, warnings)
}
