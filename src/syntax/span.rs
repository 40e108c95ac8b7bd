/// A source location: 1-based line number + byte offset range into the
/// whole source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub line: u32,
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(line: u32, start: u32, end: u32) -> Self {
        Self { line, start, end }
    }

    /// A span that only knows its line (statements built without source text).
    pub fn line(line: u32) -> Self {
        Self {
            line,
            start: 0,
            end: 0,
        }
    }

    pub fn dummy() -> Self {
        Self {
            line: 0,
            start: 0,
            end: 0,
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.line == 0
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// A value annotated with its source span.
#[derive(Clone, Debug, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    pub fn dummy(node: T) -> Self {
        Self {
            node,
            span: Span::dummy(),
        }
    }
}
