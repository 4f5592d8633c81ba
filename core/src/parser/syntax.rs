// Source locations shared by the raw tree, the validator and the evaluator.

use core::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span(pub Range<usize>);

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self(start..end)
    }
    pub fn combine(a: &Span, b: &Span) -> Span {
        Span::new(a.0.start, b.0.end)
    }
    pub fn str_of<'a>(&self, source: &'a str) -> &'a str {
        &source[self.0.start..self.0.end]
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(s: pest::Span<'_>) -> Self {
        Self(s.start()..s.end())
    }
}

/// Position of a node: the 1-based line it starts on and its byte span.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub line: usize,
    pub span: Span,
}

impl Location {
    pub fn new(line: usize, span: Span) -> Self {
        Self { line, span }
    }

    /// Location for nodes synthesized by the interpreter itself.
    pub fn synthetic() -> Self {
        Self::default()
    }

    pub(crate) fn of(pair: &pest::iterators::Pair<'_, crate::parser::Rule>) -> Self {
        let (line, _) = pair.line_col();
        Self {
            line,
            span: pair.as_span().into(),
        }
    }

    /// Covers both locations, keeping the line of the first.
    pub fn to(&self, end: &Location) -> Location {
        Location {
            line: self.line,
            span: Span::combine(&self.span, &end.span),
        }
    }
}
