use crate::parser::{Location, Rule, Span};

/// Parser error with location.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub loc: Location,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String },

    #[error("invalid string literal: {message}")]
    InvalidString { message: String },

    #[error("positional argument follows keyword argument")]
    PositionalAfterKeyword,

    #[error("keyword argument repeated: {name}")]
    RepeatedKeyword { name: String },

    #[error("nesting depth {depth} exceeds maximum of {max_depth} levels")]
    MaxDepthExceeded { depth: usize, max_depth: usize },

    /// Catch-all for pest errors we don't specifically handle.
    #[error("{message}")]
    Other { message: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, loc: Location) -> Self {
        Self { kind, loc }
    }

    pub fn line(&self) -> usize {
        self.loc.line
    }

    pub fn help(&self) -> Option<&'static str> {
        self.kind.help()
    }
}

impl ParseErrorKind {
    pub fn help(&self) -> Option<&'static str> {
        match self {
            ParseErrorKind::InvalidNumber { .. } => {
                Some("integers must fit in 64 bits; check the number format")
            }
            ParseErrorKind::MaxDepthExceeded { .. } => {
                Some("reduce nesting or split the statement into several assignments")
            }
            ParseErrorKind::PositionalAfterKeyword => {
                Some("move positional arguments before keyword arguments")
            }
            _ => None,
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "l.{}: {}", self.loc.line, self.kind)
    }
}

impl std::error::Error for ParseError {}

/// Convert a pest error to a human-readable ParseError
pub fn convert_pest_error(err: pest::error::Error<Rule>) -> ParseError {
    use pest::error::{ErrorVariant, InputLocation, LineColLocation};

    let span = match err.location {
        InputLocation::Pos(pos) => Span(pos..pos),
        InputLocation::Span((start, end)) => Span(start..end),
    };
    let line = match err.line_col {
        LineColLocation::Pos((line, _)) => line,
        LineColLocation::Span((line, _), _) => line,
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => ParseErrorKind::UnexpectedToken {
            expected: format_expected_rules(&positives),
            found: format_found_rules(&negatives),
        },
        ErrorVariant::CustomError { message } => ParseErrorKind::Other { message },
    };

    ParseError::new(kind, Location::new(line, span))
}

/// Format expected rules in a human-readable way
fn format_expected_rules(rules: &[Rule]) -> String {
    let mut concepts: Vec<&str> = Vec::new();

    for rule in rules {
        let concept = match rule {
            Rule::integer
            | Rule::float
            | Rule::strings
            | Rule::true_lit
            | Rule::false_lit
            | Rule::none_lit => "literal",
            Rule::ident => "identifier",
            Rule::EOI => "end of input",
            Rule::trailing_comma => "','",
            Rule::aug_op => "assignment",
            _ => "expression",
        };
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.split_last() {
        None => "something else".to_string(),
        Some((only, [])) => only.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

/// Format found rules in a human-readable way
fn format_found_rules(rules: &[Rule]) -> String {
    match rules.first() {
        None => "unexpected token".to_string(),
        Some(Rule::ident) => "identifier".to_string(),
        Some(Rule::integer) => "integer".to_string(),
        Some(Rule::float) => "floating-point number".to_string(),
        Some(Rule::strings) => "string".to_string(),
        Some(Rule::EOI) => "end of input".to_string(),
        Some(rule) => format!("{:?}", rule),
    }
}
