pub mod error;
pub mod parser;
mod syntax;
mod tree;

// Re-export the parser and rule enum for external use
pub use parser::Rule;
pub use parser::SourceParser;
pub use parser::{DEFAULT_MAX_DEPTH, parse, parse_with_max_depth};

pub use error::{ParseError, ParseErrorKind};
pub use syntax::{Location, Span};
pub use tree::{
    BinaryOp, ComprehensionKind, Constant, DictEntry, Expr, ExprKind, Keyword, Module, Stmt,
    StmtKind, UnaryOp,
};
