//! Raw syntax tree produced by the parser.
//!
//! The tree is intentionally wider than what the interpreter runs. Every
//! node carries its [`Location`] so that later passes can report the line of
//! the offending construct.

use crate::parser::syntax::Location;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `a = value`, or a chain `a = b = value` with several targets.
    Assign { targets: Vec<Expr>, value: Expr },
    /// `a += value` and friends.
    AugAssign {
        target: Expr,
        op: String,
        value: Expr,
    },
    /// `a: annotation = value`.
    AnnAssign {
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
    },
    Expr(Expr),
    /// A statement introduced by a reserved word, such as `import` or `for`.
    Keyword(String),
}

impl StmtKind {
    pub fn describe(&self) -> &'static str {
        match self {
            StmtKind::Assign { .. } => "assignment",
            StmtKind::AugAssign { .. } => "augmented assignment",
            StmtKind::AnnAssign { .. } => "annotated assignment",
            StmtKind::Expr(_) => "expression statement",
            StmtKind::Keyword(keyword) => match keyword.as_str() {
                "import" | "from" => "import statement",
                "def" => "function definition",
                "class" => "class definition",
                "if" | "elif" | "else" => "conditional",
                "for" | "while" | "break" | "continue" => "loop",
                "with" => "with statement",
                "try" | "except" | "finally" | "raise" => "exception handling",
                "return" | "yield" | "await" => "control flow statement",
                "async" => "async statement",
                _ => "keyword statement",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub loc: Location,
}

impl Expr {
    pub fn new(kind: ExprKind, loc: Location) -> Self {
        Self { kind, loc }
    }

    pub fn line(&self) -> usize {
        self.loc.line
    }

    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Name(String),
    Constant(Constant),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Set(Vec<Expr>),
    Dict(Vec<DictEntry>),
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Subscript {
        value: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    Lambda {
        params: Vec<String>,
        body: Box<Expr>,
    },
    Starred(Box<Expr>),
    Comprehension(ComprehensionKind),
    /// `f"..."` strings; only the raw text is kept.
    FormatStr(String),
}

impl ExprKind {
    pub fn describe(&self) -> &'static str {
        match self {
            ExprKind::Name(_) => "name",
            ExprKind::Constant(Constant::Bytes(_)) => "bytes literal",
            ExprKind::Constant(Constant::Ellipsis) => "ellipsis",
            ExprKind::Constant(_) => "constant",
            ExprKind::List(_) => "list",
            ExprKind::Tuple(_) => "tuple",
            ExprKind::Set(_) => "set",
            ExprKind::Dict(_) => "dict",
            ExprKind::Call { .. } => "call",
            ExprKind::Attribute { .. } => "attribute access",
            ExprKind::Subscript { .. } => "subscript",
            ExprKind::Slice { .. } => "slice",
            ExprKind::Binary { op, .. } if op.is_boolean() => "boolean operator",
            ExprKind::Binary { op, .. } if op.is_comparison() => "comparison",
            ExprKind::Binary { .. } => "binary operator",
            ExprKind::Unary { .. } => "unary operator",
            ExprKind::IfExp { .. } => "conditional expression",
            ExprKind::Lambda { .. } => "lambda",
            ExprKind::Starred(_) => "unpacking",
            ExprKind::Comprehension(_) => "comprehension",
            ExprKind::FormatStr(_) => "format string",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Ellipsis,
}

/// A `key: value` pair, or `**mapping` when `key` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct DictEntry {
    pub key: Option<Expr>,
    pub value: Expr,
}

/// A keyword argument `name=value`, or `**mapping` when `arg` is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expr,
    pub loc: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComprehensionKind {
    List,
    Set,
    Dict,
    Generator,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    In,
    NotIn,
    Is,
    IsNot,
    BitOr,
    BitXor,
    BitAnd,
    LShift,
    RShift,
    Add,
    Sub,
    Mul,
    MatMul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinaryOp {
    pub fn is_boolean(self) -> bool {
        matches!(self, BinaryOp::Or | BinaryOp::And)
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtE
                | BinaryOp::Gt
                | BinaryOp::GtE
                | BinaryOp::In
                | BinaryOp::NotIn
                | BinaryOp::Is
                | BinaryOp::IsNot
        )
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
    Invert,
}
