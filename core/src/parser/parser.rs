use core::cell::Cell;

use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;
use tracing::trace;

use crate::parser::error::{ParseError, ParseErrorKind, convert_pest_error};
use crate::parser::syntax::{Location, Span};
use crate::parser::tree::{
    BinaryOp, ComprehensionKind, Constant, DictEntry, Expr, ExprKind, Keyword, Module, Stmt,
    StmtKind, UnaryOp,
};

/// Nesting depth accepted by [`parse`].
pub const DEFAULT_MAX_DEPTH: usize = 200;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        .op(Op::infix(Rule::or_op, Assoc::Left))          // `or`
        .op(Op::infix(Rule::and_op, Assoc::Left))         // `and`
        .op(Op::prefix(Rule::not_op))                     // `not`

        // Comparisons.
        .op(
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::ne, Assoc::Left) |
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left) |
            Op::infix(Rule::in_op, Assoc::Left) |
            Op::infix(Rule::not_in, Assoc::Left) |
            Op::infix(Rule::is_op, Assoc::Left) |
            Op::infix(Rule::is_not, Assoc::Left)
        )

        // Bitwise operators.
        .op(Op::infix(Rule::bit_or, Assoc::Left))         // `|`
        .op(Op::infix(Rule::bit_xor, Assoc::Left))        // `^`
        .op(Op::infix(Rule::bit_and, Assoc::Left))        // `&`
        .op(
            Op::infix(Rule::shl, Assoc::Left) |
            Op::infix(Rule::shr, Assoc::Left)
        )                                                 // `<<`, `>>`

        // Arithmetic operators.
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                                 // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::matmul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left) |
            Op::infix(Rule::floor_div, Assoc::Left) |
            Op::infix(Rule::modulo, Assoc::Left)
        )                                                 // `*`, `@`, `/`, `//`, `%`
        .op(
            Op::prefix(Rule::neg) |
            Op::prefix(Rule::pos) |
            Op::prefix(Rule::invert)
        )                                                 // `-`, `+`, `~`
        .op(Op::infix(Rule::pow, Assoc::Right))           // `**` (right-assoc)

        // Postfix operators.
        .op(
            Op::postfix(Rule::call_op) |
            Op::postfix(Rule::subscript_op) |
            Op::postfix(Rule::attribute_op)
        )                                                 // `()`, `[]`, `.`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "parser/syntax.pest"]
pub struct SourceParser;

/// Parse a whole submission into a [`Module`], with the default depth limit.
pub fn parse(source: &str) -> Result<Module, ParseError> {
    parse_with_max_depth(source, DEFAULT_MAX_DEPTH)
}

/// Parse a whole submission, rejecting input nested deeper than `max_depth`.
pub fn parse_with_max_depth(source: &str, max_depth: usize) -> Result<Module, ParseError> {
    // Bracket nesting drives the recursion depth of pest itself, so it is
    // bounded before pest ever sees the input.
    let (depth, loc) = bracket_depth(source);
    if depth > max_depth {
        return Err(ParseError::new(
            ParseErrorKind::MaxDepthExceeded { depth, max_depth },
            loc,
        ));
    }

    let mut pairs = SourceParser::parse(Rule::module, source).map_err(convert_pest_error)?;
    let module = pairs
        .next()
        .ok_or_else(|| missing_pair(&Location::new(1, Span(0..source.len()))))?;

    let builder = TreeBuilder {
        max_depth,
        depth: Cell::new(0),
    };
    builder.module(module)
}

/// Deepest expression nesting in `source` as implied by its brackets, and
/// the location of the bracket that reached it. Strings and comments are
/// skipped. A bare expression has depth 1.
fn bracket_depth(source: &str) -> (usize, Location) {
    let mut depth = 1usize;
    let mut max = 1usize;
    let mut at = Location::new(1, Span(0..0));
    let mut line = 1;
    let mut quote: Option<(char, bool)> = None;
    let mut chars = source.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '\n' {
            line += 1;
        }
        match quote {
            Some((q, triple)) => {
                if c == '\\' {
                    if let Some((_, '\n')) = chars.next() {
                        line += 1;
                    }
                } else if c == q {
                    if !triple {
                        quote = None;
                    } else if source[i..].starts_with(&q.to_string().repeat(3)) {
                        chars.next();
                        chars.next();
                        quote = None;
                    }
                } else if c == '\n' && !triple {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => {
                    let triple = source[i..].starts_with(&c.to_string().repeat(3));
                    if triple {
                        chars.next();
                        chars.next();
                    }
                    quote = Some((c, triple));
                }
                '#' => {
                    while let Some((_, next)) = chars.peek() {
                        if *next == '\n' {
                            break;
                        }
                        chars.next();
                    }
                }
                '(' | '[' | '{' => {
                    depth += 1;
                    if depth > max {
                        max = depth;
                        at = Location::new(line, Span(i..i + 1));
                    }
                }
                ')' | ']' | '}' => depth = depth.saturating_sub(1).max(1),
                _ => {}
            },
        }
    }

    (max, at)
}

fn missing_pair(loc: &Location) -> ParseError {
    ParseError::new(
        ParseErrorKind::Other {
            message: "missing expected pair in rule".to_string(),
        },
        loc.clone(),
    )
}

fn unexpected_rule(rule: Rule, loc: &Location) -> ParseError {
    ParseError::new(
        ParseErrorKind::Other {
            message: format!("Unhandled rule: {:?}", rule),
        },
        loc.clone(),
    )
}

fn expect_next<'i>(
    pairs: &mut impl Iterator<Item = Pair<'i, Rule>>,
    loc: &Location,
) -> Result<Pair<'i, Rule>, ParseError> {
    pairs.next().ok_or_else(|| missing_pair(loc))
}

fn is_keyword_token(rule: Rule) -> bool {
    matches!(
        rule,
        Rule::kw_and
            | Rule::kw_async
            | Rule::kw_else
            | Rule::kw_for
            | Rule::kw_if
            | Rule::kw_in
            | Rule::kw_is
            | Rule::kw_lambda
            | Rule::kw_not
            | Rule::kw_or
    )
}

/// Inner pairs of `pair` without keyword tokens.
fn significant(pair: Pair<'_, Rule>) -> impl Iterator<Item = Pair<'_, Rule>> {
    pair.into_inner().filter(|p| !is_keyword_token(p.as_rule()))
}

/// Converts pest pairs into the raw tree.
struct TreeBuilder {
    max_depth: usize,
    depth: Cell<usize>,
}

impl TreeBuilder {
    fn module(&self, pair: Pair<Rule>) -> Result<Module, ParseError> {
        let mut body = Vec::new();
        for pair in pair.into_inner() {
            if pair.as_rule() == Rule::EOI {
                continue;
            }
            body.push(self.statement(pair)?);
        }
        trace!(statements = body.len(), "built syntax tree");
        Ok(Module { body })
    }

    fn statement(&self, pair: Pair<Rule>) -> Result<Stmt, ParseError> {
        let loc = Location::of(&pair);
        let rule = pair.as_rule();
        let mut inner = pair.into_inner();

        let kind = match rule {
            Rule::assign_stmt => {
                let mut parts = inner
                    .map(|p| self.target_list(p))
                    .collect::<Result<Vec<_>, _>>()?;
                let value = parts.pop().ok_or_else(|| missing_pair(&loc))?;
                StmtKind::Assign {
                    targets: parts,
                    value,
                }
            }
            Rule::aug_assign_stmt => {
                let target = self.target_list(expect_next(&mut inner, &loc)?)?;
                let op = expect_next(&mut inner, &loc)?.as_str().to_string();
                let value = self.target_list(expect_next(&mut inner, &loc)?)?;
                StmtKind::AugAssign { target, op, value }
            }
            Rule::ann_assign_stmt => {
                let target = self.expr(expect_next(&mut inner, &loc)?)?;
                let annotation = self.expr(expect_next(&mut inner, &loc)?)?;
                let value = inner.next().map(|p| self.target_list(p)).transpose()?;
                StmtKind::AnnAssign {
                    target,
                    annotation,
                    value,
                }
            }
            Rule::expr_stmt => StmtKind::Expr(self.target_list(expect_next(&mut inner, &loc)?)?),
            Rule::keyword_stmt => {
                StmtKind::Keyword(expect_next(&mut inner, &loc)?.as_str().to_string())
            }
            rule => return Err(unexpected_rule(rule, &loc)),
        };

        Ok(Stmt { kind, loc })
    }

    /// A comma-separated list: a bare expression, or a tuple when a comma
    /// is present.
    fn target_list(&self, pair: Pair<Rule>) -> Result<Expr, ParseError> {
        let loc = Location::of(&pair);
        let (mut items, tuple) = self.sequence(pair.into_inner())?;
        match items.pop() {
            Some(item) if !tuple && items.is_empty() => Ok(item),
            last => {
                items.extend(last);
                Ok(Expr::new(ExprKind::Tuple(items), loc))
            }
        }
    }

    /// Collects the items of a sequence and whether a comma made it a tuple.
    fn sequence(&self, pairs: Pairs<Rule>) -> Result<(Vec<Expr>, bool), ParseError> {
        let mut items = Vec::new();
        let mut tuple = false;
        for pair in pairs {
            match pair.as_rule() {
                Rule::trailing_comma => tuple = true,
                _ => items.push(self.expr(pair)?),
            }
        }
        let tuple = tuple || items.len() > 1;
        Ok((items, tuple))
    }

    fn expr(&self, pair: Pair<Rule>) -> Result<Expr, ParseError> {
        // Only operator expressions count as a level, so the depth matches
        // the bracket nesting measured before parsing.
        if pair.as_rule() != Rule::expr {
            return self.expr_inner(pair);
        }

        let depth = self.depth.get() + 1;
        if depth > self.max_depth {
            return Err(ParseError::new(
                ParseErrorKind::MaxDepthExceeded {
                    depth,
                    max_depth: self.max_depth,
                },
                Location::of(&pair),
            ));
        }

        self.depth.set(depth);
        let result = self.expr_inner(pair);
        self.depth.set(depth - 1);

        result
    }

    /// Prefix operators and `**` each nest one level inside the Pratt parser,
    /// however flat they look in the source, so they count toward the depth.
    fn check_operator_chain(&self, pairs: &Pairs<Rule>) -> Result<(), ParseError> {
        let mut depth = self.depth.get();
        for pair in pairs.clone() {
            if !matches!(
                pair.as_rule(),
                Rule::not_op | Rule::neg | Rule::pos | Rule::invert | Rule::pow
            ) {
                continue;
            }
            depth += 1;
            if depth > self.max_depth {
                return Err(ParseError::new(
                    ParseErrorKind::MaxDepthExceeded {
                        depth,
                        max_depth: self.max_depth,
                    },
                    Location::of(&pair),
                ));
            }
        }
        Ok(())
    }

    fn expr_inner(&self, pair: Pair<Rule>) -> Result<Expr, ParseError> {
        let loc = Location::of(&pair);

        match pair.as_rule() {
            Rule::expr => self.operation(pair.into_inner()),

            Rule::conditional => {
                let mut inner = significant(pair);
                let body = self.expr(expect_next(&mut inner, &loc)?)?;
                match inner.next() {
                    None => Ok(body),
                    Some(test) => {
                        let test = self.expr(test)?;
                        let orelse = self.expr(expect_next(&mut inner, &loc)?)?;
                        Ok(Expr::new(
                            ExprKind::IfExp {
                                test: Box::new(test),
                                body: Box::new(body),
                                orelse: Box::new(orelse),
                            },
                            loc,
                        ))
                    }
                }
            }

            Rule::lambda_expr => {
                let mut params = Vec::new();
                let mut body = None;
                for part in significant(pair) {
                    match part.as_rule() {
                        Rule::lambda_params => {
                            params = part.into_inner().map(|p| p.as_str().to_string()).collect();
                        }
                        _ => body = Some(self.expr(part)?),
                    }
                }
                let body = body.ok_or_else(|| missing_pair(&loc))?;
                Ok(Expr::new(
                    ExprKind::Lambda {
                        params,
                        body: Box::new(body),
                    },
                    loc,
                ))
            }

            Rule::starred => {
                let value = self.expr(expect_next(&mut pair.into_inner(), &loc)?)?;
                Ok(Expr::new(ExprKind::Starred(Box::new(value)), loc))
            }

            Rule::ident => Ok(Expr::new(ExprKind::Name(pair.as_str().to_string()), loc)),

            Rule::integer => {
                let value = parse_integer(pair.as_str()).ok_or_else(|| {
                    ParseError::new(
                        ParseErrorKind::InvalidNumber {
                            text: pair.as_str().to_string(),
                        },
                        loc.clone(),
                    )
                })?;
                Ok(Expr::new(ExprKind::Constant(Constant::Int(value)), loc))
            }

            Rule::float => {
                let text = pair.as_str().replace('_', "");
                let value = text.parse::<f64>().map_err(|_| {
                    ParseError::new(
                        ParseErrorKind::InvalidNumber {
                            text: pair.as_str().to_string(),
                        },
                        loc.clone(),
                    )
                })?;
                Ok(Expr::new(ExprKind::Constant(Constant::Float(value)), loc))
            }

            Rule::true_lit => Ok(Expr::new(ExprKind::Constant(Constant::Bool(true)), loc)),
            Rule::false_lit => Ok(Expr::new(ExprKind::Constant(Constant::Bool(false)), loc)),
            Rule::none_lit => Ok(Expr::new(ExprKind::Constant(Constant::None), loc)),
            Rule::ellipsis => Ok(Expr::new(ExprKind::Constant(Constant::Ellipsis), loc)),

            Rule::strings => self.strings(pair, loc),

            Rule::paren => {
                let inner = pair.into_inner();
                if inner.clone().any(|p| p.as_rule() == Rule::comp_for) {
                    return Ok(comprehension(ComprehensionKind::Generator, loc));
                }
                let (mut items, tuple) = self.sequence(inner)?;
                match items.pop() {
                    // A parenthesized expression is the expression itself.
                    Some(item) if !tuple && items.is_empty() => Ok(item),
                    last => {
                        items.extend(last);
                        Ok(Expr::new(ExprKind::Tuple(items), loc))
                    }
                }
            }

            Rule::list => {
                let inner = pair.into_inner();
                if inner.clone().any(|p| p.as_rule() == Rule::comp_for) {
                    return Ok(comprehension(ComprehensionKind::List, loc));
                }
                let (items, _) = self.sequence(inner)?;
                Ok(Expr::new(ExprKind::List(items), loc))
            }

            Rule::brace => self.brace(pair, loc),

            rule => Err(unexpected_rule(rule, &loc)),
        }
    }

    fn operation(&self, pairs: Pairs<Rule>) -> Result<Expr, ParseError> {
        self.check_operator_chain(&pairs)?;

        PRATT_PARSER
            .map_primary(|primary| self.expr(primary))
            .map_prefix(|op, rhs| {
                let loc = Location::of(&op);
                let op = match op.as_rule() {
                    Rule::not_op => UnaryOp::Not,
                    Rule::neg => UnaryOp::Neg,
                    Rule::pos => UnaryOp::Pos,
                    Rule::invert => UnaryOp::Invert,
                    rule => return Err(unexpected_rule(rule, &loc)),
                };
                let operand = rhs?;
                let loc = loc.to(&operand.loc);
                Ok(Expr::new(
                    ExprKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                    loc,
                ))
            })
            .map_infix(|lhs, op, rhs| {
                let op = match op.as_rule() {
                    Rule::or_op => BinaryOp::Or,
                    Rule::and_op => BinaryOp::And,
                    Rule::eq => BinaryOp::Eq,
                    Rule::ne => BinaryOp::NotEq,
                    Rule::lt => BinaryOp::Lt,
                    Rule::le => BinaryOp::LtE,
                    Rule::gt => BinaryOp::Gt,
                    Rule::ge => BinaryOp::GtE,
                    Rule::in_op => BinaryOp::In,
                    Rule::not_in => BinaryOp::NotIn,
                    Rule::is_op => BinaryOp::Is,
                    Rule::is_not => BinaryOp::IsNot,
                    Rule::bit_or => BinaryOp::BitOr,
                    Rule::bit_xor => BinaryOp::BitXor,
                    Rule::bit_and => BinaryOp::BitAnd,
                    Rule::shl => BinaryOp::LShift,
                    Rule::shr => BinaryOp::RShift,
                    Rule::add => BinaryOp::Add,
                    Rule::sub => BinaryOp::Sub,
                    Rule::mul => BinaryOp::Mul,
                    Rule::matmul => BinaryOp::MatMul,
                    Rule::div => BinaryOp::Div,
                    Rule::floor_div => BinaryOp::FloorDiv,
                    Rule::modulo => BinaryOp::Mod,
                    Rule::pow => BinaryOp::Pow,
                    rule => return Err(unexpected_rule(rule, &Location::of(&op))),
                };
                let left = lhs?;
                let right = rhs?;
                let loc = left.loc.to(&right.loc);
                Ok(Expr::new(
                    ExprKind::Binary {
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    loc,
                ))
            })
            .map_postfix(|lhs, op| {
                let value = lhs?;
                let loc = value.loc.to(&Location::of(&op));
                match op.as_rule() {
                    Rule::call_op => self.call(value, op, loc),
                    Rule::subscript_op => {
                        let op_loc = Location::of(&op);
                        let mut items = Vec::new();
                        let mut tuple = false;
                        for item in op.into_inner() {
                            match item.as_rule() {
                                Rule::trailing_comma => tuple = true,
                                Rule::slice => items.push(self.slice(item)?),
                                _ => items.push(self.expr(item)?),
                            }
                        }
                        let index = match items.pop() {
                            Some(item) if !tuple && items.is_empty() => item,
                            last => {
                                items.extend(last);
                                Expr::new(ExprKind::Tuple(items), op_loc)
                            }
                        };
                        Ok(Expr::new(
                            ExprKind::Subscript {
                                value: Box::new(value),
                                index: Box::new(index),
                            },
                            loc,
                        ))
                    }
                    Rule::attribute_op => {
                        let attr = expect_next(&mut op.into_inner(), &loc)?
                            .as_str()
                            .to_string();
                        Ok(Expr::new(
                            ExprKind::Attribute {
                                value: Box::new(value),
                                attr,
                            },
                            loc,
                        ))
                    }
                    rule => Err(unexpected_rule(rule, &loc)),
                }
            })
            .parse(pairs)
    }

    fn call(&self, func: Expr, op: Pair<Rule>, loc: Location) -> Result<Expr, ParseError> {
        let mut args = Vec::new();
        let mut keywords: Vec<Keyword> = Vec::new();

        for arg in op.into_inner() {
            let arg_loc = Location::of(&arg);
            match arg.as_rule() {
                Rule::kwarg => {
                    let mut inner = arg.into_inner();
                    let name = expect_next(&mut inner, &arg_loc)?.as_str().to_string();
                    if keywords.iter().any(|k| k.arg.as_deref() == Some(name.as_str())) {
                        return Err(ParseError::new(
                            ParseErrorKind::RepeatedKeyword { name },
                            arg_loc,
                        ));
                    }
                    let value = self.expr(expect_next(&mut inner, &arg_loc)?)?;
                    keywords.push(Keyword {
                        arg: Some(name),
                        value,
                        loc: arg_loc,
                    });
                }
                Rule::double_starred => {
                    let value = self.expr(expect_next(&mut arg.into_inner(), &arg_loc)?)?;
                    keywords.push(Keyword {
                        arg: None,
                        value,
                        loc: arg_loc,
                    });
                }
                Rule::starred => args.push(self.expr(arg)?),
                _ => {
                    if !keywords.is_empty() {
                        return Err(ParseError::new(
                            ParseErrorKind::PositionalAfterKeyword,
                            arg_loc,
                        ));
                    }
                    args.push(self.expr(arg)?);
                }
            }
        }

        Ok(Expr::new(
            ExprKind::Call {
                func: Box::new(func),
                args,
                keywords,
            },
            loc,
        ))
    }

    fn slice(&self, pair: Pair<Rule>) -> Result<Expr, ParseError> {
        let loc = Location::of(&pair);
        let mut lower = None;
        let mut upper = None;
        let mut step = None;
        for part in pair.into_inner() {
            let part_loc = Location::of(&part);
            let rule = part.as_rule();
            let value = Some(Box::new(
                self.expr(expect_next(&mut part.into_inner(), &part_loc)?)?,
            ));
            match rule {
                Rule::slice_lower => lower = value,
                Rule::slice_upper => upper = value,
                Rule::slice_step => step = value,
                rule => return Err(unexpected_rule(rule, &part_loc)),
            }
        }
        Ok(Expr::new(ExprKind::Slice { lower, upper, step }, loc))
    }

    fn brace(&self, pair: Pair<Rule>, loc: Location) -> Result<Expr, ParseError> {
        let inner: Vec<Pair<Rule>> = pair.into_inner().collect();

        let is_dict = match inner.first() {
            None => true,
            Some(first) => matches!(first.as_rule(), Rule::dict_item | Rule::dict_unpack),
        };
        if inner.iter().any(|p| p.as_rule() == Rule::comp_for) {
            let kind = if is_dict {
                ComprehensionKind::Dict
            } else {
                ComprehensionKind::Set
            };
            return Ok(comprehension(kind, loc));
        }

        if !is_dict {
            let items = inner
                .into_iter()
                .map(|p| self.expr(p))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Expr::new(ExprKind::Set(items), loc));
        }

        let mut entries = Vec::with_capacity(inner.len());
        for entry in inner {
            let entry_loc = Location::of(&entry);
            let rule = entry.as_rule();
            let mut parts = entry.into_inner();
            match rule {
                Rule::dict_item => {
                    let key = self.expr(expect_next(&mut parts, &entry_loc)?)?;
                    let value = self.expr(expect_next(&mut parts, &entry_loc)?)?;
                    entries.push(DictEntry {
                        key: Some(key),
                        value,
                    });
                }
                Rule::dict_unpack => {
                    let value = self.expr(expect_next(&mut parts, &entry_loc)?)?;
                    entries.push(DictEntry { key: None, value });
                }
                rule => return Err(unexpected_rule(rule, &entry_loc)),
            }
        }
        Ok(Expr::new(ExprKind::Dict(entries), loc))
    }

    fn strings(&self, pair: Pair<Rule>, loc: Location) -> Result<Expr, ParseError> {
        let mut text = String::new();
        let mut bytes: Option<Vec<u8>> = None;
        let mut formatted = false;
        let mut saw_str = false;

        for literal in pair.into_inner() {
            let lit_loc = Location::of(&literal);
            let mut prefix = String::new();
            let mut content = "";
            for part in literal.into_inner() {
                match part.as_rule() {
                    Rule::string_prefix => prefix = part.as_str().to_ascii_lowercase(),
                    _ => content = part.as_str(),
                }
            }
            let raw = prefix.contains('r');
            let invalid = |message: String| {
                ParseError::new(ParseErrorKind::InvalidString { message }, lit_loc.clone())
            };

            if prefix.contains('b') {
                if saw_str {
                    return Err(invalid("cannot mix bytes and nonbytes literals".to_string()));
                }
                if !content.is_ascii() {
                    return Err(invalid(
                        "bytes can only contain ASCII literal characters".to_string(),
                    ));
                }
                let decoded = if raw { content.to_string() } else { unescape(content).map_err(invalid)? };
                bytes
                    .get_or_insert_with(Vec::new)
                    .extend(decoded.chars().map(|c| c as u32 as u8));
            } else {
                if bytes.is_some() {
                    return Err(invalid("cannot mix bytes and nonbytes literals".to_string()));
                }
                saw_str = true;
                formatted |= prefix.contains('f');
                if raw {
                    text.push_str(content);
                } else {
                    text.push_str(&unescape(content).map_err(invalid)?);
                }
            }
        }

        let kind = match bytes {
            Some(bytes) => ExprKind::Constant(Constant::Bytes(bytes)),
            None if formatted => ExprKind::FormatStr(text),
            None => ExprKind::Constant(Constant::Str(text)),
        };
        Ok(Expr::new(kind, loc))
    }
}

fn comprehension(kind: ComprehensionKind, loc: Location) -> Expr {
    Expr::new(ExprKind::Comprehension(kind), loc)
}

fn parse_integer(text: &str) -> Option<i64> {
    let digits = text.replace('_', "");
    let lower = digits.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()
    } else {
        digits.parse().ok()
    }
}

/// Resolve backslash escapes. Unknown escapes are kept verbatim.
fn unescape(content: &str) -> Result<String, String> {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escape) = chars.next() else {
            return Err("trailing backslash".to_string());
        };
        match escape {
            '\n' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0B}'),
            '0'..='7' => {
                let mut value = escape.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).ok_or_else(|| format!("invalid octal escape {value:o}"))?);
            }
            'x' => out.push(hex_escape(&mut chars, 2)?),
            'u' => out.push(hex_escape(&mut chars, 4)?),
            'U' => out.push(hex_escape(&mut chars, 8)?),
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

fn hex_escape(chars: &mut impl Iterator<Item = char>, len: usize) -> Result<char, String> {
    let digits: String = chars.take(len).collect();
    if digits.len() != len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("truncated \\x{{{digits}}} escape"));
    }
    u32::from_str_radix(&digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| format!("invalid escape \\{digits}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_integer_bases() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("1_000"), Some(1000));
        assert_eq!(parse_integer("0x2A"), Some(42));
        assert_eq!(parse_integer("0o52"), Some(42));
        assert_eq!(parse_integer("0b101010"), Some(42));
        assert_eq!(parse_integer("99999999999999999999"), None);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb").unwrap(), "a\nb");
        assert_eq!(unescape(r"\x41B\101").unwrap(), "ABA");
        assert_eq!(unescape(r"\d").unwrap(), r"\d");
        assert_eq!(unescape(r"it\'s").unwrap(), "it's");
        assert!(unescape(r"\x4").is_err());
    }

    #[test]
    fn test_bracket_depth_skips_strings_and_comments() {
        assert_eq!(bracket_depth("a = [[1]]").0, 3);
        assert_eq!(bracket_depth("a = '((((('").0, 1);
        assert_eq!(bracket_depth("a = 1 # ((((").0, 1);
        assert_eq!(bracket_depth("a = \"\"\"(\n(\"\"\"\nb = [1]").0, 2);
    }

    #[test]
    fn test_bracket_depth_reports_line() {
        let (depth, loc) = bracket_depth("a = 0\nb = [[0]]");
        assert_eq!(depth, 3);
        assert_eq!(loc.line, 2);
    }
}
