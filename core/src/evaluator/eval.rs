//! Tree-walking evaluation of validated statements.

use tracing::trace;

use super::injector::inject_env;
use super::{ExecutionError, ExecutionErrorKind};
use crate::environment::{Environment, ProtectedEnv};
use crate::parser::{Constant, DictEntry, Expr, ExprKind, Keyword, Location, Stmt, StmtKind};
use crate::plugins::{CallArgs, ENV_KEYWORD, PluginRegistry};
use crate::values::Value;

/// Evaluator for statements that passed validation.
///
/// Names resolve against the registry first and the environment second.
/// Every node kind outside the accepted grammar fails with
/// [`ExecutionErrorKind::IllegalSyntax`], so running an unvalidated tree is
/// refused rather than misinterpreted.
pub struct Evaluator<'e, 'r> {
    env: &'e mut Environment,
    registry: &'r PluginRegistry,
    max_depth: usize,
    depth: usize,
}

impl<'e, 'r> Evaluator<'e, 'r> {
    pub fn new(env: &'e mut Environment, registry: &'r PluginRegistry, max_depth: usize) -> Self {
        Self {
            env,
            registry,
            max_depth,
            depth: 0,
        }
    }

    fn error<T>(&self, kind: ExecutionErrorKind, loc: &Location) -> Result<T, ExecutionError> {
        Err(ExecutionError::new(kind, loc))
    }

    /// Execute one top-level statement.
    pub fn statement(&mut self, stmt: &Stmt) -> Result<(), ExecutionError> {
        trace!(line = stmt.loc.line, kind = stmt.kind.describe(), "executing statement");

        match &stmt.kind {
            StmtKind::Assign { targets, value } => {
                let [target] = &targets[..] else {
                    return self.error(
                        ExecutionErrorKind::IllegalSyntax {
                            construct: "multiple assignment",
                        },
                        &stmt.loc,
                    );
                };
                let Some(name) = target.as_name() else {
                    return self.error(
                        ExecutionErrorKind::IllegalSyntax {
                            construct: target.kind.describe(),
                        },
                        &target.loc,
                    );
                };

                let value = self.expr(value)?;
                if self.env.contains_key(name) {
                    return self.error(
                        ExecutionErrorKind::ExistingName {
                            name: name.to_string(),
                        },
                        &stmt.loc,
                    );
                }
                self.env.insert(name, value);
                Ok(())
            }

            StmtKind::Expr(value @ Expr {
                kind: ExprKind::Call { .. },
                ..
            }) => {
                self.expr(value)?;
                Ok(())
            }

            other => self.error(
                ExecutionErrorKind::IllegalSyntax {
                    construct: other.describe(),
                },
                &stmt.loc,
            ),
        }
    }

    /// Evaluate an expression, tracking nesting depth.
    pub fn expr(&mut self, expr: &Expr) -> Result<Value, ExecutionError> {
        if self.depth >= self.max_depth {
            return self.error(
                ExecutionErrorKind::MaxDepthExceeded {
                    depth: self.depth + 1,
                    max_depth: self.max_depth,
                },
                &expr.loc,
            );
        }

        self.depth += 1;
        let result = self.expr_inner(expr);
        self.depth -= 1;

        result
    }

    fn expr_inner(&mut self, expr: &Expr) -> Result<Value, ExecutionError> {
        match &expr.kind {
            ExprKind::Constant(constant) => match constant {
                Constant::None => Ok(Value::None),
                Constant::Bool(b) => Ok(Value::Bool(*b)),
                Constant::Int(i) => Ok(Value::Int(*i)),
                Constant::Float(f) => Ok(Value::Float(*f)),
                Constant::Str(s) => Ok(Value::Str(s.clone())),
                Constant::Bytes(_) | Constant::Ellipsis => self.error(
                    ExecutionErrorKind::IllegalSyntax {
                        construct: expr.kind.describe(),
                    },
                    &expr.loc,
                ),
            },

            ExprKind::Name(name) => self.lookup(name, &expr.loc),

            ExprKind::List(items) => {
                let items = self.exprs(items)?;
                Ok(Value::List(items))
            }

            ExprKind::Set(items) => {
                let mut elements = Vec::with_capacity(items.len());
                for item in items {
                    let value = self.expr(item)?;
                    self.check_hashable(&value, &item.loc)?;
                    elements.push(value);
                }
                Ok(Value::set(elements))
            }

            ExprKind::Dict(entries) => self.dict(entries, &expr.loc),

            ExprKind::Call {
                func,
                args,
                keywords,
            } => self.call(expr, func, args, keywords),

            other => self.error(
                ExecutionErrorKind::IllegalSyntax {
                    construct: other.describe(),
                },
                &expr.loc,
            ),
        }
    }

    fn exprs(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, ExecutionError> {
        exprs.iter().map(|expr| self.expr(expr)).collect()
    }

    fn lookup(&self, name: &str, loc: &Location) -> Result<Value, ExecutionError> {
        if let Ok(plugin) = self.registry.get(name) {
            return Ok(plugin.to_value());
        }
        match self.env.get(name) {
            Some(value) => Ok(value.clone()),
            None => self.error(
                ExecutionErrorKind::NameResolution {
                    name: name.to_string(),
                },
                loc,
            ),
        }
    }

    fn check_hashable(&self, value: &Value, loc: &Location) -> Result<(), ExecutionError> {
        if value.is_hashable() {
            return Ok(());
        }
        self.error(
            ExecutionErrorKind::Unhashable {
                type_name: value.type_name(),
            },
            loc,
        )
    }

    fn dict(&mut self, entries: &[DictEntry], loc: &Location) -> Result<Value, ExecutionError> {
        let mut pairs = Vec::with_capacity(entries.len());
        for entry in entries {
            let Some(key) = &entry.key else {
                return self.error(
                    ExecutionErrorKind::IllegalSyntax {
                        construct: "unpacking",
                    },
                    loc,
                );
            };
            let key_value = self.expr(key)?;
            self.check_hashable(&key_value, &key.loc)?;
            let value = self.expr(&entry.value)?;
            pairs.push((key_value, value));
        }
        Ok(Value::dict(pairs))
    }

    fn call(
        &mut self,
        expr: &Expr,
        func: &Expr,
        args: &[Expr],
        keywords: &[Keyword],
    ) -> Result<Value, ExecutionError> {
        let Some(name) = func.as_name() else {
            return self.error(
                ExecutionErrorKind::IllegalSyntax {
                    construct: func.kind.describe(),
                },
                &func.loc,
            );
        };

        let registry = self.registry;
        let Ok(plugin) = registry.get(name) else {
            return self.error(
                ExecutionErrorKind::UnknownPlugin {
                    name: name.to_string(),
                },
                &expr.loc,
            );
        };
        let Some(function) = plugin.as_function() else {
            return self.error(
                ExecutionErrorKind::NotCallable {
                    name: name.to_string(),
                },
                &expr.loc,
            );
        };

        let keywords = inject_env(plugin, keywords);
        let positional = self.exprs(args)?;
        let mut named: Vec<(String, Value)> = Vec::with_capacity(keywords.len());
        let mut pass_env = false;

        for keyword in keywords.iter() {
            let Some(arg) = &keyword.arg else {
                return self.error(
                    ExecutionErrorKind::IllegalSyntax {
                        construct: "unpacking",
                    },
                    &expr.loc,
                );
            };
            let value = self.expr(&keyword.value)?;

            let handle = arg == ENV_KEYWORD && matches!(value, Value::Environment);
            let taken = named.iter().any(|(key, _)| key == arg) || (arg == ENV_KEYWORD && pass_env);
            if taken {
                return self.error(
                    ExecutionErrorKind::DuplicateKeyword {
                        plugin: name.to_string(),
                        keyword: arg.clone(),
                    },
                    &expr.loc,
                );
            }

            if handle {
                pass_env = true;
            } else {
                named.push((arg.clone(), value));
            }
        }

        trace!(
            plugin = name,
            args = positional.len(),
            kwargs = named.len(),
            env = pass_env,
            "calling plugin"
        );

        let mut call_args = CallArgs::new(positional, named);
        if pass_env {
            call_args = call_args.with_env(ProtectedEnv::new(self.env));
        }
        function.call(call_args).map_err(|error| {
            ExecutionError::new(
                ExecutionErrorKind::Plugin {
                    name: name.to_string(),
                    error,
                },
                &expr.loc,
            )
        })
    }
}
