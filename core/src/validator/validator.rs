use tracing::debug;

use super::{AssignmentViolation, ValidationError};
use crate::environment::is_hidden;
use crate::parser::{Constant, Expr, ExprKind, Module, Stmt, StmtKind};
use crate::plugins::PluginRegistry;

/// Check every statement of `module` against the accepted grammar.
///
/// The first violation aborts validation. Assignment targets are checked
/// against the plugin names registered when this runs.
pub fn validate(module: &Module, registry: &PluginRegistry) -> Result<(), ValidationError> {
    debug!(statements = module.body.len(), "validating submission");

    let validator = Validator { registry };
    for stmt in &module.body {
        validator.statement(stmt)?;
    }
    Ok(())
}

struct Validator<'a> {
    registry: &'a PluginRegistry,
}

impl Validator<'_> {
    fn statement(&self, stmt: &Stmt) -> Result<(), ValidationError> {
        match &stmt.kind {
            StmtKind::Expr(value) => match &value.kind {
                ExprKind::Call { .. } => self.expr(value),
                other => Err(ValidationError::illegal_syntax(other.describe(), &value.loc)),
            },
            StmtKind::Assign { targets, value } => {
                let target = match &targets[..] {
                    [target] => target,
                    _ => {
                        return Err(ValidationError::illegal_assignment(
                            AssignmentViolation::MultipleTargets,
                            &stmt.loc,
                        ));
                    }
                };
                let Some(name) = target.as_name() else {
                    return Err(ValidationError::illegal_assignment(
                        AssignmentViolation::NotAName {
                            construct: target.kind.describe(),
                        },
                        &target.loc,
                    ));
                };
                if self.registry.has(name) {
                    return Err(ValidationError::illegal_assignment(
                        AssignmentViolation::PluginName {
                            name: name.to_string(),
                        },
                        &target.loc,
                    ));
                }
                if is_hidden(name) {
                    return Err(ValidationError::illegal_assignment(
                        AssignmentViolation::HiddenName {
                            name: name.to_string(),
                        },
                        &target.loc,
                    ));
                }
                self.expr(value)
            }
            other => Err(ValidationError::illegal_syntax(other.describe(), &stmt.loc)),
        }
    }

    fn expr(&self, expr: &Expr) -> Result<(), ValidationError> {
        match &expr.kind {
            ExprKind::Name(_) => Ok(()),

            ExprKind::Constant(
                Constant::None
                | Constant::Bool(_)
                | Constant::Int(_)
                | Constant::Float(_)
                | Constant::Str(_),
            ) => Ok(()),

            ExprKind::Call {
                func,
                args,
                keywords,
            } => {
                if func.as_name().is_none() {
                    return Err(ValidationError::illegal_syntax(func.kind.describe(), &func.loc));
                }
                for arg in args {
                    self.expr(arg)?;
                }
                for keyword in keywords {
                    if keyword.arg.is_none() {
                        return Err(ValidationError::illegal_syntax("unpacking", &keyword.loc));
                    }
                    self.expr(&keyword.value)?;
                }
                Ok(())
            }

            ExprKind::List(items) | ExprKind::Set(items) => {
                for item in items {
                    self.expr(item)?;
                }
                Ok(())
            }

            ExprKind::Dict(entries) => {
                for entry in entries {
                    match &entry.key {
                        Some(key) => self.expr(key)?,
                        None => {
                            return Err(ValidationError::illegal_syntax(
                                "unpacking",
                                &entry.value.loc,
                            ));
                        }
                    }
                }
                for entry in entries {
                    self.expr(&entry.value)?;
                }
                Ok(())
            }

            other => Err(ValidationError::illegal_syntax(other.describe(), &expr.loc)),
        }
    }
}
