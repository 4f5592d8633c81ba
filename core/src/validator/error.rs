use core::fmt;

use crate::parser::Location;

/// Why an assignment statement was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentViolation {
    /// `a = b = 0`
    MultipleTargets,
    /// A target that is not a plain name, such as `a, b = ...` or `a.b = ...`.
    NotAName { construct: &'static str },
    PluginName { name: String },
    HiddenName { name: String },
    /// The name is already bound in the environment.
    ExistingName { name: String },
}

impl fmt::Display for AssignmentViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentViolation::MultipleTargets => {
                write!(f, "Illegal assignment into multiple targets")
            }
            AssignmentViolation::NotAName { construct } => {
                write!(f, "Illegal assignment into {}", construct)
            }
            AssignmentViolation::PluginName { name } => {
                write!(f, "Illegal assignment into plugin {}", name)
            }
            AssignmentViolation::HiddenName { name } => {
                write!(f, "Illegal assignment into double-underscore variable {}", name)
            }
            AssignmentViolation::ExistingName { name } => {
                write!(f, "Illegal assignment into existing variable {}", name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A construct outside the accepted grammar.
    IllegalSyntax { construct: &'static str },
    IllegalAssignment(AssignmentViolation),
}

/// Rejection of a submission, located at the offending construct.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub loc: Location,
}

impl ValidationError {
    pub fn illegal_syntax(construct: &'static str, loc: &Location) -> Self {
        Self {
            kind: ValidationErrorKind::IllegalSyntax { construct },
            loc: loc.clone(),
        }
    }

    pub fn illegal_assignment(violation: AssignmentViolation, loc: &Location) -> Self {
        Self {
            kind: ValidationErrorKind::IllegalAssignment(violation),
            loc: loc.clone(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::IllegalSyntax { .. } => {
                write!(f, "l.{}: Illegal syntax", self.loc.line)
            }
            ValidationErrorKind::IllegalAssignment(violation) => {
                write!(f, "l.{}: {}", self.loc.line, violation)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
