//! Lifecycle of one submission: sentinels in, statements run, sentinels out.

use tracing::debug;

use super::ExecutionError;
use super::eval::Evaluator;
use super::scope::SentinelScope;
use crate::environment::Environment;
use crate::parser::{DEFAULT_MAX_DEPTH, Module};
use crate::plugins::PluginRegistry;

/// Where a submission is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PreparingEnvironment,
    Executing,
    Cleanup,
    Done { succeeded: bool },
}

impl Phase {
    fn advance(&mut self, next: Phase) {
        debug!(from = ?*self, to = ?next, "submission phase");
        *self = next;
    }
}

/// One run of validated statements against an environment.
///
/// Statements execute in source order and the first failure stops the rest;
/// statements that completed stay applied. The sentinel keys are removed
/// before [`Submission::run`] returns, on success and on failure alike.
pub struct Submission<'e, 'r> {
    env: &'e mut Environment,
    registry: &'r PluginRegistry,
    max_depth: usize,
    phase: Phase,
}

impl<'e, 'r> Submission<'e, 'r> {
    pub fn new(env: &'e mut Environment, registry: &'r PluginRegistry) -> Self {
        Self {
            env,
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
            phase: Phase::Idle,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn run(&mut self, module: &Module) -> Result<(), ExecutionError> {
        debug!(statements = module.body.len(), "running submission");

        self.phase.advance(Phase::PreparingEnvironment);
        let mut scope = SentinelScope::enter(self.env);

        self.phase.advance(Phase::Executing);
        let result = {
            let mut evaluator = Evaluator::new(scope.env_mut(), self.registry, self.max_depth);
            module
                .body
                .iter()
                .try_for_each(|stmt| evaluator.statement(stmt))
        };

        self.phase.advance(Phase::Cleanup);
        drop(scope);

        self.phase.advance(Phase::Done {
            succeeded: result.is_ok(),
        });
        if let Err(err) = &result {
            debug!(line = err.line(), error = %err.kind, "submission failed");
        }
        result
    }
}
