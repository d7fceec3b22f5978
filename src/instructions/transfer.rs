//! # Transfer Instructions
//!
//! - MOV: Copy a value from a readable source to a writable target

use crate::execution::{Command, ExecutionResult, ResolveError};
use crate::io::{Readable, Writable};
use crate::language::{resolve_readable, resolve_writable, ResolutionContext};

use super::{expect_arguments, CachedOperand, OperandErrors};

/// `mov src dst`
///
/// Blocks until the source yields a value, then until the target accepts it. The
/// value read is kept across blocked ticks and dropped once written.
pub struct MovCommand {
    source: CachedOperand,
    target: Box<dyn Writable>,
}

impl MovCommand {
    /// Create a command copying from `source` to `target`.
    pub fn new(source: Box<dyn Readable>, target: Box<dyn Writable>) -> Self {
        Self {
            source: CachedOperand::new(source),
            target,
        }
    }
}

impl Command for MovCommand {
    fn execute(&mut self) -> ExecutionResult {
        let Some(value) = self.source.fetch() else {
            return ExecutionResult::blocked();
        };

        if !self.target.try_write(value) {
            return ExecutionResult::blocked();
        }

        self.source.clear();
        ExecutionResult::finished()
    }
}

/// Build a `mov` command.
///
/// # Arguments
///
/// * `arguments` - `[source, target]`
/// * `context` - Registers and ports to resolve against
///
/// # Errors
///
/// Argument count mismatch, or one error per operand that fails to resolve
pub fn create_mov(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let [source, target] = expect_arguments::<2>(arguments)?;

    let mut errors = OperandErrors::default();
    let source = errors.check("source", resolve_readable(source, context));
    let target = errors.check("target", resolve_writable(target, context));

    match (source, target) {
        (Some(source), Some(target)) => Ok(Box::new(MovCommand::new(source, target))),
        _ => Err(errors.into_errors()),
    }
}
