//! # Control Flow Instructions
//!
//! - JMP: Continue at a label
//! - NOP: Do nothing for one tick

use crate::execution::{Command, ExecutionResult, ResolveError};
use crate::language::ResolutionContext;

use super::expect_arguments;

/// `jmp label`
#[derive(Debug, Clone)]
pub struct JmpCommand {
    label: String,
}

impl JmpCommand {
    /// Create a jump to `label`.
    ///
    /// The label is not checked here; [`create_jmp`] validates it against the
    /// program's labels.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// The label this command jumps to.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Command for JmpCommand {
    fn execute(&mut self) -> ExecutionResult {
        ExecutionResult::jump_to(self.label.as_str())
    }
}

/// `nop`
#[derive(Debug, Clone, Copy, Default)]
pub struct NopCommand;

impl Command for NopCommand {
    fn execute(&mut self) -> ExecutionResult {
        ExecutionResult::finished()
    }
}

/// Build a `jmp` command.
///
/// The label must be one the program defines; the resolver records those in
/// [`ResolutionContext::labels`] before any factory runs.
pub fn create_jmp(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let [label] = expect_arguments::<1>(arguments)?;

    if !context.is_known_label(label) {
        return Err(vec![ResolveError::UnknownLabel(label.clone())]);
    }
    Ok(Box::new(JmpCommand::new(label.as_str())))
}

/// Build a `nop` command.
pub fn create_nop(
    arguments: &[String],
    _context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    expect_arguments::<0>(arguments)?;
    Ok(Box::new(NopCommand))
}
