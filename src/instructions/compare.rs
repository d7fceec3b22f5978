//! # Test Instructions
//!
//! This module implements the instructions that compare two values and report a
//! [`TestResult`]:
//! - TEQ: Equal
//! - TGT: Greater than
//! - TLT: Less than
//! - TCP: Three-way compare
//!
//! Both operands are read in order and cached independently, so a test blocked on
//! its second operand keeps the first.

use std::cmp::Ordering;

use crate::execution::{Command, ExecutionResult, ResolveError, TestResult};
use crate::io::Readable;
use crate::language::{resolve_readable, ResolutionContext};

use super::{expect_arguments, CachedOperand, OperandErrors};

/// The two operands of a test instruction.
struct Comparands {
    first: CachedOperand,
    second: CachedOperand,
}

impl Comparands {
    fn new(first: Box<dyn Readable>, second: Box<dyn Readable>) -> Self {
        Self {
            first: CachedOperand::new(first),
            second: CachedOperand::new(second),
        }
    }

    /// Compare the operands, or return `blocked` if one is not available yet.
    fn test(&mut self, outcome: impl FnOnce(Ordering) -> TestResult) -> ExecutionResult {
        let Some(first) = self.first.fetch() else {
            return ExecutionResult::blocked();
        };
        let Some(second) = self.second.fetch() else {
            return ExecutionResult::blocked();
        };

        self.first.clear();
        self.second.clear();
        ExecutionResult::with_test_result(outcome(first.cmp(&second)))
    }
}

fn success_if(condition: bool) -> TestResult {
    if condition {
        TestResult::Success
    } else {
        TestResult::Failure
    }
}

/// `teq a b`: Success if `a == b`, Failure otherwise.
pub struct TeqCommand {
    operands: Comparands,
}

impl TeqCommand {
    /// Create a `teq` command.
    ///
    /// # Arguments
    ///
    /// * `first` - Left-hand operand, read first
    /// * `second` - Right-hand operand
    pub fn new(first: Box<dyn Readable>, second: Box<dyn Readable>) -> Self {
        Self {
            operands: Comparands::new(first, second),
        }
    }
}

impl Command for TeqCommand {
    fn execute(&mut self) -> ExecutionResult {
        self.operands
            .test(|ordering| success_if(ordering == Ordering::Equal))
    }
}

/// `tgt a b`: Success if `a > b`, Failure otherwise.
pub struct TgtCommand {
    operands: Comparands,
}

impl TgtCommand {
    /// Create a `tgt` command testing `first > second`.
    pub fn new(first: Box<dyn Readable>, second: Box<dyn Readable>) -> Self {
        Self {
            operands: Comparands::new(first, second),
        }
    }
}

impl Command for TgtCommand {
    fn execute(&mut self) -> ExecutionResult {
        self.operands
            .test(|ordering| success_if(ordering == Ordering::Greater))
    }
}

/// `tlt a b`: Success if `a < b`, Failure otherwise.
pub struct TltCommand {
    operands: Comparands,
}

impl TltCommand {
    /// Create a `tlt` command testing `first < second`.
    pub fn new(first: Box<dyn Readable>, second: Box<dyn Readable>) -> Self {
        Self {
            operands: Comparands::new(first, second),
        }
    }
}

impl Command for TltCommand {
    fn execute(&mut self) -> ExecutionResult {
        self.operands
            .test(|ordering| success_if(ordering == Ordering::Less))
    }
}

/// `tcp a b`: Success if `a > b`, Failure if `a < b`, and
/// [`TestResult::None`] if they are equal.
pub struct TcpCommand {
    operands: Comparands,
}

impl TcpCommand {
    /// Create a `tcp` command comparing `first` against `second`.
    pub fn new(first: Box<dyn Readable>, second: Box<dyn Readable>) -> Self {
        Self {
            operands: Comparands::new(first, second),
        }
    }
}

impl Command for TcpCommand {
    fn execute(&mut self) -> ExecutionResult {
        self.operands.test(|ordering| match ordering {
            Ordering::Greater => TestResult::Success,
            Ordering::Less => TestResult::Failure,
            Ordering::Equal => TestResult::None,
        })
    }
}

/// Resolve both operands of a test instruction, reporting every failure.
fn resolve_comparands(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<(Box<dyn Readable>, Box<dyn Readable>), Vec<ResolveError>> {
    let [first, second] = expect_arguments::<2>(arguments)?;

    let mut errors = OperandErrors::default();
    let first = errors.check("first value", resolve_readable(first, context));
    let second = errors.check("second value", resolve_readable(second, context));

    match (first, second) {
        (Some(first), Some(second)) => Ok((first, second)),
        _ => Err(errors.into_errors()),
    }
}

/// Build a `teq` command.
pub fn create_teq(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let (first, second) = resolve_comparands(arguments, context)?;
    Ok(Box::new(TeqCommand::new(first, second)))
}

/// Build a `tgt` command.
pub fn create_tgt(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let (first, second) = resolve_comparands(arguments, context)?;
    Ok(Box::new(TgtCommand::new(first, second)))
}

/// Build a `tlt` command.
pub fn create_tlt(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let (first, second) = resolve_comparands(arguments, context)?;
    Ok(Box::new(TltCommand::new(first, second)))
}

/// Build a `tcp` command.
pub fn create_tcp(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let (first, second) = resolve_comparands(arguments, context)?;
    Ok(Box::new(TcpCommand::new(first, second)))
}
