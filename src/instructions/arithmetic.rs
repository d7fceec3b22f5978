//! # Arithmetic Instructions
//!
//! This module implements the accumulator operations:
//! - ADD, SUB, MUL: Combine the accumulator with a value
//! - NOT: Logical negation on the 0/100 scale
//! - DGT: Isolate one decimal digit
//! - DST: Replace one decimal digit
//!
//! Results are written back unclamped; the accumulator register applies its own
//! range when it stores them.

use std::rc::Rc;

use crate::execution::{Command, ExecutionResult, ResolveError};
use crate::io::{Readable, Register, SyncReadable, SyncWritable};
use crate::language::{resolve_readable, ResolutionContext};

use super::{expect_arguments, CachedOperand, OperandErrors};

/// `add value`: `acc = acc + value`
pub struct AddCommand {
    accumulator: Rc<dyn Register>,
    value: CachedOperand,
}

impl AddCommand {
    /// Create an `add` command on the accumulator.
    ///
    /// # Arguments
    ///
    /// * `accumulator` - Register the result is written back to
    /// * `value` - Operand combined with the accumulator
    pub fn new(accumulator: Rc<dyn Register>, value: Box<dyn Readable>) -> Self {
        Self {
            accumulator,
            value: CachedOperand::new(value),
        }
    }
}

impl Command for AddCommand {
    fn execute(&mut self) -> ExecutionResult {
        let Some(value) = self.value.fetch() else {
            return ExecutionResult::blocked();
        };

        self.accumulator
            .write(self.accumulator.read().saturating_add(value));
        self.value.clear();
        ExecutionResult::finished()
    }
}

/// `sub value`: `acc = acc - value`
pub struct SubCommand {
    accumulator: Rc<dyn Register>,
    value: CachedOperand,
}

impl SubCommand {
    /// Create a `sub` command; `value` is subtracted from the accumulator.
    pub fn new(accumulator: Rc<dyn Register>, value: Box<dyn Readable>) -> Self {
        Self {
            accumulator,
            value: CachedOperand::new(value),
        }
    }
}

impl Command for SubCommand {
    fn execute(&mut self) -> ExecutionResult {
        let Some(value) = self.value.fetch() else {
            return ExecutionResult::blocked();
        };

        self.accumulator
            .write(self.accumulator.read().saturating_sub(value));
        self.value.clear();
        ExecutionResult::finished()
    }
}

/// `mul value`: `acc = acc * value`
pub struct MulCommand {
    accumulator: Rc<dyn Register>,
    value: CachedOperand,
}

impl MulCommand {
    /// Create a `mul` command; the accumulator is multiplied by `value`.
    pub fn new(accumulator: Rc<dyn Register>, value: Box<dyn Readable>) -> Self {
        Self {
            accumulator,
            value: CachedOperand::new(value),
        }
    }
}

impl Command for MulCommand {
    fn execute(&mut self) -> ExecutionResult {
        let Some(value) = self.value.fetch() else {
            return ExecutionResult::blocked();
        };

        self.accumulator
            .write(self.accumulator.read().saturating_mul(value));
        self.value.clear();
        ExecutionResult::finished()
    }
}

/// Logical true on the accumulator's 0/100 scale.
const LOGIC_TRUE: i32 = 100;

/// Logical false on the accumulator's 0/100 scale.
const LOGIC_FALSE: i32 = 0;

/// `not`: 0 becomes 100, anything else becomes 0.
pub struct NotCommand {
    accumulator: Rc<dyn Register>,
}

impl NotCommand {
    /// Create a `not` command on the accumulator.
    pub fn new(accumulator: Rc<dyn Register>) -> Self {
        Self { accumulator }
    }
}

impl Command for NotCommand {
    fn execute(&mut self) -> ExecutionResult {
        let negated = if self.accumulator.read() == 0 {
            LOGIC_TRUE
        } else {
            LOGIC_FALSE
        };
        self.accumulator.write(negated);
        ExecutionResult::finished()
    }
}

/// `dgt digit`: keep only decimal digit `digit` of the accumulator.
///
/// Digit 0 is the ones place. The sign of the accumulator is kept, so `-596`
/// with digit 1 gives `-9`. Negative digit numbers give 0.
pub struct DgtCommand {
    accumulator: Rc<dyn Register>,
    digit_number: CachedOperand,
}

impl DgtCommand {
    /// Create a `dgt` command reading the digit number from `digit_number`.
    pub fn new(accumulator: Rc<dyn Register>, digit_number: Box<dyn Readable>) -> Self {
        Self {
            accumulator,
            digit_number: CachedOperand::new(digit_number),
        }
    }
}

impl Command for DgtCommand {
    fn execute(&mut self) -> ExecutionResult {
        let Some(digit_number) = self.digit_number.fetch() else {
            return ExecutionResult::blocked();
        };

        self.accumulator
            .write(digit_at(self.accumulator.read(), digit_number));
        self.digit_number.clear();
        ExecutionResult::finished()
    }
}

fn digit_at(value: i32, digit_number: i32) -> i32 {
    u32::try_from(digit_number)
        .ok()
        .and_then(|exponent| 10_i32.checked_pow(exponent))
        .map_or(0, |place| value / place % 10)
}

/// `dst digit value`: set decimal digit `digit` of the accumulator.
///
/// Only digits 0 through 2 exist; other digit numbers leave the accumulator
/// unchanged. The new digit is `value % 10`. A negative digit value flips the sign
/// of the accumulator before the digit is placed, so `dst 0 -7` on `15` gives
/// `-17`.
pub struct DstCommand {
    accumulator: Rc<dyn Register>,
    digit_number: CachedOperand,
    digit_value: CachedOperand,
}

impl DstCommand {
    /// Create a `dst` command.
    ///
    /// # Arguments
    ///
    /// * `accumulator` - Register whose digit is replaced
    /// * `digit_number` - Which decimal digit to replace (0 is the ones place)
    /// * `digit_value` - New digit; only `value % 10` is used
    pub fn new(
        accumulator: Rc<dyn Register>,
        digit_number: Box<dyn Readable>,
        digit_value: Box<dyn Readable>,
    ) -> Self {
        Self {
            accumulator,
            digit_number: CachedOperand::new(digit_number),
            digit_value: CachedOperand::new(digit_value),
        }
    }
}

impl Command for DstCommand {
    fn execute(&mut self) -> ExecutionResult {
        let Some(digit_number) = self.digit_number.fetch() else {
            return ExecutionResult::blocked();
        };
        let Some(digit_value) = self.digit_value.fetch() else {
            return ExecutionResult::blocked();
        };

        let accumulator = self.accumulator.read();
        self.accumulator
            .write(with_digit(accumulator, digit_number, digit_value));

        self.digit_number.clear();
        self.digit_value.clear();
        ExecutionResult::finished()
    }
}

fn with_digit(value: i32, digit_number: i32, digit_value: i32) -> i32 {
    if !(0..=2).contains(&digit_number) {
        return value;
    }

    let digit = digit_value % 10;
    let value = if digit < 0 { -value } else { value };
    let place = 10_i32.pow(digit_number as u32);

    let upper = value / (place * 10) * place * 10;
    let lower = value % place;
    upper + digit * place + lower
}

/// Resolve the single readable operand of an accumulator instruction.
fn accumulator_operand(
    arguments: &[String],
    context: &ResolutionContext,
    role: &'static str,
) -> Result<Box<dyn Readable>, Vec<ResolveError>> {
    let [value] = expect_arguments::<1>(arguments)?;
    resolve_readable(value, context).map_err(|error| vec![ResolveError::operand(role)(error)])
}

/// Build an `add` command.
pub fn create_add(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let value = accumulator_operand(arguments, context, "input value")?;
    Ok(Box::new(AddCommand::new(context.accumulator.clone(), value)))
}

/// Build a `sub` command.
pub fn create_sub(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let value = accumulator_operand(arguments, context, "input value")?;
    Ok(Box::new(SubCommand::new(context.accumulator.clone(), value)))
}

/// Build a `mul` command.
pub fn create_mul(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let value = accumulator_operand(arguments, context, "input value")?;
    Ok(Box::new(MulCommand::new(context.accumulator.clone(), value)))
}

/// Build a `not` command.
pub fn create_not(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    expect_arguments::<0>(arguments)?;
    Ok(Box::new(NotCommand::new(context.accumulator.clone())))
}

/// Build a `dgt` command.
pub fn create_dgt(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let digit_number = accumulator_operand(arguments, context, "digit number")?;
    Ok(Box::new(DgtCommand::new(
        context.accumulator.clone(),
        digit_number,
    )))
}

/// Build a `dst` command.
///
/// # Errors
///
/// Argument count mismatch, or one error per operand that fails to resolve
pub fn create_dst(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let [digit_number, digit_value] = expect_arguments::<2>(arguments)?;

    let mut errors = OperandErrors::default();
    let digit_number = errors.check("digit number", resolve_readable(digit_number, context));
    let digit_value = errors.check("digit value", resolve_readable(digit_value, context));

    match (digit_number, digit_value) {
        (Some(digit_number), Some(digit_value)) => Ok(Box::new(DstCommand::new(
            context.accumulator.clone(),
            digit_number,
            digit_value,
        ))),
        _ => Err(errors.into_errors()),
    }
}
