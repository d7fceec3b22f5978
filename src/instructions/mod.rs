//! # Instruction Implementations
//!
//! This module contains one command type per instruction, organized by category,
//! together with the factory that builds it from operand tokens.
//!
//! ## Categories
//!
//! - **transfer**: Value movement (MOV)
//! - **arithmetic**: Accumulator arithmetic and digit operations (ADD, SUB, MUL, NOT, DGT, DST)
//! - **compare**: Test instructions setting the test result (TEQ, TGT, TLT, TCP)
//! - **control**: Control flow (JMP, NOP)
//! - **timing**: Time and bus waits (SLP, SLX, GEN)
//!
//! Every operand a command reads goes through a [`CachedOperand`], so a command that
//! blocks after reading some operands keeps those values and never reads them again
//! before it finishes.

use crate::execution::ResolveError;
use crate::io::Readable;
use crate::language::ParameterError;

pub mod arithmetic;
pub mod compare;
pub mod control;
pub mod timing;
pub mod transfer;

pub use arithmetic::{AddCommand, DgtCommand, DstCommand, MulCommand, NotCommand, SubCommand};
pub use compare::{TcpCommand, TeqCommand, TgtCommand, TltCommand};
pub use control::{JmpCommand, NopCommand};
pub use timing::{GenCommand, SlpCommand, SlxCommand};
pub use transfer::MovCommand;

/// A readable operand whose first successful read is kept until cleared.
///
/// # Examples
///
/// ```
/// use mcu_engine::instructions::CachedOperand;
/// use mcu_engine::io::IntegerLiteral;
///
/// let mut operand = CachedOperand::new(Box::new(IntegerLiteral::new(3)));
/// assert_eq!(operand.cached(), None);
/// assert_eq!(operand.fetch(), Some(3));
/// assert_eq!(operand.cached(), Some(3));
///
/// operand.clear();
/// assert_eq!(operand.cached(), None);
/// ```
pub struct CachedOperand {
    source: Box<dyn Readable>,
    value: Option<i32>,
}

impl CachedOperand {
    /// Wrap a readable source with an empty cache.
    pub fn new(source: Box<dyn Readable>) -> Self {
        Self {
            source,
            value: None,
        }
    }

    /// Return the cached value, reading the source only if nothing is cached.
    pub fn fetch(&mut self) -> Option<i32> {
        if self.value.is_none() {
            self.value = self.source.try_read();
        }
        self.value
    }

    /// The cached value, without touching the source.
    pub fn cached(&self) -> Option<i32> {
        self.value
    }

    /// Forget the cached value.
    pub fn clear(&mut self) {
        self.value = None;
    }
}

impl std::fmt::Debug for CachedOperand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedOperand")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Check the operand count and hand out the operands as a fixed-size array.
pub(crate) fn expect_arguments<const N: usize>(
    arguments: &[String],
) -> Result<&[String; N], Vec<ResolveError>> {
    arguments.try_into().map_err(|_| {
        vec![ResolveError::ArgumentCount {
            expected: N,
            found: arguments.len(),
        }]
    })
}

/// Collects operand failures so a factory reports all of them at once.
#[derive(Debug, Default)]
pub(crate) struct OperandErrors {
    errors: Vec<ResolveError>,
}

impl OperandErrors {
    /// Keep a resolved operand, or record why it failed.
    pub(crate) fn check<T>(
        &mut self,
        role: &'static str,
        resolved: Result<T, ParameterError>,
    ) -> Option<T> {
        resolved.map_err(|error| self.errors.push(ResolveError::operand(role)(error))).ok()
    }

    pub(crate) fn into_errors(self) -> Vec<ResolveError> {
        self.errors
    }
}
