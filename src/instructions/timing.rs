//! # Timing Instructions
//!
//! This module implements the instructions that put a device to sleep:
//! - SLP: Sleep for a number of time units
//! - SLX: Sleep until a bus port has a value
//! - GEN: Drive an analog port high, then low, for given durations
//!
//! Timed sleeps hand the driver a [`SleepHandle`] in their `sleeping` result. The
//! driver reports elapsed time through it, and the command checks the countdown
//! on its next tick.

use std::rc::Rc;

use tracing::trace;

use crate::execution::{Command, ExecutionResult, ResolveError, SleepHandle};
use crate::io::{AnalogPort, Readable, SyncWritable, XBusPort, ANALOG_HIGH, ANALOG_LOW};
use crate::language::{resolve_analog_port, resolve_readable, resolve_xbus_port, ResolutionContext};

use super::{expect_arguments, CachedOperand, OperandErrors};

/// `slp duration`
///
/// Reads the duration once and sleeps until that many time units were reported.
/// A duration of zero or less finishes immediately.
pub struct SlpCommand {
    duration: Box<dyn Readable>,
    sleep: SleepHandle,
}

impl SlpCommand {
    /// Create an `slp` command sleeping for the value read from `duration`.
    pub fn new(duration: Box<dyn Readable>) -> Self {
        Self {
            duration,
            sleep: SleepHandle::new(),
        }
    }
}

impl Command for SlpCommand {
    fn execute(&mut self) -> ExecutionResult {
        if self.sleep.remaining().is_none() {
            let Some(duration) = self.duration.try_read() else {
                return ExecutionResult::blocked();
            };
            self.sleep.arm(duration);
        }

        if self.sleep.is_pending() {
            return ExecutionResult::sleeping(Some(self.sleep.clone()));
        }

        self.sleep.disarm();
        ExecutionResult::finished()
    }
}

/// `slx port`
///
/// Sleeps without a handle while the bus port has nothing to read. Finishes as
/// soon as a value is there, leaving it for the next instruction to read.
pub struct SlxCommand {
    port: Rc<dyn XBusPort>,
}

impl SlxCommand {
    /// Create an `slx` command waiting on `port`.
    pub fn new(port: Rc<dyn XBusPort>) -> Self {
        Self { port }
    }
}

impl Command for SlxCommand {
    fn execute(&mut self) -> ExecutionResult {
        if self.port.has_value() {
            ExecutionResult::finished()
        } else {
            ExecutionResult::sleeping(None)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PulsePhase {
    High,
    Low,
}

/// `gen port high low`
///
/// Writes [`ANALOG_HIGH`] to the port and sleeps for `high` time units, then
/// writes [`ANALOG_LOW`] and sleeps for `low` time units. The port is written once
/// per phase. A phase with a duration of zero or less is left on the same tick,
/// so `gen p0 0 3` writes both levels before its first sleep.
pub struct GenCommand {
    port: Rc<dyn AnalogPort>,
    high_duration: CachedOperand,
    low_duration: CachedOperand,
    phase: Option<PulsePhase>,
    sleep: SleepHandle,
}

impl GenCommand {
    /// Create a `gen` command.
    ///
    /// # Arguments
    ///
    /// * `port` - Analog port driven high, then low
    /// * `high_duration` - Time units to stay high
    /// * `low_duration` - Time units to stay low
    pub fn new(
        port: Rc<dyn AnalogPort>,
        high_duration: Box<dyn Readable>,
        low_duration: Box<dyn Readable>,
    ) -> Self {
        Self {
            port,
            high_duration: CachedOperand::new(high_duration),
            low_duration: CachedOperand::new(low_duration),
            phase: None,
            sleep: SleepHandle::new(),
        }
    }

    fn enter(&mut self, phase: PulsePhase, duration: i32) {
        let level = match phase {
            PulsePhase::High => ANALOG_HIGH,
            PulsePhase::Low => ANALOG_LOW,
        };
        trace!(?phase, duration, "pulse phase");
        self.phase = Some(phase);
        self.sleep.arm(duration);
        self.port.write(level);
    }
}

impl Command for GenCommand {
    fn execute(&mut self) -> ExecutionResult {
        let Some(high) = self.high_duration.fetch() else {
            return ExecutionResult::blocked();
        };
        let Some(low) = self.low_duration.fetch() else {
            return ExecutionResult::blocked();
        };

        if self.phase.is_none() {
            self.enter(PulsePhase::High, high);
        }

        if self.phase == Some(PulsePhase::High) {
            if self.sleep.is_pending() {
                return ExecutionResult::sleeping(Some(self.sleep.clone()));
            }
            self.enter(PulsePhase::Low, low);
        }

        if self.sleep.is_pending() {
            return ExecutionResult::sleeping(Some(self.sleep.clone()));
        }

        self.phase = None;
        self.sleep.disarm();
        self.high_duration.clear();
        self.low_duration.clear();
        ExecutionResult::finished()
    }
}

/// Build an `slp` command.
pub fn create_slp(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let [duration] = expect_arguments::<1>(arguments)?;
    let duration = resolve_readable(duration, context)
        .map_err(|error| vec![ResolveError::operand("sleep duration")(error)])?;
    Ok(Box::new(SlpCommand::new(duration)))
}

/// Build an `slx` command.
pub fn create_slx(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let [port] = expect_arguments::<1>(arguments)?;
    let port = resolve_xbus_port(port, context)
        .map_err(|error| vec![ResolveError::operand("XBus port")(error)])?;
    Ok(Box::new(SlxCommand::new(port)))
}

/// Build a `gen` command.
///
/// # Errors
///
/// Argument count mismatch, or one error per operand that fails to resolve
pub fn create_gen(
    arguments: &[String],
    context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    let [port, high, low] = expect_arguments::<3>(arguments)?;

    let mut errors = OperandErrors::default();
    let port = errors.check("analog port", resolve_analog_port(port, context));
    let high = errors.check("high pulse duration", resolve_readable(high, context));
    let low = errors.check("low pulse duration", resolve_readable(low, context));

    match (port, high, low) {
        (Some(port), Some(high), Some(low)) => Ok(Box::new(GenCommand::new(port, high, low))),
        _ => Err(errors.into_errors()),
    }
}
