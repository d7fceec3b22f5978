//! # Command Execution
//!
//! This module contains the contract every executable instruction obeys and the
//! result type a command reports back to the driver each tick.
//!
//! ## Execution Model
//!
//! An external driver advances a device by calling [`Command::execute`] on its
//! current command exactly once per tick and then interprets the
//! [`ExecutionResult`]:
//!
//! | Device state | Finished | Driver action |
//! |--------------|----------|---------------|
//! | `Running`    | yes      | advance to the next instruction, or to `destination()` if set |
//! | `Blocked`    | no       | call the same command again next tick |
//! | `Sleeping`   | no       | report elapsed time through the sleep handle (if any), then call the same command again |
//!
//! Commands are stateful across ticks: a command that already read some operands
//! keeps them and only retries what failed. That cache is cleared only when the
//! command finishes.

use std::cell::Cell;
use std::rc::Rc;

pub mod resolver;

pub use resolver::{
    CommandContainer, CommandFactory, CommandResolver, ResolutionResult, ResolveError,
};

/// An executable instruction bound to concrete I/O endpoints.
///
/// # Examples
///
/// ```
/// use mcu_engine::execution::{Command, ExecutionResult};
///
/// struct Idle;
///
/// impl Command for Idle {
///     fn execute(&mut self) -> ExecutionResult {
///         ExecutionResult::finished()
///     }
/// }
///
/// let mut idle = Idle;
/// assert!(idle.execute().is_finished());
/// ```
pub trait Command {
    /// Run one tick's worth of this instruction.
    fn execute(&mut self) -> ExecutionResult;
}

/// Device state implied by one tick's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// The command finished; the device proceeds.
    Running,

    /// The command waits for time to pass.
    Sleeping,

    /// The command waits for an operand or a target to become available.
    Blocked,
}

/// Outcome of a test instruction.
///
/// `None` is a real outcome ("tested, neither branch enabled"), distinct from a
/// result that carries no test at all (`Option::None` on
/// [`ExecutionResult::test_result`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    /// Neither `+` nor `-` instructions are enabled.
    None,

    /// `+` instructions are enabled.
    Success,

    /// `-` instructions are enabled.
    Failure,
}

/// Shared countdown a sleeping command hands to the driver.
///
/// The command and the driver hold clones of the same handle. The command arms
/// it with a duration; the driver reports elapsed time units with
/// [`handle_sleep`](Self::handle_sleep); the command checks
/// [`is_pending`](Self::is_pending) on its next tick.
#[derive(Debug, Clone, Default)]
pub struct SleepHandle {
    remaining: Rc<Cell<Option<i32>>>,
}

impl SleepHandle {
    /// Create a handle with no sleep requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time units left before the sleep completes, if a sleep was requested.
    pub fn remaining(&self) -> Option<i32> {
        self.remaining.get()
    }

    /// Whether a sleep was requested and has time left.
    pub fn is_pending(&self) -> bool {
        matches!(self.remaining.get(), Some(remaining) if remaining > 0)
    }

    /// Report that `time_units` have elapsed.
    ///
    /// Non-positive amounts are ignored.
    ///
    /// # Panics
    ///
    /// Panics if no sleep was requested. Reporting elapsed time to a command that
    /// is not sleeping means the driver broke the command's state machine.
    pub fn handle_sleep(&self, time_units: i32) {
        let Some(remaining) = self.remaining.get() else {
            panic!("sleep handle received {time_units} time units but no sleep was requested");
        };
        if time_units > 0 {
            self.remaining.set(Some(remaining.saturating_sub(time_units)));
        }
    }

    pub(crate) fn arm(&self, time_units: i32) {
        self.remaining.set(Some(time_units));
    }

    pub(crate) fn disarm(&self) {
        self.remaining.set(None);
    }
}

/// One tick's outcome for one command.
///
/// Built through the constructors only, so a result never combines a jump or a
/// test result with a blocked or sleeping state.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    state: DeviceState,
    destination: Option<String>,
    test_result: Option<TestResult>,
    sleep_handle: Option<SleepHandle>,
}

impl ExecutionResult {
    /// The command completed; proceed to the next instruction.
    pub fn finished() -> Self {
        Self {
            state: DeviceState::Running,
            destination: None,
            test_result: None,
            sleep_handle: None,
        }
    }

    /// The command is waiting for time to pass.
    ///
    /// # Arguments
    ///
    /// * `sleep_handle` - Countdown to report elapsed time to, or `None` for a
    ///   conditional sleep that simply polls again next tick
    pub fn sleeping(sleep_handle: Option<SleepHandle>) -> Self {
        Self {
            state: DeviceState::Sleeping,
            sleep_handle,
            ..Self::finished()
        }
    }

    /// The command is waiting for an operand or a target.
    pub fn blocked() -> Self {
        Self {
            state: DeviceState::Blocked,
            ..Self::finished()
        }
    }

    /// The command completed and the device continues at `label`.
    pub fn jump_to(label: impl Into<String>) -> Self {
        Self {
            destination: Some(label.into()),
            ..Self::finished()
        }
    }

    /// The command completed and produced a test result.
    pub fn with_test_result(test_result: TestResult) -> Self {
        Self {
            test_result: Some(test_result),
            ..Self::finished()
        }
    }

    /// Whether the device may leave this command.
    pub fn is_finished(&self) -> bool {
        self.state == DeviceState::Running
    }

    /// Device state after this tick.
    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Label to continue at instead of the next instruction.
    pub fn destination(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    /// Test result to store for the next conditional instruction.
    pub fn test_result(&self) -> Option<TestResult> {
        self.test_result
    }

    /// Countdown to report elapsed time to while sleeping.
    pub fn sleep_handle(&self) -> Option<&SleepHandle> {
        self.sleep_handle.as_ref()
    }
}
