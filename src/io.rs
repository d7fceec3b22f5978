//! # I/O Contracts
//!
//! This module provides the traits that decouple commands from the concrete
//! endpoints they talk to. Every operand a command touches is reached through one
//! of two families of accessors:
//!
//! - **Possibly-failing** ([`Readable`], [`Writable`]): a read may report that no
//!   value is available yet, a write may report that the target cannot accept a
//!   value now. Bus ports live here, and a failure is what makes a command block.
//! - **Synchronous** ([`SyncReadable`], [`SyncWritable`]): reads and writes always
//!   succeed. Registers and analog ports live here.
//!
//! Synchronous endpoints are lifted into the possibly-failing family with
//! [`SyncReadableWrapper`] and [`SyncWritableWrapper`], so a command only ever
//! sees one interface.
//!
//! ## Design Principles
//!
//! - Handles are shared (`Rc`), never owned by a single command
//! - `&self` everywhere: endpoints use interior mutability, execution is
//!   single-threaded and cooperative
//! - Values are clamped by the endpoint that stores them, never by the command
//!
//! ## Submodules
//!
//! - `register` - General-purpose and null registers
//! - `literal` - Integer literals used as read-only operands
//! - `analog` - Analog ports and the analog network contract
//! - `xbus` - Handshake bus ports and the mailbox link

use std::rc::Rc;

pub mod analog;
pub mod literal;
pub mod register;
pub mod xbus;

pub use analog::{AnalogNetwork, AnalogNetworkNode, AnalogPin, AnalogPort};
pub use literal::{IntegerLiteral, LiteralError, LITERAL_MAX, LITERAL_MIN};
pub use register::{GeneralRegister, NullRegister, Register};
pub use xbus::{NodeId, XBusEndpoint, XBusError, XBusLink, XBusNetwork, XBusNodeState, XBusPort};

/// Smallest value a register can hold.
pub const REGISTER_MIN: i32 = -999;

/// Largest value a register can hold.
pub const REGISTER_MAX: i32 = 999;

/// Value driven by an analog port in its low state.
pub const ANALOG_LOW: i32 = 0;

/// Value driven by an analog port in its high state.
pub const ANALOG_HIGH: i32 = 100;

/// Constrain a value to the register range [-999, 999].
///
/// Out-of-range values are truncated to the nearest bound, never wrapped.
///
/// # Examples
///
/// ```
/// use mcu_engine::io::constrain_for_register;
///
/// assert_eq!(constrain_for_register(1000), 999);
/// assert_eq!(constrain_for_register(-5000), -999);
/// assert_eq!(constrain_for_register(42), 42);
/// ```
pub fn constrain_for_register(value: i32) -> i32 {
    value.clamp(REGISTER_MIN, REGISTER_MAX)
}

/// Constrain a value to the range a bus transfer can carry (same as a register).
pub fn constrain_for_xbus(value: i32) -> i32 {
    value.clamp(REGISTER_MIN, REGISTER_MAX)
}

/// Constrain a value to the analog range [0, 100].
pub fn constrain_for_analog(value: i32) -> i32 {
    value.clamp(ANALOG_LOW, ANALOG_HIGH)
}

/// A single-value source whose read may fail.
///
/// A failed read (`None`) means "no value available yet"; the caller is expected to
/// retry on a later tick. Reading may have side effects (a bus read drains the
/// mailbox), so callers must cache whatever they have already read.
///
/// # Examples
///
/// ```
/// use mcu_engine::io::{IntegerLiteral, Readable};
///
/// let literal = IntegerLiteral::new(42);
/// assert_eq!(literal.try_read(), Some(42));
/// ```
pub trait Readable {
    /// Attempt to read the current value.
    ///
    /// # Returns
    ///
    /// `Some(value)` if a value was available, `None` if the caller must retry later
    fn try_read(&self) -> Option<i32>;
}

/// A single-value target whose write may fail.
pub trait Writable {
    /// Attempt to write a value.
    ///
    /// # Returns
    ///
    /// `true` if the target accepted the value, `false` if it cannot accept one now
    fn try_write(&self, value: i32) -> bool;
}

/// A source whose read always succeeds.
pub trait SyncReadable {
    /// Read the current value.
    fn read(&self) -> i32;
}

/// A target whose write always succeeds.
///
/// Implementations clamp the value to their legal range.
pub trait SyncWritable {
    /// Write a value, replacing the previous one.
    fn write(&self, value: i32);
}

impl<T: Readable + ?Sized> Readable for Rc<T> {
    fn try_read(&self) -> Option<i32> {
        (**self).try_read()
    }
}

impl<T: Writable + ?Sized> Writable for Rc<T> {
    fn try_write(&self, value: i32) -> bool {
        (**self).try_write(value)
    }
}

impl<T: SyncReadable + ?Sized> SyncReadable for Rc<T> {
    fn read(&self) -> i32 {
        (**self).read()
    }
}

impl<T: SyncWritable + ?Sized> SyncWritable for Rc<T> {
    fn write(&self, value: i32) {
        (**self).write(value)
    }
}

/// Lifts a [`SyncReadable`] into a [`Readable`] that never fails.
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use mcu_engine::io::{GeneralRegister, Readable, SyncReadableWrapper, SyncWritable};
///
/// let register = Rc::new(GeneralRegister::new());
/// register.write(7);
///
/// let readable = SyncReadableWrapper::new(register);
/// assert_eq!(readable.try_read(), Some(7));
/// ```
#[derive(Debug, Clone)]
pub struct SyncReadableWrapper<S> {
    source: S,
}

impl<S: SyncReadable> SyncReadableWrapper<S> {
    /// Wrap a synchronous source.
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: SyncReadable> Readable for SyncReadableWrapper<S> {
    fn try_read(&self) -> Option<i32> {
        Some(self.source.read())
    }
}

/// Lifts a [`SyncWritable`] into a [`Writable`] that always accepts.
#[derive(Debug, Clone)]
pub struct SyncWritableWrapper<T> {
    target: T,
}

impl<T: SyncWritable> SyncWritableWrapper<T> {
    /// Wrap a synchronous target.
    pub fn new(target: T) -> Self {
        Self { target }
    }
}

impl<T: SyncWritable> Writable for SyncWritableWrapper<T> {
    fn try_write(&self, value: i32) -> bool {
        self.target.write(value);
        true
    }
}
