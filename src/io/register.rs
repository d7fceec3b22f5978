//! Register implementations.
//!
//! Registers are synchronous storage cells: reads never block and writes always
//! succeed, clamped to [`REGISTER_MIN`](super::REGISTER_MIN)..=[`REGISTER_MAX`](super::REGISTER_MAX).

use std::cell::Cell;

use super::{constrain_for_register, SyncReadable, SyncWritable};

/// Marker trait for anything that can stand in as a named register.
///
/// A register is both synchronously readable and writable. The accumulator and
/// the `dat` register of a device are registers, and so is `null`.
pub trait Register: SyncReadable + SyncWritable {}

/// Simple general-purpose register.
///
/// # Examples
///
/// ```rust
/// use mcu_engine::io::{GeneralRegister, SyncReadable, SyncWritable};
///
/// let acc = GeneralRegister::new();
///
/// acc.write(596);
/// assert_eq!(acc.read(), 596);
///
/// // Writes are clamped, not wrapped
/// acc.write(1000);
/// assert_eq!(acc.read(), 999);
/// ```
#[derive(Debug, Default)]
pub struct GeneralRegister {
    value: Cell<i32>,
}

impl GeneralRegister {
    /// Create a new register holding zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a register preloaded with a value (clamped to the register range).
    ///
    /// # Arguments
    ///
    /// * `value` - Initial register contents
    pub fn with_value(value: i32) -> Self {
        Self {
            value: Cell::new(constrain_for_register(value)),
        }
    }
}

impl SyncReadable for GeneralRegister {
    fn read(&self) -> i32 {
        self.value.get()
    }
}

impl SyncWritable for GeneralRegister {
    fn write(&self, value: i32) {
        self.value.set(constrain_for_register(value));
    }
}

impl Register for GeneralRegister {}

/// The `null` register: reads as zero, discards writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRegister;

impl SyncReadable for NullRegister {
    fn read(&self) -> i32 {
        0
    }
}

impl SyncWritable for NullRegister {
    fn write(&self, _value: i32) {}
}

impl Register for NullRegister {}
