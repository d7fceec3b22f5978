//! Operand resolution: from an operand token to a typed handle
//!
//! | Function | Lookup order | Literal fallback |
//! |----------|--------------|------------------|
//! | [`resolve_readable`] | register, analog port, bus port | yes |
//! | [`resolve_writable`] | register, analog port, bus port | no |
//! | [`resolve_analog_port`] | analog port | no |
//! | [`resolve_xbus_port`] | bus port | no |
//!
//! Registers and analog ports are wrapped so their reads and writes always
//! succeed. Bus ports are handed out as they are, because their failures are what
//! make a command block.

use std::rc::Rc;

use crate::io::{
    AnalogPort, IntegerLiteral, LiteralError, Readable, SyncReadableWrapper, SyncWritableWrapper,
    Writable, XBusPort,
};

use super::context::ResolutionContext;

/// Why an operand token could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParameterError {
    /// No register, port or literal matches the token
    #[error("invalid or unavailable register: {0}")]
    InvalidRegister(String),

    /// No analog port matches the token
    #[error("invalid or unavailable analog port: {0}")]
    InvalidAnalogPort(String),

    /// No bus port matches the token
    #[error("invalid or unavailable XBus port: {0}")]
    InvalidXBusPort(String),

    /// The token is an integer, but outside the literal range
    #[error(transparent)]
    Literal(#[from] LiteralError),
}

/// Resolve an operand that will be read.
///
/// # Arguments
///
/// * `argument` - The operand token
/// * `context` - Registers and ports the program may use
///
/// # Returns
///
/// A readable handle, or [`ParameterError::Literal`] for out-of-range numbers and
/// [`ParameterError::InvalidRegister`] for everything else
///
/// # Examples
///
/// ```
/// use std::rc::Rc;
/// use mcu_engine::io::{GeneralRegister, Readable};
/// use mcu_engine::language::context::ResolutionContext;
/// use mcu_engine::language::parameters::{resolve_readable, ParameterError};
///
/// let context = ResolutionContext::new(Rc::new(GeneralRegister::with_value(5)));
///
/// assert_eq!(resolve_readable("acc", &context).unwrap().try_read(), Some(5));
/// assert_eq!(resolve_readable("-12", &context).unwrap().try_read(), Some(-12));
/// assert_eq!(
///     resolve_readable("x9", &context).err(),
///     Some(ParameterError::InvalidRegister("x9".to_string()))
/// );
/// ```
pub fn resolve_readable(
    argument: &str,
    context: &ResolutionContext,
) -> Result<Box<dyn Readable>, ParameterError> {
    if let Some(register) = context.registers.get(argument) {
        return Ok(Box::new(SyncReadableWrapper::new(register.clone())));
    }
    if let Some(port) = context.analog_ports.get(argument) {
        return Ok(Box::new(SyncReadableWrapper::new(port.clone())));
    }
    if let Some(port) = context.xbus_ports.get(argument) {
        return Ok(Box::new(port.clone()));
    }

    match IntegerLiteral::parse(argument) {
        Ok(literal) => Ok(Box::new(literal)),
        Err(LiteralError::NotANumber(_)) => {
            Err(ParameterError::InvalidRegister(argument.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Resolve an operand that will be written.
pub fn resolve_writable(
    argument: &str,
    context: &ResolutionContext,
) -> Result<Box<dyn Writable>, ParameterError> {
    if let Some(register) = context.registers.get(argument) {
        return Ok(Box::new(SyncWritableWrapper::new(register.clone())));
    }
    if let Some(port) = context.analog_ports.get(argument) {
        return Ok(Box::new(SyncWritableWrapper::new(port.clone())));
    }
    if let Some(port) = context.xbus_ports.get(argument) {
        return Ok(Box::new(port.clone()));
    }
    Err(ParameterError::InvalidRegister(argument.to_string()))
}

/// Look up an analog port by name.
pub fn resolve_analog_port(
    argument: &str,
    context: &ResolutionContext,
) -> Result<Rc<dyn AnalogPort>, ParameterError> {
    context
        .analog_ports
        .get(argument)
        .cloned()
        .ok_or_else(|| ParameterError::InvalidAnalogPort(argument.to_string()))
}

/// Look up a bus port by name.
pub fn resolve_xbus_port(
    argument: &str,
    context: &ResolutionContext,
) -> Result<Rc<dyn XBusPort>, ParameterError> {
    context
        .xbus_ports
        .get(argument)
        .cloned()
        .ok_or_else(|| ParameterError::InvalidXBusPort(argument.to_string()))
}
