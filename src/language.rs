//! Program text processing: tokenization and operand resolution.

pub mod context;
pub mod parameters;
pub mod tokenizer;

pub use context::ResolutionContext;
pub use parameters::{
    resolve_analog_port, resolve_readable, resolve_writable, resolve_xbus_port, ParameterError,
};
pub use tokenizer::{tokenize, ExecutionCondition, InstructionDescription};
