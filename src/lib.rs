//! # Microcontroller Instruction Engine
//!
//! An instruction pipeline and execution engine for the small assembly-like
//! language of puzzle-game microcontrollers.
//!
//! This crate turns program text into command objects bound to concrete I/O
//! endpoints (registers, analog ports and XBus handshake ports), and executes those
//! commands one tick at a time under an external scheduler.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use mcu_engine::io::{GeneralRegister, SyncReadable};
//! use mcu_engine::language::ResolutionContext;
//!
//! let acc = Rc::new(GeneralRegister::new());
//! let mut context = ResolutionContext::new(acc.clone());
//!
//! let mut program = mcu_engine::compile("start: add 5 # count up\n  mul 3", &mut context);
//! assert!(program.succeeded);
//!
//! for container in &mut program.containers {
//!     let command = container.command_mut().unwrap();
//!     assert!(command.execute().is_finished());
//! }
//! assert_eq!(acc.read(), 15);
//! ```
//!
//! ## Architecture
//!
//! - **Tokenizer**: program text to [`InstructionDescription`]s; never fails
//! - **Parameter resolution**: operand tokens to typed I/O handles
//! - **Command resolution**: descriptions to [`CommandContainer`]s, collecting every
//!   error of the program in one pass
//! - **Execution**: each [`Command`] runs once per tick and reports an
//!   [`ExecutionResult`] (finished, blocked or sleeping)
//! - **Table-Driven Design**: every instruction's operands and factory live in
//!   [`INSTRUCTION_TABLE`]
//!
//! The engine is single-threaded. I/O handles are shared through `Rc` and use
//! interior mutability, so several commands and devices can hold the same port.
//!
//! ## Modules
//!
//! - `io` - Readable/writable contracts, registers, literals, analog and XBus ports
//! - `language` - Tokenizer, resolution context and operand resolution
//! - `execution` - Command contract, execution results and the command resolver
//! - `instructions` - One command type per instruction
//! - `instruction_table` - Instruction metadata table
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (tokenizer output and bus transfers at
//! `trace`, resolution failures at `debug`, duplicate labels at `warn`) and never
//! installs a subscriber.

pub mod execution;
pub mod instruction_table;
pub mod instructions;
pub mod io;
pub mod language;

// Re-export public API
pub use execution::{
    Command, CommandContainer, CommandResolver, DeviceState, ExecutionResult, ResolutionResult,
    ResolveError, SleepHandle, TestResult,
};
pub use instruction_table::{InstructionMetadata, OperandKind, INSTRUCTION_TABLE};
pub use language::{tokenize, ExecutionCondition, InstructionDescription, ResolutionContext};

/// Tokenize and resolve a program with the built-in instruction set.
///
/// # Arguments
///
/// * `program` - Program text, one instruction per line
/// * `context` - Registers and ports of the device; receives the program's labels
///
/// # Returns
///
/// One container per instruction, each holding a command or its errors
pub fn compile(program: &str, context: &mut ResolutionContext) -> ResolutionResult {
    let descriptions = tokenize(program);
    CommandResolver::new().resolve(&descriptions, context)
}
