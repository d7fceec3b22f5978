//! # Instruction Metadata Table
//!
//! This module contains the table that serves as the single source of truth for
//! the instruction set: every mnemonic, the operands it takes and the factory
//! that builds its command.
//!
//! | Mnemonic | Operands | Effect |
//! |----------|----------|--------|
//! | `mov` | readable, writable | copy a value |
//! | `add` | readable | `acc += value` |
//! | `sub` | readable | `acc -= value` |
//! | `mul` | readable | `acc *= value` |
//! | `not` | | `acc = acc == 0 ? 100 : 0` |
//! | `dgt` | readable | isolate one decimal digit of `acc` |
//! | `dst` | readable, readable | replace one decimal digit of `acc` |
//! | `teq` | readable, readable | test `a == b` |
//! | `tgt` | readable, readable | test `a > b` |
//! | `tlt` | readable, readable | test `a < b` |
//! | `tcp` | readable, readable | three-way compare |
//! | `jmp` | label | continue at a label |
//! | `nop` | | do nothing |
//! | `slp` | readable | sleep for a number of time units |
//! | `slx` | bus port | sleep until the bus port has a value |
//! | `gen` | analog port, readable, readable | emit one high/low pulse |

use crate::execution::{Command, ResolveError};
use crate::instructions::{arithmetic, compare, control, timing, transfer};
use crate::language::ResolutionContext;

/// Signature of an instruction factory.
pub type FactoryFn =
    fn(&[String], &ResolutionContext) -> Result<Box<dyn Command>, Vec<ResolveError>>;

/// What an operand position accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// Register, analog port, bus port or integer literal
    Readable,

    /// Register, analog port or bus port
    Writable,

    /// Analog port only
    AnalogPort,

    /// Bus port only
    XBusPort,

    /// A label defined somewhere in the program
    Label,
}

/// Static information about one instruction.
///
/// # Examples
///
/// ```
/// use mcu_engine::instruction_table::{lookup, OperandKind};
///
/// let mov = lookup("mov").unwrap();
/// assert_eq!(mov.operands, &[OperandKind::Readable, OperandKind::Writable]);
/// assert_eq!(mov.operand_count(), 2);
/// ```
#[derive(Clone, Copy)]
pub struct InstructionMetadata {
    /// Instruction name as written in programs.
    pub mnemonic: &'static str,

    /// Operand kinds, in order.
    pub operands: &'static [OperandKind],

    /// Builds the command from operand tokens.
    pub factory: FactoryFn,
}

impl InstructionMetadata {
    /// Number of operands the instruction takes.
    pub fn operand_count(&self) -> usize {
        self.operands.len()
    }
}

impl std::fmt::Debug for InstructionMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstructionMetadata")
            .field("mnemonic", &self.mnemonic)
            .field("operands", &self.operands)
            .finish_non_exhaustive()
    }
}

use OperandKind::{AnalogPort, Label, Readable, Writable, XBusPort};

/// Every instruction the built-in resolver knows.
pub static INSTRUCTION_TABLE: [InstructionMetadata; 16] = [
    InstructionMetadata {
        mnemonic: "mov",
        operands: &[Readable, Writable],
        factory: transfer::create_mov,
    },
    InstructionMetadata {
        mnemonic: "add",
        operands: &[Readable],
        factory: arithmetic::create_add,
    },
    InstructionMetadata {
        mnemonic: "sub",
        operands: &[Readable],
        factory: arithmetic::create_sub,
    },
    InstructionMetadata {
        mnemonic: "mul",
        operands: &[Readable],
        factory: arithmetic::create_mul,
    },
    InstructionMetadata {
        mnemonic: "not",
        operands: &[],
        factory: arithmetic::create_not,
    },
    InstructionMetadata {
        mnemonic: "dgt",
        operands: &[Readable],
        factory: arithmetic::create_dgt,
    },
    InstructionMetadata {
        mnemonic: "dst",
        operands: &[Readable, Readable],
        factory: arithmetic::create_dst,
    },
    InstructionMetadata {
        mnemonic: "teq",
        operands: &[Readable, Readable],
        factory: compare::create_teq,
    },
    InstructionMetadata {
        mnemonic: "tgt",
        operands: &[Readable, Readable],
        factory: compare::create_tgt,
    },
    InstructionMetadata {
        mnemonic: "tlt",
        operands: &[Readable, Readable],
        factory: compare::create_tlt,
    },
    InstructionMetadata {
        mnemonic: "tcp",
        operands: &[Readable, Readable],
        factory: compare::create_tcp,
    },
    InstructionMetadata {
        mnemonic: "jmp",
        operands: &[Label],
        factory: control::create_jmp,
    },
    InstructionMetadata {
        mnemonic: "nop",
        operands: &[],
        factory: control::create_nop,
    },
    InstructionMetadata {
        mnemonic: "slp",
        operands: &[Readable],
        factory: timing::create_slp,
    },
    InstructionMetadata {
        mnemonic: "slx",
        operands: &[XBusPort],
        factory: timing::create_slx,
    },
    InstructionMetadata {
        mnemonic: "gen",
        operands: &[AnalogPort, Readable, Readable],
        factory: timing::create_gen,
    },
];

/// Find an instruction by mnemonic.
///
/// Mnemonics are case-sensitive, as in program text.
pub fn lookup(mnemonic: &str) -> Option<&'static InstructionMetadata> {
    INSTRUCTION_TABLE
        .iter()
        .find(|metadata| metadata.mnemonic == mnemonic)
}
