//! Shared mocks for the integration tests.
//!
//! Sources and targets count every access so tests can check that a command
//! reads each operand exactly once and never writes while blocked.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mcu_engine::io::{
    AnalogPort, GeneralRegister, Readable, Register, SyncReadable, SyncWritable, Writable,
};
use mcu_engine::language::ResolutionContext;

/// A readable whose availability the test controls.
#[derive(Debug, Default)]
pub struct TestSource {
    value: Cell<Option<i32>>,
    reads: Cell<usize>,
}

impl TestSource {
    /// A source that yields `value` on every read.
    pub fn available(value: i32) -> Rc<Self> {
        Rc::new(Self {
            value: Cell::new(Some(value)),
            reads: Cell::new(0),
        })
    }

    /// A source that fails every read until [`set`](Self::set) is called.
    pub fn unavailable() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn set(&self, value: Option<i32>) {
        self.value.set(value);
    }

    /// Reads attempted so far, successful or not.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl Readable for TestSource {
    fn try_read(&self) -> Option<i32> {
        self.reads.set(self.reads.get() + 1);
        self.value.get()
    }
}

/// A writable that records accepted values.
#[derive(Debug)]
pub struct TestTarget {
    accepting: Cell<bool>,
    attempts: Cell<usize>,
    written: RefCell<Vec<i32>>,
}

impl TestTarget {
    pub fn accepting() -> Rc<Self> {
        Rc::new(Self {
            accepting: Cell::new(true),
            attempts: Cell::new(0),
            written: RefCell::new(Vec::new()),
        })
    }

    pub fn rejecting() -> Rc<Self> {
        let target = Self::accepting();
        target.accepting.set(false);
        target
    }

    pub fn set_accepting(&self, accepting: bool) {
        self.accepting.set(accepting);
    }

    /// Writes attempted so far, accepted or not.
    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }

    pub fn written(&self) -> Vec<i32> {
        self.written.borrow().clone()
    }
}

impl Writable for TestTarget {
    fn try_write(&self, value: i32) -> bool {
        self.attempts.set(self.attempts.get() + 1);
        if self.accepting.get() {
            self.written.borrow_mut().push(value);
        }
        self.accepting.get()
    }
}

/// A register that stores whatever it is given, without clamping.
///
/// Lets tests see the exact value a command writes.
#[derive(Debug, Default)]
pub struct RawRegister {
    value: Cell<i32>,
}

impl RawRegister {
    pub fn with_value(value: i32) -> Rc<Self> {
        Rc::new(Self {
            value: Cell::new(value),
        })
    }
}

impl SyncReadable for RawRegister {
    fn read(&self) -> i32 {
        self.value.get()
    }
}

impl SyncWritable for RawRegister {
    fn write(&self, value: i32) {
        self.value.set(value);
    }
}

impl Register for RawRegister {}

/// An analog port that records every write.
#[derive(Debug, Default)]
pub struct TestAnalogPort {
    written: RefCell<Vec<i32>>,
}

impl TestAnalogPort {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn written(&self) -> Vec<i32> {
        self.written.borrow().clone()
    }
}

impl SyncReadable for TestAnalogPort {
    fn read(&self) -> i32 {
        self.written.borrow().last().copied().unwrap_or(0)
    }
}

impl SyncWritable for TestAnalogPort {
    fn write(&self, value: i32) {
        self.written.borrow_mut().push(value);
    }
}

impl AnalogPort for TestAnalogPort {}

/// Box a shared source for a command constructor.
pub fn boxed(source: &Rc<TestSource>) -> Box<dyn Readable> {
    Box::new(source.clone())
}

/// Box a literal value for a command constructor.
pub fn literal(value: i32) -> Box<dyn Readable> {
    Box::new(mcu_engine::io::IntegerLiteral::new(value))
}

pub fn setup_accumulator(value: i32) -> Rc<GeneralRegister> {
    Rc::new(GeneralRegister::with_value(value))
}

/// A context with `acc` and the general registers `dat`.
pub fn setup_context() -> (Rc<GeneralRegister>, ResolutionContext) {
    let acc = setup_accumulator(0);
    let dat = Rc::new(GeneralRegister::new());
    let context = ResolutionContext::new(acc.clone()).with_register("dat", dat);
    (acc, context)
}

/// Turn `&["a", "b"]` into owned argument strings.
pub fn args(arguments: &[&str]) -> Vec<String> {
    arguments.iter().map(|a| a.to_string()).collect()
}
