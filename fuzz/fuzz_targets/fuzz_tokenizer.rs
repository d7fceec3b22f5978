//! Fuzz target for tokenization and resolution.
//!
//! This target feeds arbitrary strings through the tokenizer and the command
//! resolver to find panics in line splitting, merging and operand parsing.

#![no_main]

use std::rc::Rc;

use libfuzzer_sys::fuzz_target;
use mcu_engine::io::{AnalogPin, GeneralRegister, XBusLink};
use mcu_engine::{compile, tokenize, ResolutionContext};

fuzz_target!(|data: &[u8]| {
    let source = String::from_utf8_lossy(data);

    let descriptions = tokenize(&source);
    for description in &descriptions {
        assert!(!description.instruction.is_empty());
        assert!(!description.line_numbers.is_empty());
    }

    let (x0, _) = XBusLink::connect(("mc", "x0"), ("peer", "x0"));
    let mut context = ResolutionContext::new(Rc::new(GeneralRegister::new()))
        .with_register("dat", Rc::new(GeneralRegister::new()))
        .with_analog_port("p0", AnalogPin::new("mc", "p0"))
        .with_xbus_port("x0", x0);

    let result = compile(&source, &mut context);
    assert_eq!(result.containers.len(), descriptions.len());
    for container in &result.containers {
        assert_eq!(container.succeeded(), container.errors().is_empty());
    }
});
