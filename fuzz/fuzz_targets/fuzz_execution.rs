//! Fuzz target for command execution.
//!
//! This target builds programs from arbitrary instructions over a fixed set of
//! operands, then runs them for a bounded number of ticks with arbitrary sleep
//! reports, looking for panics in the command state machines.

#![no_main]

use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mcu_engine::io::{AnalogPin, GeneralRegister, Writable, XBusLink};
use mcu_engine::{compile, ResolutionContext, INSTRUCTION_TABLE};

const OPERANDS: [&str; 8] = ["acc", "dat", "null", "p0", "x0", "0", "-7", "3"];

/// One generated program line
#[derive(Debug, Arbitrary)]
struct FuzzLine {
    /// Index into the instruction table
    instruction: u8,
    /// Indexes into the operand vocabulary
    operands: [u8; 3],
    /// Leading condition marker selector
    condition: u8,
}

#[derive(Debug, Arbitrary)]
struct FuzzProgram {
    lines: Vec<FuzzLine>,
    /// Time units reported to each sleep handle
    sleep_reports: Vec<i8>,
    /// Values the peer device offers on the bus
    bus_values: Vec<i16>,
}

fn render(program: &FuzzProgram) -> String {
    let mut text = String::from("start: nop\n");
    for line in &program.lines {
        let metadata = &INSTRUCTION_TABLE[line.instruction as usize % INSTRUCTION_TABLE.len()];
        let marker = ["", "+ ", "- ", "@ "][line.condition as usize % 4];
        let operands: Vec<&str> = (0..metadata.operand_count())
            .map(|i| match metadata.operands[i] {
                mcu_engine::OperandKind::Label => "start",
                _ => OPERANDS[line.operands[i] as usize % OPERANDS.len()],
            })
            .collect();
        text.push_str(&format!("{}{} {}\n", marker, metadata.mnemonic, operands.join(" ")));
    }
    text
}

fuzz_target!(|program: FuzzProgram| {
    let (x0, peer) = XBusLink::connect(("mc", "x0"), ("peer", "x0"));
    let mut context = ResolutionContext::new(Rc::new(GeneralRegister::new()))
        .with_register("dat", Rc::new(GeneralRegister::new()))
        .with_analog_port("p0", AnalogPin::new("mc", "p0"))
        .with_xbus_port("x0", x0);

    let mut result = compile(&render(&program), &mut context);
    let targets = result.label_targets();
    if result.containers.is_empty() {
        return;
    }

    let mut pc = 0;
    let mut bus_values = program.bus_values.iter();
    for tick in 0..256 {
        if let Some(value) = bus_values.next() {
            peer.try_write(i32::from(*value));
        }

        let Some(command) = result.containers[pc].command_mut() else {
            pc = (pc + 1) % result.containers.len();
            continue;
        };
        let outcome = command.execute();

        if let Some(handle) = outcome.sleep_handle() {
            let report = program.sleep_reports.get(tick % program.sleep_reports.len().max(1));
            handle.handle_sleep(report.copied().map_or(1, i32::from));
        }
        if outcome.is_finished() {
            pc = match outcome.destination() {
                Some(label) => targets[label],
                None => (pc + 1) % result.containers.len(),
            };
        }
    }
});
