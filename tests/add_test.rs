//! Tests for the ADD instruction.

mod common;

use common::{args, boxed, literal, setup_accumulator, setup_context, RawRegister, TestSource};
use mcu_engine::execution::{Command, DeviceState};
use mcu_engine::instructions::arithmetic::create_add;
use mcu_engine::instructions::AddCommand;
use mcu_engine::io::SyncReadable;

// ========== Basic ADD Tests ==========

#[test]
fn test_add_basic() {
    let acc = setup_accumulator(10);
    let mut add = AddCommand::new(acc.clone(), literal(5));

    assert!(add.execute().is_finished());
    assert_eq!(acc.read(), 15);
}

#[test]
fn test_add_negative() {
    let acc = setup_accumulator(10);
    let mut add = AddCommand::new(acc.clone(), literal(-25));

    add.execute();
    assert_eq!(acc.read(), -15);
}

#[test]
fn test_add_clamped_by_register() {
    let acc = setup_accumulator(999);
    let mut add = AddCommand::new(acc.clone(), literal(1));

    assert!(add.execute().is_finished());
    assert_eq!(acc.read(), 999);
}

#[test]
fn test_add_writes_unclamped_result() {
    let acc = RawRegister::with_value(999);
    let mut add = AddCommand::new(acc.clone(), literal(1));

    assert!(add.execute().is_finished());
    assert_eq!(acc.read(), 1000);
}

// ========== Blocking Tests ==========

#[test]
fn test_add_blocks_until_value_available() {
    let acc = setup_accumulator(1);
    let source = TestSource::unavailable();
    let mut add = AddCommand::new(acc.clone(), boxed(&source));

    assert_eq!(add.execute().state(), DeviceState::Blocked);
    assert_eq!(add.execute().state(), DeviceState::Blocked);
    assert_eq!(acc.read(), 1);

    source.set(Some(4));
    assert!(add.execute().is_finished());
    assert_eq!(acc.read(), 5);
    assert_eq!(source.reads(), 3);
}

#[test]
fn test_add_reads_fresh_value_each_run() {
    let acc = setup_accumulator(0);
    let source = TestSource::available(2);
    let mut add = AddCommand::new(acc.clone(), boxed(&source));

    add.execute();
    source.set(Some(3));
    add.execute();

    assert_eq!(acc.read(), 5);
}

// ========== Factory Tests ==========

#[test]
fn test_add_factory() {
    let (acc, context) = setup_context();

    let mut add = create_add(&args(&["acc"]), &context).unwrap();
    add.execute();
    assert_eq!(acc.read(), 0);

    let mut add = create_add(&args(&["011"]), &context).unwrap();
    add.execute();
    add.execute();
    assert_eq!(acc.read(), 22);
}

#[test]
fn test_add_factory_errors() {
    let (_, context) = setup_context();

    let errors = create_add(&args(&[]), &context).err().unwrap();
    assert_eq!(errors[0].to_string(), "incorrect argument count (expected 1, found 0)");

    let errors = create_add(&args(&["-1000"]), &context).err().unwrap();
    assert_eq!(
        errors[0].to_string(),
        "failed to resolve input value: value too small: -1000"
    );

    let errors = create_add(&args(&["foo"]), &context).err().unwrap();
    assert_eq!(
        errors[0].to_string(),
        "failed to resolve input value: invalid or unavailable register: foo"
    );
}
