//! Tests for command resolution.
//!
//! Tests cover:
//! - Factory dispatch and failure aggregation with custom factory tables
//! - Duplicate label detection and the label list written to the context
//! - Resolution of real programs against the built-in instruction table

mod common;

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use common::setup_context;
use mcu_engine::execution::{Command, CommandFactory, CommandResolver, ResolveError};
use mcu_engine::instructions::NopCommand;
use mcu_engine::io::SyncReadable;
use mcu_engine::language::{tokenize, ExecutionCondition, InstructionDescription, ResolutionContext};
use mcu_engine::INSTRUCTION_TABLE;

fn succeeding(
    _arguments: &[String],
    _context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    Ok(Box::new(NopCommand))
}

fn failing(
    _arguments: &[String],
    _context: &ResolutionContext,
) -> Result<Box<dyn Command>, Vec<ResolveError>> {
    Err(vec![
        ResolveError::UnknownLabel("first".to_string()),
        ResolveError::UnknownLabel("second".to_string()),
    ])
}

fn setup_resolver() -> CommandResolver {
    let mut factories: HashMap<String, Box<dyn CommandFactory>> = HashMap::new();
    factories.insert("good".to_string(), Box::new(succeeding));
    factories.insert("bad".to_string(), Box::new(failing));
    CommandResolver::with_factories(factories)
}

fn description(labels: &[&str], instruction: &str) -> InstructionDescription {
    InstructionDescription {
        line_numbers: vec![1],
        labels: labels.iter().map(|l| l.to_string()).collect(),
        condition: ExecutionCondition::Always,
        instruction: instruction.to_string(),
        arguments: Vec::new(),
        comment: None,
    }
}

// ========== Custom Factory Tests ==========

#[test]
fn test_resolution_with_errors() {
    let resolver = setup_resolver();
    let (_, mut context) = setup_context();

    let descriptions = vec![
        description(&["label1"], "good"),
        description(&[], "bad"),
        description(&["label2"], "good"),
        description(&[], "unknown"),
    ];

    let result = resolver.resolve(&descriptions, &mut context);

    assert!(!result.succeeded);
    assert_eq!(result.containers.len(), 4);

    assert!(result.containers[0].succeeded());
    assert!(result.containers[0].errors().is_empty());

    assert!(!result.containers[1].succeeded());
    assert_eq!(
        result.containers[1].error_messages(),
        vec!["unknown label: first", "unknown label: second"]
    );

    assert!(result.containers[2].succeeded());

    assert_eq!(
        result.containers[3].errors(),
        &[ResolveError::UnknownInstruction("unknown".to_string())]
    );
    assert_eq!(result.containers[3].description(), &descriptions[3]);

    assert_eq!(context.labels, vec!["label1".to_string(), "label2".to_string()]);
}

#[test]
fn test_successful_resolution() {
    let resolver = setup_resolver();
    let (_, mut context) = setup_context();

    let mut result = resolver.resolve(
        &[description(&["label1"], "good"), description(&["label2"], "good")],
        &mut context,
    );

    assert!(result.succeeded);
    assert!(result.failures().next().is_none());
    assert!(result.containers[0].command_mut().unwrap().execute().is_finished());
    assert_eq!(context.labels, vec!["label1".to_string(), "label2".to_string()]);
}

#[test]
fn test_duplicate_labels() {
    let resolver = setup_resolver();
    let (_, mut context) = setup_context();

    let descriptions = vec![
        description(&["label1"], "good"),
        description(&["label2"], "good"),
        description(&["label1"], "good"),
        description(&["label2"], "good"),
    ];

    let mut result = resolver.resolve(&descriptions, &mut context);

    assert!(!result.succeeded);
    assert!(result.containers[0].succeeded());
    assert!(result.containers[1].succeeded());
    assert_eq!(result.containers[2].error_messages(), vec!["duplicate label: label1"]);
    assert_eq!(result.containers[3].error_messages(), vec!["duplicate label: label2"]);

    // A container that failed label checks never carries a command
    assert!(result.containers[2].command_mut().is_none());

    assert_eq!(context.labels, vec!["label1".to_string(), "label2".to_string()]);
}

#[test]
fn test_duplicate_label_within_one_description() {
    let resolver = setup_resolver();
    let (_, mut context) = setup_context();

    let result = resolver.resolve(&[description(&["a", "a", "a"], "good")], &mut context);

    assert_eq!(
        result.containers[0].error_messages(),
        vec!["duplicate label: a", "duplicate label: a"]
    );
    assert_eq!(context.labels, vec!["a".to_string()]);
}

#[test]
fn test_duplicate_label_and_factory_errors_are_combined() {
    let resolver = setup_resolver();
    let (_, mut context) = setup_context();

    let result = resolver.resolve(
        &[description(&["a"], "good"), description(&["a"], "bad")],
        &mut context,
    );

    assert_eq!(
        result.containers[1].error_messages(),
        vec!["duplicate label: a", "unknown label: first", "unknown label: second"]
    );
}

#[test]
fn test_labels_are_replaced_on_each_resolution() {
    let resolver = setup_resolver();
    let (_, mut context) = setup_context();
    context.labels = vec!["stale".to_string()];

    resolver.resolve(&[description(&["fresh"], "good")], &mut context);

    assert_eq!(context.labels, vec!["fresh".to_string()]);
}

#[test]
fn test_registered_closure_receives_arguments() {
    let calls = Rc::new(Cell::new(0));
    let seen = calls.clone();

    let mut resolver = CommandResolver::with_factories(HashMap::new());
    resolver.register(
        "count",
        Box::new(
            move |arguments: &[String],
                  _context: &ResolutionContext|
                  -> Result<Box<dyn Command>, Vec<ResolveError>> {
                seen.set(seen.get() + arguments.len());
                Ok(Box::new(NopCommand))
            },
        ),
    );

    let (_, mut context) = setup_context();
    let result = resolver.resolve(&tokenize("count a b c\ncount d"), &mut context);

    assert!(result.succeeded);
    assert_eq!(calls.get(), 4);
}

#[test]
fn test_empty_program_succeeds() {
    let (_, mut context) = setup_context();
    let result = CommandResolver::new().resolve(&[], &mut context);

    assert!(result.succeeded);
    assert!(result.containers.is_empty());
}

// ========== Built-in Instruction Tests ==========

#[test]
fn test_every_table_entry_is_registered() {
    let resolver = CommandResolver::new();
    let (_, mut context) = setup_context();

    for metadata in INSTRUCTION_TABLE.iter() {
        let result = resolver.resolve(&[description(&[], metadata.mnemonic)], &mut context);
        let errors = result.containers[0].errors().to_vec();

        if metadata.operand_count() == 0 {
            assert!(errors.is_empty(), "{}: {errors:?}", metadata.mnemonic);
        } else {
            assert_eq!(
                errors,
                vec![ResolveError::ArgumentCount {
                    expected: metadata.operand_count(),
                    found: 0
                }],
                "{}",
                metadata.mnemonic
            );
        }
    }
}

#[test]
fn test_builtin_program_resolves() {
    let (_, mut context) = setup_context();
    let program = "start: mov 3 dat
                     # count down
                   loop: sub 1
                     teq acc 0
                   - jmp loop
                   + jmp start";

    let result = CommandResolver::new().resolve(&tokenize(program), &mut context);

    assert!(result.succeeded, "{:?}", result.diagnostics());
    assert_eq!(context.labels, vec!["start".to_string(), "loop".to_string()]);

    let targets = result.label_targets();
    assert_eq!(targets.get("start"), Some(&0));
    assert_eq!(targets.get("loop"), Some(&1));
}

#[test]
fn test_jump_to_forward_label() {
    let (_, mut context) = setup_context();
    let result = CommandResolver::new().resolve(&tokenize("jmp end\nnop\nend: nop"), &mut context);

    assert!(result.succeeded);
}

#[test]
fn test_jump_to_unknown_label() {
    let (_, mut context) = setup_context();
    let result = CommandResolver::new().resolve(&tokenize("here: jmp there"), &mut context);

    assert!(!result.succeeded);
    assert_eq!(result.containers[0].error_messages(), vec!["unknown label: there"]);
}

#[test]
fn test_all_operand_errors_are_reported() {
    let (_, mut context) = setup_context();
    let result = CommandResolver::new().resolve(&tokenize("mov foo 5"), &mut context);

    assert_eq!(
        result.containers[0].error_messages(),
        vec![
            "failed to resolve source: invalid or unavailable register: foo",
            "failed to resolve target: invalid or unavailable register: 5",
        ]
    );
}

#[test]
fn test_argument_count_message() {
    let (_, mut context) = setup_context();
    let result = CommandResolver::new().resolve(&tokenize("add 1 2"), &mut context);

    assert_eq!(
        result.containers[0].error_messages(),
        vec!["incorrect argument count (expected 1, found 2)"]
    );
}

#[test]
fn test_diagnostics_point_at_statement() {
    let (_, mut context) = setup_context();
    let program = "nop\n\nbad: + add 2000\nfoo";

    let result = CommandResolver::new().resolve(&tokenize(program), &mut context);

    assert_eq!(result.failures().count(), 2);
    assert_eq!(
        result.diagnostics(),
        vec![
            "line 3: bad: + add 2000: failed to resolve input value: value too large: 2000",
            "line 4: foo: unknown instruction: foo",
        ]
    );
}

#[test]
fn test_compile_helper() {
    let (acc, mut context) = setup_context();
    let mut result = mcu_engine::compile("add 7\nmul 2", &mut context);

    for container in &mut result.containers {
        container.command_mut().unwrap().execute();
    }

    assert_eq!(acc.read(), 14);
}
