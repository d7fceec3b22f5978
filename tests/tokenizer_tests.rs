//! Tests for program tokenization.
//!
//! Tests cover:
//! - Line component splitting (label, condition, instruction, arguments, comment)
//! - Merging of label-only and comment-only lines
//! - Trailing label wrap-around
//! - Line numbering with blank lines and CRLF input

use mcu_engine::language::{tokenize, ExecutionCondition, InstructionDescription};

fn description(
    line_numbers: &[usize],
    labels: &[&str],
    condition: ExecutionCondition,
    instruction: &str,
    arguments: &[&str],
    comment: Option<&str>,
) -> InstructionDescription {
    InstructionDescription {
        line_numbers: line_numbers.to_vec(),
        labels: labels.iter().map(|l| l.to_string()).collect(),
        condition,
        instruction: instruction.to_string(),
        arguments: arguments.iter().map(|a| a.to_string()).collect(),
        comment: comment.map(str::to_string),
    }
}

// ========== Single Line Tests ==========

#[test]
fn test_full_line() {
    assert_eq!(
        tokenize("label: + mov x0 x3 # move x0 to x3"),
        vec![description(
            &[1],
            &["label"],
            ExecutionCondition::OnSuccess,
            "mov",
            &["x0", "x3"],
            Some("move x0 to x3"),
        )]
    );
}

#[test]
fn test_full_line_without_spaces() {
    assert_eq!(
        tokenize("label:+mov x0 x3#move x0 to x3"),
        vec![description(
            &[1],
            &["label"],
            ExecutionCondition::OnSuccess,
            "mov",
            &["x0", "x3"],
            Some("move x0 to x3"),
        )]
    );
}

#[test]
fn test_comment_only_program() {
    assert!(tokenize("# just a comment").is_empty());
}

#[test]
fn test_empty_program() {
    assert!(tokenize("").is_empty());
    assert!(tokenize("\n\n   \n").is_empty());
}

#[test]
fn test_once_condition() {
    assert_eq!(
        tokenize("@ nop"),
        vec![description(&[1], &[], ExecutionCondition::Once, "nop", &[], None)]
    );
}

#[test]
fn test_failure_condition_without_space() {
    let descriptions = tokenize("-jmp loop");
    assert_eq!(descriptions[0].condition, ExecutionCondition::OnFailure);
    assert_eq!(descriptions[0].instruction, "jmp");
}

#[test]
fn test_negative_literal_is_an_argument() {
    let descriptions = tokenize("add -5");
    assert_eq!(descriptions[0].condition, ExecutionCondition::Always);
    assert_eq!(descriptions[0].arguments, vec!["-5".to_string()]);
}

#[test]
fn test_colon_in_comment_is_not_a_label() {
    let descriptions = tokenize("gen p0 2 1 # pulse: high 2, low 1");
    assert!(descriptions[0].labels.is_empty());
    assert_eq!(descriptions[0].comment.as_deref(), Some("pulse: high 2, low 1"));
}

#[test]
fn test_unknown_instructions_are_tokenized() {
    assert_eq!(
        tokenize("+ jump back to read"),
        vec![description(
            &[1],
            &[],
            ExecutionCondition::OnSuccess,
            "jump",
            &["back", "to", "read"],
            None,
        )]
    );
}

// ========== Multi Line Tests ==========

#[test]
fn test_program_with_indentation() {
    let program = "read: gen p0 2 1 # pulse: high 2, low 1
                    sub 1
                    tgt acc 0
                  + jmp read";

    assert_eq!(
        tokenize(program),
        vec![
            description(
                &[1],
                &["read"],
                ExecutionCondition::Always,
                "gen",
                &["p0", "2", "1"],
                Some("pulse: high 2, low 1"),
            ),
            description(&[2], &[], ExecutionCondition::Always, "sub", &["1"], None),
            description(&[3], &[], ExecutionCondition::Always, "tgt", &["acc", "0"], None),
            description(&[4], &[], ExecutionCondition::OnSuccess, "jmp", &["read"], None),
        ]
    );
}

#[test]
fn test_label_line_with_comment_merges_forward() {
    let program = "loop: # run until high pulse on p0
                    slp 1 # sleep for 1 time unit
                    teq p0 100
                  - jmp loop";

    assert_eq!(
        tokenize(program),
        vec![
            description(
                &[1, 2],
                &["loop"],
                ExecutionCondition::Always,
                "slp",
                &["1"],
                Some("sleep for 1 time unit"),
            ),
            description(&[3], &[], ExecutionCondition::Always, "teq", &["p0", "100"], None),
            description(&[4], &[], ExecutionCondition::OnFailure, "jmp", &["loop"], None),
        ]
    );
}

#[test]
fn test_merged_comment_used_when_instruction_has_none() {
    let program = "start: # start of the program
                  @ mov 0 acc";

    assert_eq!(
        tokenize(program),
        vec![description(
            &[1, 2],
            &["start"],
            ExecutionCondition::Once,
            "mov",
            &["0", "acc"],
            Some("start of the program"),
        )]
    );
}

#[test]
fn test_comment_only_line_contributes_line_number() {
    let program = "# setup\nmov 0 acc";

    assert_eq!(
        tokenize(program),
        vec![description(
            &[1, 2],
            &[],
            ExecutionCondition::Always,
            "mov",
            &["0", "acc"],
            Some("setup"),
        )]
    );
}

#[test]
fn test_consecutive_labels_merge() {
    let program = "start:
                  program:
                    gen p0 1 4";

    assert_eq!(
        tokenize(program),
        vec![description(
            &[1, 2, 3],
            &["start", "program"],
            ExecutionCondition::Always,
            "gen",
            &["p0", "1", "4"],
            None,
        )]
    );
}

#[test]
fn test_condition_without_instruction_is_dropped() {
    let program = "start: @
                    gen p0 1 4";

    assert_eq!(
        tokenize(program),
        vec![description(
            &[1, 2],
            &["start"],
            ExecutionCondition::Always,
            "gen",
            &["p0", "1", "4"],
            None,
        )]
    );
}

#[test]
fn test_trailing_label_wraps_to_first_instruction() {
    let program = "start: mov 11 acc
                    dgt 1
                  end:";

    assert_eq!(
        tokenize(program),
        vec![
            description(
                &[3, 1],
                &["end", "start"],
                ExecutionCondition::Always,
                "mov",
                &["11", "acc"],
                None,
            ),
            description(&[2], &[], ExecutionCondition::Always, "dgt", &["1"], None),
        ]
    );
}

#[test]
fn test_trailing_comment_is_not_carried() {
    let descriptions = tokenize("nop\n# done");
    assert_eq!(descriptions.len(), 1);
    assert_eq!(descriptions[0].line_numbers, vec![1]);
    assert_eq!(descriptions[0].comment, None);
}

#[test]
fn test_trailing_labels_without_instructions_are_dropped() {
    assert!(tokenize("a:\nb:").is_empty());
}

// ========== Line Numbering Tests ==========

#[test]
fn test_blank_lines_are_counted() {
    let descriptions = tokenize("nop\n\n\nadd 1");
    assert_eq!(descriptions[1].line_numbers, vec![4]);

    let descriptions = tokenize("mov 1 acc\n\nadd 1");
    assert_eq!(descriptions[0].line_numbers, vec![1]);
    assert_eq!(descriptions[1].line_numbers, vec![3]);
}

#[test]
fn test_crlf_line_endings() {
    let descriptions = tokenize("mov 1 acc\r\nadd 2\r\n");
    assert_eq!(descriptions.len(), 2);
    assert_eq!(descriptions[0].arguments, vec!["1".to_string(), "acc".to_string()]);
    assert_eq!(descriptions[1].line_numbers, vec![2]);
}

// ========== Display Tests ==========

#[test]
fn test_display_renders_statement() {
    let descriptions = tokenize("a:\nb: + mov 1 acc # note");
    assert_eq!(descriptions[0].to_string(), "line 1,2: a: b: + mov 1 acc");
}
