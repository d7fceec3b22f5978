//! Tokenization of program text into instruction descriptions
//!
//! This module is the first phase of loading a program: it converts source text into
//! an ordered list of [`InstructionDescription`]s. The tokenizer is purely
//! structural. It never rejects a program; whether an instruction or operand is
//! meaningful is decided later by the command resolver.
//!
//! # Line Grammar
//!
//! ```text
//! [label:] [+|-|@]instruction [arg1 [arg2 ...]] [# comment]
//! ```
//!
//! Every component may be absent. A line is processed in four steps:
//!
//! 1. Strip the comment (everything after the first `#`)
//! 2. Strip the label (everything before the first `:`)
//! 3. Strip a single leading condition marker (`+`, `-` or `@`)
//! 4. Split the remainder on whitespace: instruction first, then arguments
//!
//! Line numbers count every physical line from 1, blank lines included, so
//! diagnostics match what an editor shows: in `"mov 1 acc\n\nadd 1"` the `add`
//! is line 3.
//!
//! # Merging
//!
//! Lines that carry no instruction (bare labels, comment-only lines) never become
//! descriptions of their own. Their labels and line numbers are prepended to the
//! next real instruction, and their comment is used if that instruction has none.
//! Labels left over at the end of the program wrap around to the first
//! instruction, so a trailing label still names a valid jump target.
//!
//! # Examples
//!
//! ```
//! use mcu_engine::language::tokenizer::{tokenize, ExecutionCondition};
//!
//! let program = "loop: # wait for a high pulse\n  slp 1\n  teq p0 100\n- jmp loop";
//! let descriptions = tokenize(program);
//!
//! assert_eq!(descriptions.len(), 3);
//!
//! // The label line was merged into the first real instruction
//! assert_eq!(descriptions[0].instruction, "slp");
//! assert_eq!(descriptions[0].labels, vec!["loop".to_string()]);
//! assert_eq!(descriptions[0].line_numbers, vec![1, 2]);
//! assert_eq!(descriptions[0].comment.as_deref(), Some("wait for a high pulse"));
//!
//! assert_eq!(descriptions[2].condition, ExecutionCondition::OnFailure);
//! assert_eq!(descriptions[2].arguments, vec!["loop".to_string()]);
//! ```

use tracing::trace;

use crate::execution::TestResult;

const COMMENT_SEPARATOR: char = '#';
const LABEL_SEPARATOR: char = ':';

/// When a resolved instruction is eligible to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionCondition {
    /// No marker: always runs
    #[default]
    Always,

    /// `+`: runs only while the last test succeeded
    OnSuccess,

    /// `-`: runs only while the last test failed
    OnFailure,

    /// `@`: runs only the first time it is reached
    Once,
}

impl ExecutionCondition {
    /// Map a leading marker character to its condition.
    fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '+' => Some(Self::OnSuccess),
            '-' => Some(Self::OnFailure),
            '@' => Some(Self::Once),
            _ => None,
        }
    }

    /// Decide whether an instruction with this condition may run.
    ///
    /// # Arguments
    ///
    /// * `last_test` - Result of the most recent test instruction, `None` if no
    ///   test has run yet
    /// * `has_run_before` - Whether this instruction already ran once
    ///
    /// # Examples
    ///
    /// ```
    /// use mcu_engine::execution::TestResult;
    /// use mcu_engine::language::tokenizer::ExecutionCondition;
    ///
    /// assert!(ExecutionCondition::OnSuccess.permits(Some(TestResult::Success), false));
    /// assert!(!ExecutionCondition::OnSuccess.permits(Some(TestResult::None), false));
    /// assert!(!ExecutionCondition::OnFailure.permits(None, false));
    /// assert!(!ExecutionCondition::Once.permits(None, true));
    /// ```
    pub fn permits(&self, last_test: Option<TestResult>, has_run_before: bool) -> bool {
        match self {
            Self::Always => true,
            Self::OnSuccess => last_test == Some(TestResult::Success),
            Self::OnFailure => last_test == Some(TestResult::Failure),
            Self::Once => !has_run_before,
        }
    }
}

/// One logical instruction of a program, possibly merged from several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionDescription {
    /// Source lines this description was built from (1-indexed, encounter order)
    pub line_numbers: Vec<usize>,

    /// Labels naming this instruction
    pub labels: Vec<String>,

    /// Execution condition from the leading marker
    pub condition: ExecutionCondition,

    /// Instruction name (e.g. "mov")
    pub instruction: String,

    /// Operand tokens, in order
    pub arguments: Vec<String>,

    /// Trailing comment text (after `#`), trimmed
    pub comment: Option<String>,
}

impl std::fmt::Display for InstructionDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lines: Vec<String> = self.line_numbers.iter().map(|n| n.to_string()).collect();
        write!(f, "line {}: ", lines.join(","))?;
        for label in &self.labels {
            write!(f, "{}{} ", label, LABEL_SEPARATOR)?;
        }
        match self.condition {
            ExecutionCondition::Always => {}
            ExecutionCondition::OnSuccess => write!(f, "+ ")?,
            ExecutionCondition::OnFailure => write!(f, "- ")?,
            ExecutionCondition::Once => write!(f, "@ ")?,
        }
        write!(f, "{}", self.instruction)?;
        for argument in &self.arguments {
            write!(f, " {}", argument)?;
        }
        Ok(())
    }
}

/// A single physical line after splitting, before merging.
#[derive(Debug, Default)]
struct ParsedLine {
    line_number: usize,
    label: Option<String>,
    condition: ExecutionCondition,
    instruction: Option<String>,
    arguments: Vec<String>,
    comment: Option<String>,
}

/// Split one line into its components.
fn parse_line(line: &str, line_number: usize) -> ParsedLine {
    let (statement, comment) = match line.split_once(COMMENT_SEPARATOR) {
        Some((statement, comment)) => (statement.trim(), Some(comment.trim())),
        None => (line, None),
    };

    let (statement, label) = match statement.split_once(LABEL_SEPARATOR) {
        Some((label, statement)) => (statement.trim(), Some(label.trim())),
        None => (statement.trim(), None),
    };

    let mut condition = ExecutionCondition::Always;
    let mut statement = statement;
    if let Some(marker) = statement.chars().next() {
        if let Some(parsed) = ExecutionCondition::from_marker(marker) {
            condition = parsed;
            statement = &statement[marker.len_utf8()..];
        }
    }

    let mut parts = statement.split_whitespace();
    let instruction = parts.next().map(str::to_string);
    let arguments = parts.map(str::to_string).collect();

    ParsedLine {
        line_number,
        label: label.filter(|l| !l.is_empty()).map(str::to_string),
        condition,
        instruction,
        arguments,
        comment: comment.filter(|c| !c.is_empty()).map(str::to_string),
    }
}

/// Labels, line numbers and comment waiting for the next real instruction.
#[derive(Debug, Default)]
struct PendingLines {
    labels: Vec<String>,
    line_numbers: Vec<usize>,
    comment: Option<String>,
}

impl PendingLines {
    /// Absorb a line that carries no instruction.
    fn absorb(&mut self, line: ParsedLine) {
        if line.label.is_none() && line.comment.is_none() {
            return;
        }
        self.line_numbers.push(line.line_number);
        self.labels.extend(line.label);
        if line.comment.is_some() {
            self.comment = line.comment;
        }
    }

    /// Attach everything pending to an instruction and reset.
    fn attach_to(&mut self, description: &mut InstructionDescription) {
        let mut line_numbers = std::mem::take(&mut self.line_numbers);
        line_numbers.append(&mut description.line_numbers);
        description.line_numbers = line_numbers;

        let mut labels = std::mem::take(&mut self.labels);
        labels.append(&mut description.labels);
        description.labels = labels;

        let comment = self.comment.take();
        if description.comment.is_none() {
            description.comment = comment;
        }
    }
}

/// Tokenize program text into instruction descriptions.
///
/// Lines are separated by `\n` or `\r\n` and numbered from 1, blank lines
/// included. This function never fails; see the module documentation for the
/// merging rules.
///
/// # Arguments
///
/// * `program` - The full program text
///
/// # Returns
///
/// Descriptions in program order, one per real instruction
pub fn tokenize(program: &str) -> Vec<InstructionDescription> {
    let mut descriptions: Vec<InstructionDescription> = Vec::new();
    let mut pending = PendingLines::default();

    for (index, line) in program.lines().enumerate() {
        let mut parsed = parse_line(line, index + 1);
        trace!(line = parsed.line_number, ?parsed, "tokenized line");

        let Some(instruction) = parsed.instruction.take() else {
            pending.absorb(parsed);
            continue;
        };

        let mut description = InstructionDescription {
            line_numbers: vec![parsed.line_number],
            labels: parsed.label.into_iter().collect(),
            condition: parsed.condition,
            instruction,
            arguments: parsed.arguments,
            comment: parsed.comment,
        };
        pending.attach_to(&mut description);
        descriptions.push(description);
    }

    // Trailing labels wrap around to the first instruction
    if !pending.labels.is_empty() {
        if let Some(first) = descriptions.first_mut() {
            pending.comment = None;
            pending.attach_to(first);
        }
    }

    descriptions
}
