//! Command resolution: from instruction descriptions to executable commands
//!
//! Resolution runs in two passes over the tokenized program:
//!
//! 1. **Labels**: every label is recorded in order. A label seen before marks the
//!    description that repeats it as failed. The deduplicated list is written back
//!    to the [`ResolutionContext`] so factories (e.g. `jmp`) can validate targets.
//! 2. **Instructions**: each description is handed to the factory registered for
//!    its instruction name.
//!
//! Errors never stop resolution. Every description gets a [`CommandContainer`],
//! and all problems of a program are reported in one pass.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::instruction_table::INSTRUCTION_TABLE;
use crate::language::{InstructionDescription, ParameterError, ResolutionContext};

use super::Command;

/// A problem found while resolving one instruction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The label was already defined by an earlier instruction
    #[error("duplicate label: {0}")]
    DuplicateLabel(String),

    /// No factory is registered for the instruction name
    #[error("unknown instruction: {0}")]
    UnknownInstruction(String),

    /// The instruction got the wrong number of operands
    #[error("incorrect argument count (expected {expected}, found {found})")]
    ArgumentCount {
        /// Operands the instruction takes
        expected: usize,
        /// Operands written in the program
        found: usize,
    },

    /// An operand could not be resolved
    #[error("failed to resolve {role}: {source}")]
    Operand {
        /// What the operand is for (e.g. "input value")
        role: &'static str,
        /// The underlying resolution failure
        source: ParameterError,
    },

    /// A jump names a label the program never defines
    #[error("unknown label: {0}")]
    UnknownLabel(String),
}

impl ResolveError {
    /// Wrap a parameter error with the role of the operand it concerns.
    pub fn operand(role: &'static str) -> impl FnOnce(ParameterError) -> Self {
        move |source| Self::Operand { role, source }
    }
}

/// Builds a command from an instruction's operands.
///
/// Implemented for every function or closure with the matching signature, so a
/// factory table can mix plain functions and closures.
pub trait CommandFactory {
    /// Build the command, or explain every reason it cannot be built.
    fn create(
        &self,
        arguments: &[String],
        context: &ResolutionContext,
    ) -> Result<Box<dyn Command>, Vec<ResolveError>>;
}

impl<F> CommandFactory for F
where
    F: Fn(&[String], &ResolutionContext) -> Result<Box<dyn Command>, Vec<ResolveError>>,
{
    fn create(
        &self,
        arguments: &[String],
        context: &ResolutionContext,
    ) -> Result<Box<dyn Command>, Vec<ResolveError>> {
        self(arguments, context)
    }
}

/// One description paired with its command or its errors.
pub struct CommandContainer {
    description: InstructionDescription,
    outcome: Result<Box<dyn Command>, Vec<ResolveError>>,
}

impl CommandContainer {
    /// A successfully resolved instruction.
    pub fn success(description: InstructionDescription, command: Box<dyn Command>) -> Self {
        Self {
            description,
            outcome: Ok(command),
        }
    }

    /// A failed instruction. `errors` should not be empty.
    pub fn failure(description: InstructionDescription, errors: Vec<ResolveError>) -> Self {
        Self {
            description,
            outcome: Err(errors),
        }
    }

    /// The instruction this container was built from.
    pub fn description(&self) -> &InstructionDescription {
        &self.description
    }

    /// Whether a command was built.
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The built command, if resolution succeeded.
    pub fn command_mut(&mut self) -> Option<&mut (dyn Command + 'static)> {
        self.outcome.as_mut().ok().map(|command| command.as_mut())
    }

    /// Take the built command out of the container.
    pub fn into_command(self) -> Option<Box<dyn Command>> {
        self.outcome.ok()
    }

    /// Errors collected for this instruction (empty on success).
    pub fn errors(&self) -> &[ResolveError] {
        match &self.outcome {
            Ok(_) => &[],
            Err(errors) => errors,
        }
    }

    /// Human-readable error messages.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors().iter().map(ToString::to_string).collect()
    }

    /// Error messages prefixed with the offending statement, for reporting.
    pub fn diagnostics(&self) -> Vec<String> {
        self.errors()
            .iter()
            .map(|error| format!("{}: {}", self.description, error))
            .collect()
    }
}

impl std::fmt::Debug for CommandContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContainer")
            .field("description", &self.description)
            .field("succeeded", &self.succeeded())
            .field("errors", &self.errors())
            .finish()
    }
}

/// Outcome of resolving a whole program.
#[derive(Debug)]
pub struct ResolutionResult {
    /// Whether every instruction resolved
    pub succeeded: bool,

    /// One container per description, in program order
    pub containers: Vec<CommandContainer>,
}

impl ResolutionResult {
    /// Map every label to the index of the instruction it names.
    pub fn label_targets(&self) -> HashMap<String, usize> {
        let mut targets = HashMap::new();
        for (index, container) in self.containers.iter().enumerate() {
            for label in &container.description.labels {
                targets.entry(label.clone()).or_insert(index);
            }
        }
        targets
    }

    /// Containers that failed to resolve.
    pub fn failures(&self) -> impl Iterator<Item = &CommandContainer> {
        self.containers.iter().filter(|c| !c.succeeded())
    }

    /// Every diagnostic of every failed instruction, in program order.
    pub fn diagnostics(&self) -> Vec<String> {
        self.failures().flat_map(CommandContainer::diagnostics).collect()
    }
}

/// Resolves descriptions through a table of factories keyed by instruction name.
pub struct CommandResolver {
    factories: HashMap<String, Box<dyn CommandFactory>>,
}

impl CommandResolver {
    /// Create a resolver for the built-in instruction set.
    pub fn new() -> Self {
        let factories = INSTRUCTION_TABLE
            .iter()
            .map(|metadata| {
                (
                    metadata.mnemonic.to_string(),
                    Box::new(metadata.factory) as Box<dyn CommandFactory>,
                )
            })
            .collect();
        Self { factories }
    }

    /// Create a resolver with a custom factory table.
    pub fn with_factories(factories: HashMap<String, Box<dyn CommandFactory>>) -> Self {
        Self { factories }
    }

    /// Add or replace the factory for an instruction name.
    pub fn register(&mut self, instruction: &str, factory: Box<dyn CommandFactory>) {
        self.factories.insert(instruction.to_string(), factory);
    }

    /// Resolve a tokenized program.
    ///
    /// # Arguments
    ///
    /// * `descriptions` - Output of the tokenizer
    /// * `context` - Registers and ports; its `labels` are replaced
    ///
    /// # Returns
    ///
    /// One container per description and the overall success flag
    pub fn resolve(
        &self,
        descriptions: &[InstructionDescription],
        context: &mut ResolutionContext,
    ) -> ResolutionResult {
        let mut known_labels: HashSet<&str> = HashSet::new();
        let mut ordered_labels: Vec<String> = Vec::new();
        let mut label_errors: Vec<Vec<ResolveError>> = Vec::with_capacity(descriptions.len());

        for description in descriptions {
            let mut errors = Vec::new();
            for label in &description.labels {
                if known_labels.insert(label.as_str()) {
                    ordered_labels.push(label.clone());
                } else {
                    warn!(label = %label, lines = ?description.line_numbers, "duplicate label");
                    errors.push(ResolveError::DuplicateLabel(label.clone()));
                }
            }
            label_errors.push(errors);
        }
        context.labels = ordered_labels;

        let mut containers = Vec::with_capacity(descriptions.len());
        for (description, mut errors) in descriptions.iter().zip(label_errors) {
            let outcome = match self.factories.get(&description.instruction) {
                Some(factory) => factory.create(&description.arguments, context),
                None => Err(vec![ResolveError::UnknownInstruction(
                    description.instruction.clone(),
                )]),
            };

            let container = match outcome {
                Ok(command) if errors.is_empty() => {
                    CommandContainer::success(description.clone(), command)
                }
                Ok(_) => CommandContainer::failure(description.clone(), errors),
                Err(factory_errors) => {
                    errors.extend(factory_errors);
                    CommandContainer::failure(description.clone(), errors)
                }
            };

            if !container.succeeded() {
                debug!(
                    lines = ?description.line_numbers,
                    instruction = %description.instruction,
                    errors = ?container.error_messages(),
                    "instruction failed to resolve"
                );
            }
            containers.push(container);
        }

        let succeeded = containers.iter().all(CommandContainer::succeeded);
        debug!(
            instructions = containers.len(),
            labels = context.labels.len(),
            succeeded,
            "program resolved"
        );

        ResolutionResult {
            succeeded,
            containers,
        }
    }
}

impl Default for CommandResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CommandResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut instructions: Vec<&String> = self.factories.keys().collect();
        instructions.sort();
        f.debug_struct("CommandResolver")
            .field("instructions", &instructions)
            .finish()
    }
}
