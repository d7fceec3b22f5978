//! Integer literals used as read-only operands.

use super::{Readable, REGISTER_MAX, REGISTER_MIN};

/// Smallest literal accepted in program text.
pub const LITERAL_MIN: i32 = REGISTER_MIN;

/// Largest literal accepted in program text.
pub const LITERAL_MAX: i32 = REGISTER_MAX;

/// Reasons a token could not become an [`IntegerLiteral`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    /// The token is not a base-10 integer at all.
    #[error("not an integer literal: {0}")]
    NotANumber(String),

    /// The token is an integer below [`LITERAL_MIN`].
    #[error("value too small: {0}")]
    TooSmall(String),

    /// The token is an integer above [`LITERAL_MAX`].
    #[error("value too large: {0}")]
    TooLarge(String),
}

/// A constant operand. Reading it always succeeds.
///
/// # Examples
///
/// ```
/// use mcu_engine::io::{IntegerLiteral, LiteralError, Readable};
///
/// let literal = IntegerLiteral::parse("011").unwrap();
/// assert_eq!(literal.try_read(), Some(11));
///
/// assert_eq!(
///     IntegerLiteral::parse("1000"),
///     Err(LiteralError::TooLarge("1000".to_string()))
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerLiteral {
    value: i32,
}

impl IntegerLiteral {
    /// Create a literal from an already-validated value.
    pub fn new(value: i32) -> Self {
        Self { value }
    }

    /// The literal's value.
    pub fn value(&self) -> i32 {
        self.value
    }

    /// Parse a base-10 literal token.
    ///
    /// Leading zeros and a leading sign are accepted. The value must lie within
    /// [`LITERAL_MIN`]..=[`LITERAL_MAX`].
    ///
    /// # Arguments
    ///
    /// * `text` - The operand token exactly as written in the program
    ///
    /// # Returns
    ///
    /// The literal, or a [`LiteralError`] distinguishing "not a number" from the two
    /// out-of-range cases
    pub fn parse(text: &str) -> Result<Self, LiteralError> {
        use std::num::IntErrorKind;

        let value = match text.parse::<i32>() {
            Ok(value) => value,
            Err(e) => {
                return Err(match e.kind() {
                    IntErrorKind::PosOverflow => LiteralError::TooLarge(text.to_string()),
                    IntErrorKind::NegOverflow => LiteralError::TooSmall(text.to_string()),
                    _ => LiteralError::NotANumber(text.to_string()),
                })
            }
        };

        if value < LITERAL_MIN {
            Err(LiteralError::TooSmall(text.to_string()))
        } else if value > LITERAL_MAX {
            Err(LiteralError::TooLarge(text.to_string()))
        } else {
            Ok(Self::new(value))
        }
    }
}

impl Readable for IntegerLiteral {
    fn try_read(&self) -> Option<i32> {
        Some(self.value)
    }
}
