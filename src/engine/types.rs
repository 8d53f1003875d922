use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four supported binary operators.
///
/// Serialized as its symbol (`"+"`, `"-"`, `"*"`, `"/"`) so wire payloads and
/// stored records stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    #[serde(rename = "/")]
    Div,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            _ => None,
        }
    }

    /// True for the operators reduced in the first pass.
    pub fn is_high_precedence(self) -> bool {
        matches!(self, Self::Mul | Self::Div)
    }

    /// Computes the operation. Division by zero is excluded upstream by the
    /// reducer and defensively yields 0 here.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => {
                if b != 0.0 {
                    a / b
                } else {
                    0.0
                }
            }
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Lifecycle state of an expression. `Completed` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionStatus {
    Processing,
    Completed,
    Error,
}

/// A user-submitted arithmetic expression and its evaluation record.
///
/// Created with status `Processing` and result 0; mutated only by the reducer
/// through the durable store until it reaches a terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expression {
    pub id: i64,
    pub owner: i64,
    pub source: String,
    pub status: ExpressionStatus,
    pub result: f64,
}

/// One binary operation extracted from an expression.
///
/// Exactly one task is outstanding per expression at any time. `processed`
/// transitions `false -> true` exactly once; `result` is immutable afterwards.
/// Tasks are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtomicTask {
    pub id: i64,
    pub expression_id: i64,
    pub operand_a: f64,
    pub operand_b: f64,
    pub operator: Operator,
    pub processed: bool,
    pub result: f64,
}

/// Terminal reduction failures. Each one marks the owning expression as
/// `Error` with result 0; none of them is retried.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ReduceError {
    #[error("operand/operator count mismatch")]
    MalformedExpression,
    #[error("division by zero")]
    DivisionByZero,
    #[error("failed to dispatch task: {0}")]
    DispatchFailure(String),
}
