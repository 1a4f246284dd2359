//! The closed set of operators a story value understands.

use std::fmt;

/// Operator tag passed to type services.
///
/// Every operator belongs to exactly one [`OperatorKind`], which decides how
/// an unsupported operand type is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    GreaterThan,
    GreaterThanOrEquals,
    LessThan,
    LessThanOrEquals,
    Contains,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    LogicalAnd,
    LogicalOr,
    Increment,
    Decrement,
}

/// Dispatch category of an [`Operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// Total: unsupported operand types compare as `false`.
    Comparison,
    /// Binary; unsupported operand types are an error.
    Combination,
    /// Single operand; unsupported operand types are an error.
    Unary,
}

impl Operator {
    pub fn kind(self) -> OperatorKind {
        match self {
            Operator::Equals
            | Operator::GreaterThan
            | Operator::GreaterThanOrEquals
            | Operator::LessThan
            | Operator::LessThanOrEquals
            | Operator::Contains => OperatorKind::Comparison,
            Operator::Add
            | Operator::Subtract
            | Operator::Multiply
            | Operator::Divide
            | Operator::Modulo
            | Operator::LogicalAnd
            | Operator::LogicalOr => OperatorKind::Combination,
            Operator::Increment | Operator::Decrement => OperatorKind::Unary,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Operator::Equals => "Equals",
            Operator::GreaterThan => "GreaterThan",
            Operator::GreaterThanOrEquals => "GreaterThanOrEquals",
            Operator::LessThan => "LessThan",
            Operator::LessThanOrEquals => "LessThanOrEquals",
            Operator::Contains => "Contains",
            Operator::Add => "Add",
            Operator::Subtract => "Subtract",
            Operator::Multiply => "Multiply",
            Operator::Divide => "Divide",
            Operator::Modulo => "Modulo",
            Operator::LogicalAnd => "LogicalAnd",
            Operator::LogicalOr => "LogicalOr",
            Operator::Increment => "Increment",
            Operator::Decrement => "Decrement",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
