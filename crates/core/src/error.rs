//! Error taxonomy for story variables.

use crate::operator::Operator;

/// All errors that can be returned by value operations.
///
/// Comparisons and query-form conversions never produce these; they answer
/// `false` / `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VarError {
    /// Member get/set/remove on an empty value, with an empty key, on a type
    /// with no applicable service, or rejected by the type itself.
    #[error("member access error: {message}")]
    MemberAccess { message: String },

    /// A combination or unary operator found no service for its operands.
    #[error("{}", combination_message(.op, .left, .right))]
    TypeCombination {
        op: Operator,
        left: String,
        /// `None` for unary operators.
        right: Option<String>,
    },

    /// A required conversion could not be satisfied.
    #[error("cannot convert {from} to {to}")]
    Conversion { from: String, to: String },

    /// A typed service lookup found no registration. This is an engine
    /// misconfiguration, not a story-data error.
    #[error("missing type service for {type_name}; were the built-in services installed?")]
    MissingTypeService { type_name: String },

    /// Host configuration could not be parsed.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl VarError {
    pub fn member_access(message: impl Into<String>) -> Self {
        VarError::MemberAccess {
            message: message.into(),
        }
    }

    pub fn conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        VarError::Conversion {
            from: from.into(),
            to: to.into(),
        }
    }
}

fn combination_message(op: &Operator, left: &str, right: &Option<String>) -> String {
    match right {
        Some(right) => format!("cannot combine {} with {} using {}", left, right, op),
        None => format!("cannot use {} with {}", op, left),
    }
}

pub type VarResult<T> = Result<T, VarError>;
