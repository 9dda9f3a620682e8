use thiserror::Error;

/// Every way a formula can fail. Exactly one kind is reported per evaluation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    #[error("no formula to evaluate")]
    Empty,
    #[error("syntax error")]
    Syntax,
    #[error("malformed variable declaration")]
    VariableSyntax,
    #[error("variable substitution did not settle, possible self reference")]
    InfiniteSubstitution,
    #[error("unbalanced parentheses")]
    Parentheses,
    #[error("empty pair of parentheses")]
    EmptyParentheses,
    #[error("invalid character in formula")]
    InvalidCharacter,
    #[error("division by zero")]
    DivisionByZero,
    #[error("math domain error")]
    Domain,
    #[error("math range error")]
    Range,
    #[error("fibonacci index out of supported bounds")]
    FibonacciBounds,
    #[error("invalid binary digit")]
    BinaryDigit,
    #[error("invalid octal digit")]
    OctalDigit,
    #[error("invalid hexadecimal digit")]
    HexDigit,
    #[error("factorial requires a non-negative integer")]
    FactorialBounds,
    #[error("bit shift requires integer operands")]
    NonIntegerShift,
    #[error("nesting depth or comparison chain limit exceeded")]
    LimitExceeded,
    #[error("internal evaluation error")]
    Internal,
}

pub type Result<T> = std::result::Result<T, ErrorKind>;

impl ErrorKind {
    /// True for failures detected before any arithmetic took place.
    pub fn is_syntactic(&self) -> bool {
        matches!(
            self,
            ErrorKind::Empty
                | ErrorKind::Syntax
                | ErrorKind::VariableSyntax
                | ErrorKind::InfiniteSubstitution
                | ErrorKind::Parentheses
                | ErrorKind::EmptyParentheses
                | ErrorKind::InvalidCharacter
                | ErrorKind::LimitExceeded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_distinct() {
        let kinds = [
            ErrorKind::Empty,
            ErrorKind::Syntax,
            ErrorKind::VariableSyntax,
            ErrorKind::InfiniteSubstitution,
            ErrorKind::Parentheses,
            ErrorKind::EmptyParentheses,
            ErrorKind::InvalidCharacter,
            ErrorKind::DivisionByZero,
            ErrorKind::Domain,
            ErrorKind::Range,
            ErrorKind::FibonacciBounds,
            ErrorKind::BinaryDigit,
            ErrorKind::OctalDigit,
            ErrorKind::HexDigit,
            ErrorKind::FactorialBounds,
            ErrorKind::NonIntegerShift,
            ErrorKind::LimitExceeded,
            ErrorKind::Internal,
        ];
        let messages: std::collections::HashSet<String> =
            kinds.iter().map(|kind| kind.to_string()).collect();
        assert_eq!(messages.len(), kinds.len());
    }

    #[test]
    fn test_syntactic_classification() {
        assert!(ErrorKind::Parentheses.is_syntactic());
        assert!(ErrorKind::LimitExceeded.is_syntactic());
        assert!(!ErrorKind::DivisionByZero.is_syntactic());
        assert!(!ErrorKind::HexDigit.is_syntactic());
    }
}
