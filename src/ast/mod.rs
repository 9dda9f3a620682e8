use crate::error::{ErrorKind, Result};
use crate::functions::{check_math, Function, Radix};

mod comparison;
mod evaluator;
mod parser;

pub use comparison::{ComparisonChain, Comparator};
pub use evaluator::{Evaluation, Evaluator, DEFAULT_MAX_CHAIN_LENGTH};
pub use parser::FormulaParser as Parser;

#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Number(f64),
    Constant(Constant),
    BaseLiteral {
        radix: Radix,
        digits: String,
    },
    Negate(Box<ASTNode>),
    /// Operands of one precedence level, folded left to right:
    /// `first op0 rest[0] op1 rest[1] ...`.
    Chain {
        first: Box<ASTNode>,
        rest: Vec<(Operator, ASTNode)>,
    },
    FunctionCall {
        function: Function,
        argument: Box<ASTNode>,
    },
    Group(Box<ASTNode>),
}

/// A parsed formula: plain arithmetic or a chain of comparisons.
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    Arithmetic(ASTNode),
    Comparison {
        operands: Vec<ASTNode>,
        comparators: Vec<Comparator>,
    },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}

impl TryFrom<&str> for Constant {
    type Error = ErrorKind;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value {
            "pi" => Ok(Constant::Pi),
            "e" => Ok(Constant::E),
            _ => Err(ErrorKind::Syntax),
        }
    }
}

/// Precedence tiers, loosest first. Shift binds tighter than everything else.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Sum = 0,
    Product = 1,
    Quotient = 2,
    Power = 3,
    Shift = 4,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    ShiftLeft,
    ShiftRight,
}

impl Operator {
    pub fn level(&self) -> Level {
        match self {
            Operator::Add | Operator::Subtract => Level::Sum,
            Operator::Multiply => Level::Product,
            Operator::Divide | Operator::Modulo => Level::Quotient,
            Operator::Power => Level::Power,
            Operator::ShiftLeft | Operator::ShiftRight => Level::Shift,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Modulo => "%",
            Operator::Power => "^",
            Operator::ShiftLeft => "<<",
            Operator::ShiftRight => ">>",
        }
    }

    pub fn apply(&self, left: f64, right: f64) -> Result<f64> {
        let value = match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => {
                if right == 0.0 {
                    return Err(ErrorKind::DivisionByZero);
                }
                left / right
            }
            Operator::Modulo => {
                if right == 0.0 {
                    return Err(ErrorKind::DivisionByZero);
                }
                left % right
            }
            Operator::Power => left.powf(right),
            Operator::ShiftLeft | Operator::ShiftRight => return self.shift(left, right),
        };
        check_math(&[left, right], value)
    }

    fn shift(&self, left: f64, right: f64) -> Result<f64> {
        if left.fract() != 0.0 || right.fract() != 0.0 {
            return Err(ErrorKind::NonIntegerShift);
        }
        // 2^63 is the first magnitude `as i64` would saturate
        if !(0.0..64.0).contains(&right) || left.abs() >= 9_223_372_036_854_775_808.0 {
            return Err(ErrorKind::Range);
        }
        let (value, amount) = (left as i64, right as u32);
        let shifted = match self {
            Operator::ShiftLeft => {
                let shifted = value.wrapping_shl(amount);
                if shifted >> amount != value {
                    return Err(ErrorKind::Range);
                }
                shifted
            }
            _ => value >> amount,
        };
        Ok(shifted as f64)
    }
}

impl TryFrom<&str> for Operator {
    type Error = ErrorKind;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "%" => Ok(Operator::Modulo),
            "^" => Ok(Operator::Power),
            "<<" => Ok(Operator::ShiftLeft),
            ">>" => Ok(Operator::ShiftRight),
            _ => Err(ErrorKind::Syntax),
        }
    }
}
