pub mod base;
pub mod integer;

pub use base::Radix;
pub use integer::{factorial, fibonacci, FIBONACCI_LIMIT};

use crate::error::{ErrorKind, Result};

/// Named unary functions understood by the evaluator.
///
/// `Bin`, `Oct` and `Hex` are pseudo-functions: the parser turns them into
/// base literals, so they never receive an already evaluated argument.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Function {
    Sqrt,
    Floor,
    Ceil,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Ln,
    Log,
    Abs,
    Fabs,
    Bin,
    Oct,
    Hex,
    Round,
    Fact,
}

impl Function {
    pub fn name(&self) -> &'static str {
        match self {
            Function::Sqrt => "sqrt",
            Function::Floor => "floor",
            Function::Ceil => "ceil",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Asin => "asin",
            Function::Acos => "acos",
            Function::Atan => "atan",
            Function::Sinh => "sinh",
            Function::Cosh => "cosh",
            Function::Tanh => "tanh",
            Function::Ln => "ln",
            Function::Log => "log",
            Function::Abs => "abs",
            Function::Fabs => "fabs",
            Function::Bin => "bin",
            Function::Oct => "oct",
            Function::Hex => "hex",
            Function::Round => "round",
            Function::Fact => "fact",
        }
    }

    pub fn radix(&self) -> Option<Radix> {
        match self {
            Function::Bin => Some(Radix::Binary),
            Function::Oct => Some(Radix::Octal),
            Function::Hex => Some(Radix::Hexadecimal),
            _ => None,
        }
    }

    pub fn apply(&self, x: f64) -> Result<f64> {
        let value = match self {
            Function::Sqrt => x.sqrt(),
            Function::Floor => x.floor(),
            Function::Ceil => x.ceil(),
            Function::Sin => x.sin(),
            Function::Cos => x.cos(),
            Function::Tan => x.tan(),
            Function::Asin => x.asin(),
            Function::Acos => x.acos(),
            Function::Atan => x.atan(),
            Function::Sinh => x.sinh(),
            Function::Cosh => x.cosh(),
            Function::Tanh => x.tanh(),
            Function::Ln => x.ln(),
            Function::Log => x.log10(),
            Function::Abs | Function::Fabs => x.abs(),
            Function::Round => round_half_up(x),
            Function::Fact => factorial(x)?,
            Function::Bin | Function::Oct | Function::Hex => return Err(ErrorKind::Internal),
        };
        check_math(&[x], value)
    }
}

impl TryFrom<&str> for Function {
    type Error = ErrorKind;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value {
            "sqrt" => Ok(Function::Sqrt),
            "floor" => Ok(Function::Floor),
            "ceil" => Ok(Function::Ceil),
            "sin" => Ok(Function::Sin),
            "cos" => Ok(Function::Cos),
            "tan" => Ok(Function::Tan),
            "asin" => Ok(Function::Asin),
            "acos" => Ok(Function::Acos),
            "atan" => Ok(Function::Atan),
            "sinh" => Ok(Function::Sinh),
            "cosh" => Ok(Function::Cosh),
            "tanh" => Ok(Function::Tanh),
            "ln" => Ok(Function::Ln),
            "log" => Ok(Function::Log),
            "abs" => Ok(Function::Abs),
            "fabs" => Ok(Function::Fabs),
            "bin" => Ok(Function::Bin),
            "oct" => Ok(Function::Oct),
            "hex" => Ok(Function::Hex),
            "round" => Ok(Function::Round),
            "fact" => Ok(Function::Fact),
            _ => Err(ErrorKind::Syntax),
        }
    }
}

/// Halves always round towards positive infinity, `-2.5` becomes `-2`.
pub fn round_half_up(x: f64) -> f64 {
    if x - x.floor() >= 0.5 {
        x.ceil()
    } else {
        x.floor()
    }
}

/// Classifies a float result the way `errno` would: a NaN out of non-NaN
/// inputs is a domain error, an infinity out of finite inputs a range error.
pub fn check_math(inputs: &[f64], value: f64) -> Result<f64> {
    if value.is_nan() && !inputs.iter().any(|x| x.is_nan()) {
        Err(ErrorKind::Domain)
    } else if value.is_infinite() && inputs.iter().all(|x| x.is_finite()) {
        Err(ErrorKind::Range)
    } else {
        Ok(value)
    }
}
