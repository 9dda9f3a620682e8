use crate::ast::ComparisonChain;
use crate::error::{ErrorKind, Result};
use crate::format::{format_number, group_thousands};
use crate::functions::fibonacci;
use std::fmt;

/// The result of evaluating one formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Number {
        formula: String,
        value: f64,
    },
    Boolean {
        formula: String,
        value: bool,
        chain: ComparisonChain,
    },
    Error {
        kind: ErrorKind,
    },
}

impl Outcome {
    /// Numeric value; booleans read as `1` or `0`.
    pub fn value(&self) -> Option<f64> {
        match self {
            Outcome::Number { value, .. } => Some(*value),
            Outcome::Boolean { value, .. } => Some(if *value { 1.0 } else { 0.0 }),
            Outcome::Error { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error { .. })
    }

    pub fn error(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Error { kind } => Some(*kind),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<String> {
        self.error().map(|kind| kind.to_string())
    }

    /// Normalized formula the value was computed from.
    pub fn formula(&self) -> Option<&str> {
        match self {
            Outcome::Number { formula, .. } | Outcome::Boolean { formula, .. } => Some(formula),
            Outcome::Error { .. } => None,
        }
    }

    pub fn chain(&self) -> Option<&ComparisonChain> {
        match self {
            Outcome::Boolean { chain, .. } => Some(chain),
            _ => None,
        }
    }

    /// Fibonacci number indexed by the evaluated value.
    pub fn fibonacci(&self) -> Result<f64> {
        match self {
            Outcome::Error { kind } => Err(*kind),
            _ => fibonacci(self.value().ok_or(ErrorKind::Internal)?),
        }
    }

    pub fn render(&self, options: RenderOptions) -> String {
        match self {
            Outcome::Error { kind } => {
                if options.suppress_error_text {
                    String::new()
                } else {
                    kind.to_string()
                }
            }
            Outcome::Number { formula, value } => {
                let mut output = String::new();
                if options.include_formula {
                    output.push_str(formula);
                }
                if !options.suppress_result {
                    if options.include_formula {
                        output.push_str(" = ");
                    }
                    let text = format_number(*value);
                    if options.raw_number_formatting {
                        output.push_str(&text);
                    } else {
                        output.push_str(&group_thousands(&text));
                    }
                }
                output
            }
            Outcome::Boolean { value, chain, .. } => {
                let mut output = String::new();
                if options.include_formula {
                    output.push_str(&chain.render(!options.raw_number_formatting));
                }
                if !options.suppress_result {
                    if options.include_formula {
                        output.push_str(" :: ");
                    }
                    output.push_str(match (options.boolean_as_digit, *value) {
                        (true, true) => "1",
                        (true, false) => "0",
                        (false, true) => "true",
                        (false, false) => "false",
                    });
                }
                output
            }
        }
    }
}

impl From<ErrorKind> for Outcome {
    fn from(kind: ErrorKind) -> Self {
        Outcome::Error { kind }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(RenderOptions::default()))
    }
}

/// Controls how an [`Outcome`] is turned into text.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub include_formula: bool,
    pub suppress_result: bool,
    pub suppress_error_text: bool,
    pub raw_number_formatting: bool,
    pub boolean_as_digit: bool,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Formula text only, no result.
    pub fn formula_only() -> Self {
        Self::new().include_formula(true).suppress_result(true)
    }

    pub fn include_formula(mut self, include: bool) -> Self {
        self.include_formula = include;
        self
    }

    pub fn suppress_result(mut self, suppress: bool) -> Self {
        self.suppress_result = suppress;
        self
    }

    pub fn suppress_error_text(mut self, suppress: bool) -> Self {
        self.suppress_error_text = suppress;
        self
    }

    pub fn raw_number_formatting(mut self, raw: bool) -> Self {
        self.raw_number_formatting = raw;
        self
    }

    pub fn boolean_as_digit(mut self, digit: bool) -> Self {
        self.boolean_as_digit = digit;
        self
    }
}
