use crate::error::{ErrorKind, Result};
use log::debug;

/// Positional bases reachable through `\b`, `\o`, `\x` escapes or the
/// `bin`, `oct`, `hex` pseudo-functions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Radix {
    Binary,
    Octal,
    Hexadecimal,
}

impl Radix {
    /// Resolves the letter following a backslash escape.
    pub fn from_escape(c: char) -> Option<Self> {
        match c {
            'b' => Some(Radix::Binary),
            'o' => Some(Radix::Octal),
            'x' => Some(Radix::Hexadecimal),
            _ => None,
        }
    }

    pub fn base(&self) -> u32 {
        match self {
            Radix::Binary => 2,
            Radix::Octal => 8,
            Radix::Hexadecimal => 16,
        }
    }

    /// Name of the pseudo-function an escape expands into.
    pub fn function_name(&self) -> &'static str {
        match self {
            Radix::Binary => "bin",
            Radix::Octal => "oct",
            Radix::Hexadecimal => "hex",
        }
    }

    /// Characters the normalizer keeps inside an escaped literal.
    ///
    /// Hexadecimal literals swallow any alphanumeric so that a stray `g`
    /// surfaces as a digit error instead of silently ending the literal.
    pub fn accepts_escaped(&self, c: char) -> bool {
        match self {
            Radix::Binary => matches!(c, '0' | '1'),
            Radix::Octal => matches!(c, '0'..='7'),
            Radix::Hexadecimal => c.is_ascii_alphanumeric(),
        }
    }

    pub fn digit_error(&self) -> ErrorKind {
        match self {
            Radix::Binary => ErrorKind::BinaryDigit,
            Radix::Octal => ErrorKind::OctalDigit,
            Radix::Hexadecimal => ErrorKind::HexDigit,
        }
    }

    /// Folds a digit string most-significant-first into its value.
    pub fn to_decimal(&self, digits: &str) -> Result<f64> {
        let base = self.base();
        let value = digits.chars().try_fold(0.0_f64, |acc, c| {
            c.to_digit(base)
                .map(|digit| acc * base as f64 + digit as f64)
                .ok_or_else(|| self.digit_error())
        })?;
        debug!("{} to decimal :: '{}' :: {}", self.function_name(), digits, value);
        Ok(value)
    }
}

impl TryFrom<&str> for Radix {
    type Error = ErrorKind;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        match value {
            "bin" => Ok(Radix::Binary),
            "oct" => Ok(Radix::Octal),
            "hex" => Ok(Radix::Hexadecimal),
            _ => Err(ErrorKind::Syntax),
        }
    }
}
