use crate::error::ErrorKind;
use crate::format::{format_number, group_thousands};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Comparator {
    LessThan,
    GreaterThan,
    Equal,
    NotEqual,
    LessThanOrEqual,
    GreaterThanOrEqual,
    DoubleEqual,
}

impl Comparator {
    pub fn apply(&self, left: f64, right: f64) -> bool {
        match self {
            Comparator::LessThan => left < right,
            Comparator::GreaterThan => left > right,
            Comparator::Equal | Comparator::DoubleEqual => left == right,
            Comparator::NotEqual => left != right,
            Comparator::LessThanOrEqual => left <= right,
            Comparator::GreaterThanOrEqual => left >= right,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparator::LessThan => "<",
            Comparator::GreaterThan => ">",
            Comparator::Equal => "=",
            Comparator::NotEqual => "<>",
            Comparator::LessThanOrEqual => "<=",
            Comparator::GreaterThanOrEqual => ">=",
            Comparator::DoubleEqual => "==",
        }
    }
}

impl TryFrom<&str> for Comparator {
    type Error = ErrorKind;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "<" => Ok(Comparator::LessThan),
            ">" => Ok(Comparator::GreaterThan),
            "=" => Ok(Comparator::Equal),
            "<>" => Ok(Comparator::NotEqual),
            "<=" => Ok(Comparator::LessThanOrEqual),
            ">=" => Ok(Comparator::GreaterThanOrEqual),
            "==" => Ok(Comparator::DoubleEqual),
            _ => Err(ErrorKind::Syntax),
        }
    }
}

/// Evaluated operands of a comparison formula together with the reduced result.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonChain {
    operands: Vec<f64>,
    comparators: Vec<Comparator>,
    result: bool,
}

impl ComparisonChain {
    /// Reduces `operands[0] c0 operands[1] c1 ...` by conjunction of every
    /// adjacent pair, stopping at the first false comparison.
    pub fn reduce(operands: Vec<f64>, comparators: Vec<Comparator>) -> Result<Self, ErrorKind> {
        if operands.len() != comparators.len() + 1 {
            return Err(ErrorKind::Internal);
        }
        let result = comparators
            .iter()
            .zip(operands.windows(2))
            .all(|(comparator, pair)| comparator.apply(pair[0], pair[1]));
        Ok(Self {
            operands,
            comparators,
            result,
        })
    }

    pub fn result(&self) -> bool {
        self.result
    }

    pub fn operands(&self) -> &[f64] {
        &self.operands
    }

    pub fn comparators(&self) -> &[Comparator] {
        &self.comparators
    }

    /// Operands interleaved with their comparators, e.g. `510 > 31.4159265358979`.
    pub fn render(&self, grouped: bool) -> String {
        let number = |value: f64| {
            let text = format_number(value);
            if grouped {
                group_thousands(&text)
            } else {
                text
            }
        };

        let mut output = String::new();
        if let Some(first) = self.operands.first() {
            output.push_str(&number(*first));
        }
        for (comparator, operand) in self.comparators.iter().zip(self.operands.iter().skip(1)) {
            output.push(' ');
            output.push_str(comparator.symbol());
            output.push(' ');
            output.push_str(&number(*operand));
        }
        output
    }
}

impl fmt::Display for ComparisonChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}
