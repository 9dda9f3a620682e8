use crate::ast::{ASTNode, ComparisonChain, Formula, Parser};
use crate::error::{ErrorKind, Result};
use log::debug;

pub const DEFAULT_MAX_CHAIN_LENGTH: usize = 1000;

/// Result of evaluating a whole formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Number(f64),
    Comparison(ComparisonChain),
}

pub struct Evaluator {
    max_chain_length: usize,
}

impl Evaluator {
    /// Creates a new `Evaluator` accepting at most `max_chain_length` comparators per formula.
    pub fn new(max_chain_length: usize) -> Self {
        Self { max_chain_length }
    }

    /// Parses and evaluates an already normalized formula.
    pub fn evaluate_expression(&self, formula: &str) -> Result<Evaluation> {
        let parsed = Parser::parse_formula_with_limit(formula, self.max_chain_length)?;
        self.evaluate_formula(&parsed)
    }

    /// Evaluates a parsed formula. Comparison operands are all evaluated
    /// before the chain is reduced.
    pub fn evaluate_formula(&self, formula: &Formula) -> Result<Evaluation> {
        match formula {
            Formula::Arithmetic(ast) => self.evaluate(ast).map(Evaluation::Number),
            Formula::Comparison {
                operands,
                comparators,
            } => {
                if comparators.len() > self.max_chain_length {
                    debug!(
                        "Comparison chain of {} exceeds limit {}",
                        comparators.len(),
                        self.max_chain_length
                    );
                    return Err(ErrorKind::LimitExceeded);
                }

                let values = operands
                    .iter()
                    .map(|operand| self.evaluate(operand))
                    .collect::<Result<Vec<f64>>>()?;
                let chain = ComparisonChain::reduce(values, comparators.clone())?;
                debug!("Comparison chain: {} :: {}", chain, chain.result());
                Ok(Evaluation::Comparison(chain))
            }
        }
    }

    /// Evaluates an `ASTNode` to a number.
    pub fn evaluate(&self, ast: &ASTNode) -> Result<f64> {
        let result = match ast {
            ASTNode::Number(n) => Ok(*n),

            ASTNode::Constant(constant) => Ok(constant.value()),

            ASTNode::BaseLiteral { radix, digits } => radix.to_decimal(digits),

            ASTNode::Negate(inner) => Ok(-self.evaluate(inner)?),

            ASTNode::Chain { first, rest } => {
                let mut value = self.evaluate(first)?;
                for (operator, operand) in rest {
                    value = operator.apply(value, self.evaluate(operand)?)?;
                }
                Ok(value)
            }

            ASTNode::FunctionCall { function, argument } => {
                let value = self.evaluate(argument)?;
                function.apply(value)
            }

            ASTNode::Group(inner) => self.evaluate(inner),
        }?;

        Ok(result)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHAIN_LENGTH)
    }
}
