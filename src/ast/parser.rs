use crate::ast::{ASTNode, Comparator, Constant, Formula, Level, Operator, DEFAULT_MAX_CHAIN_LENGTH};
use crate::error::{ErrorKind, Result};
use crate::functions::{Function, Radix};
use log::{debug, trace};
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "./formula.pest"]
pub struct FormulaParser;

impl FormulaParser {
    /// Parses a normalized formula into its tree form.
    ///
    /// Any grammar failure is reported as [`ErrorKind::Syntax`]; the pest
    /// diagnostic is only logged.
    pub fn parse_formula(input: &str) -> Result<Formula> {
        Self::parse_formula_with_limit(input, DEFAULT_MAX_CHAIN_LENGTH)
    }

    /// Like [`FormulaParser::parse_formula`], failing with
    /// [`ErrorKind::LimitExceeded`] before any operand is built when the
    /// formula has more than `max_chain_length` comparators.
    pub fn parse_formula_with_limit(input: &str, max_chain_length: usize) -> Result<Formula> {
        debug!("Parsing formula: {}", input);
        let parse_result = FormulaParser::parse(Rule::formula, input)
            .map_err(|e| {
                debug!("Parse error: {}", e);
                ErrorKind::Syntax
            })?
            .next()
            .ok_or(ErrorKind::Syntax)?;

        let comparison = next_pair(&mut parse_result.into_inner())?;
        Self::build_comparison(comparison, max_chain_length)
    }

    fn build_comparison(pair: Pair<Rule>, max_chain_length: usize) -> Result<Formula> {
        let mut pairs = pair.into_inner();
        let chain_length = pairs
            .clone()
            .filter(|pair| pair.as_rule() == Rule::comparator)
            .count();
        if chain_length > max_chain_length {
            debug!(
                "Comparison chain of {} exceeds limit {}",
                chain_length, max_chain_length
            );
            return Err(ErrorKind::LimitExceeded);
        }

        let mut operands = vec![Self::build_arithmetic(next_pair(&mut pairs)?)?];
        let mut comparators = Vec::new();

        while let Some(comparator_pair) = pairs.next() {
            comparators.push(Comparator::try_from(comparator_pair.as_str())?);
            operands.push(Self::build_arithmetic(next_pair(&mut pairs)?)?);
        }

        if comparators.is_empty() {
            let node = operands.pop().ok_or(ErrorKind::Internal)?;
            return Ok(Formula::Arithmetic(node));
        }

        debug!("Comparison chain with {} comparators", comparators.len());
        Ok(Formula::Comparison {
            operands,
            comparators,
        })
    }

    /// Builds one precedence level as a flat operand list. A level without
    /// operators collapses to its single operand.
    fn build_arithmetic(pair: Pair<Rule>) -> Result<ASTNode> {
        let level = match pair.as_rule() {
            Rule::sum => Level::Sum,
            Rule::product => Level::Product,
            Rule::quotient => Level::Quotient,
            Rule::power => Level::Power,
            Rule::shift => Level::Shift,
            Rule::operand => return Self::build_operand(pair),
            rule => {
                debug!("Unexpected rule in arithmetic expression: {:?}", rule);
                return Err(ErrorKind::Internal);
            }
        };

        trace!("Building {:?} level: {}", level, pair.as_str());
        let mut pairs = pair.into_inner();
        let first = Self::build_arithmetic(next_pair(&mut pairs)?)?;
        let mut rest = Vec::new();

        while let Some(operator_pair) = pairs.next() {
            let operator = Operator::try_from(operator_pair.as_str())?;
            if operator.level() != level {
                debug!("Operator {} found at {:?} level", operator.symbol(), level);
                return Err(ErrorKind::Internal);
            }
            rest.push((operator, Self::build_arithmetic(next_pair(&mut pairs)?)?));
        }

        if rest.is_empty() {
            return Ok(first);
        }
        Ok(ASTNode::Chain {
            first: Box::new(first),
            rest,
        })
    }

    fn build_operand(pair: Pair<Rule>) -> Result<ASTNode> {
        let mut pairs = pair.into_inner();
        let first = next_pair(&mut pairs)?;

        if first.as_rule() == Rule::sign {
            let primary = Self::build_primary(next_pair(&mut pairs)?)?;
            return Ok(match first.as_str() {
                "-" => negate(primary),
                _ => primary,
            });
        }

        Self::build_primary(first)
    }

    fn build_primary(pair: Pair<Rule>) -> Result<ASTNode> {
        trace!("Building primary: {:?}", pair.as_rule());
        match pair.as_rule() {
            Rule::number => pair
                .as_str()
                .parse::<f64>()
                .map(ASTNode::Number)
                .map_err(|_| ErrorKind::Syntax),
            Rule::constant => Ok(ASTNode::Constant(Constant::try_from(pair.as_str())?)),
            Rule::group => {
                let inner = next_pair(&mut pair.into_inner())?;
                Ok(ASTNode::Group(Box::new(Self::build_arithmetic(inner)?)))
            }
            Rule::base_call => Self::build_base_call(pair),
            Rule::function_call => Self::build_function_call(pair),
            rule => {
                debug!("Unexpected rule in primary expression: {:?}", rule);
                Err(ErrorKind::Internal)
            }
        }
    }

    fn build_base_call(pair: Pair<Rule>) -> Result<ASTNode> {
        let mut pairs = pair.into_inner();
        let radix = Radix::try_from(next_pair(&mut pairs)?.as_str())?;
        let digits = next_pair(&mut pairs)?.as_str().to_string();
        Ok(ASTNode::BaseLiteral { radix, digits })
    }

    fn build_function_call(pair: Pair<Rule>) -> Result<ASTNode> {
        let mut pairs = pair.into_inner();
        let name = next_pair(&mut pairs)?.as_str();
        let function = Function::try_from(name).map_err(|e| {
            debug!("Unknown function: {}", name);
            e
        })?;

        // bin/oct/hex only take a literal digit run, never an expression
        if function.radix().is_some() {
            debug!("{} called with an expression argument", name);
            return Err(ErrorKind::Syntax);
        }

        let argument = Self::build_arithmetic(next_pair(&mut pairs)?)?;
        Ok(ASTNode::FunctionCall {
            function,
            argument: Box::new(argument),
        })
    }
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>) -> Result<Pair<'i, Rule>> {
    pairs.next().ok_or(ErrorKind::Internal)
}

/// A sign in front of a literal becomes part of the literal.
fn negate(node: ASTNode) -> ASTNode {
    match node {
        ASTNode::Number(value) => ASTNode::Number(-value),
        other => ASTNode::Negate(Box::new(other)),
    }
}
