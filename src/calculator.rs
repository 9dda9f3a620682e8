use crate::ast::{Evaluation, Evaluator, Formula, Parser, DEFAULT_MAX_CHAIN_LENGTH};
use crate::error::Result;
use crate::normalize::{Normalizer, DEFAULT_MAX_NESTING_DEPTH, DEFAULT_MAX_SUBSTITUTION_PASSES};
use crate::outcome::Outcome;
use log::debug;
use lru::LruCache;
use std::num::NonZeroUsize;

pub const DEFAULT_CACHE_SIZE: usize = 100;

/// Limits and cache sizing for a [`Calculator`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CalculatorConfig {
    pub max_nesting_depth: usize,
    pub max_chain_length: usize,
    pub max_substitution_passes: usize,
    /// Parsed formulas kept around; `0` disables caching.
    pub cache_size: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_chain_length: DEFAULT_MAX_CHAIN_LENGTH,
            max_substitution_passes: DEFAULT_MAX_SUBSTITUTION_PASSES,
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

impl CalculatorConfig {
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn max_chain_length(mut self, length: usize) -> Self {
        self.max_chain_length = length;
        self
    }

    pub fn max_substitution_passes(mut self, passes: usize) -> Self {
        self.max_substitution_passes = passes;
        self
    }

    pub fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }
}

/// Normalizes, parses and evaluates formulas.
///
/// Parsed trees are cached by normalized text, so repeated formulas skip the
/// grammar pass. Results never depend on the cache.
pub struct Calculator {
    config: CalculatorConfig,
    normalizer: Normalizer,
    evaluator: Evaluator,
    cache: Option<LruCache<String, Formula>>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_config(CalculatorConfig::default())
    }

    pub fn with_config(config: CalculatorConfig) -> Self {
        Self {
            config,
            normalizer: Normalizer::new(config.max_nesting_depth, config.max_substitution_passes),
            evaluator: Evaluator::new(config.max_chain_length),
            cache: NonZeroUsize::new(config.cache_size).map(LruCache::new),
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn normalize(&self, formula: &str) -> Result<String> {
        self.normalizer.normalize(formula)
    }

    /// Parses a normalized formula, consulting the cache first.
    pub fn parse(&mut self, normalized: &str) -> Result<Formula> {
        if let Some(cache) = self.cache.as_mut() {
            if let Some(formula) = cache.get(normalized) {
                debug!("Cache hit: {}", normalized);
                return Ok(formula.clone());
            }
        }

        let formula =
            Parser::parse_formula_with_limit(normalized, self.config.max_chain_length)?;
        if let Some(cache) = self.cache.as_mut() {
            cache.put(normalized.to_string(), formula.clone());
        }
        Ok(formula)
    }

    /// Evaluates raw formula text. Failures come back as [`Outcome::Error`].
    pub fn evaluate(&mut self, formula: &str) -> Outcome {
        match self.try_evaluate(formula) {
            Ok(outcome) => outcome,
            Err(kind) => {
                debug!("Evaluation of '{}' failed: {}", formula, kind);
                Outcome::from(kind)
            }
        }
    }

    fn try_evaluate(&mut self, formula: &str) -> Result<Outcome> {
        let normalized = self.normalize(formula)?;
        let parsed = self.parse(&normalized)?;

        let outcome = match self.evaluator.evaluate_formula(&parsed)? {
            Evaluation::Number(value) => Outcome::Number {
                formula: normalized,
                value,
            },
            Evaluation::Comparison(chain) => Outcome::Boolean {
                formula: normalized,
                value: chain.result(),
                chain,
            },
        };
        debug!("Evaluated: {:?}", outcome);
        Ok(outcome)
    }

    pub fn cached_formulas(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.len())
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::outcome::RenderOptions;
    use rand::Rng;

    #[test]
    fn test_product() {
        let mut calculator = Calculator::new();
        let value = calculator.evaluate("6.47*19.5").value().unwrap();
        assert!((value - 126.165).abs() < 1e-9);
        assert_eq!(calculator.evaluate("6.47*19.5").to_string(), "126.165");
    }

    #[test]
    fn test_unbalanced_then_balanced() {
        let mut calculator = Calculator::new();
        assert_eq!(
            calculator.evaluate("(((389945.55*0.50)*0.25)*0.10").error(),
            Some(ErrorKind::Parentheses)
        );
        let outcome = calculator.evaluate("(((389945.55*0.50)*0.25)*0.10)");
        assert_eq!(outcome.to_string(), "4,874.319375");
        assert!((outcome.value().unwrap() - 4874.319375).abs() < 1e-9);
    }

    #[test]
    fn test_grouped_literal() {
        let mut calculator = Calculator::new();
        let outcome = calculator.evaluate("(((389,945.55*0.50)*0.25)*0.10)");
        assert_eq!(
            outcome.render(RenderOptions::new().raw_number_formatting(true)),
            "4874.319375"
        );
    }

    #[test]
    fn test_division_by_zero() {
        let mut calculator = Calculator::new();
        let outcome = calculator.evaluate("5/0");
        assert_eq!(outcome.error(), Some(ErrorKind::DivisionByZero));
        assert_eq!(outcome.value(), None);
    }

    #[test]
    fn test_variables() {
        let mut calculator = Calculator::new();
        let outcome = calculator.evaluate("a=12,b=32;sqrt(a^2+b^2)");
        assert_eq!(outcome.formula(), Some("sqrt((12)^2+(32)^2)"));
        assert!((outcome.value().unwrap() - 1168_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_variable_with_grouped_digits() {
        let mut calculator = Calculator::new();
        let outcome = calculator.evaluate("a=1,000;a+1");
        assert_eq!(outcome.formula(), Some("(1000)+1"));
        assert_eq!(outcome.value(), Some(1001.0));

        let outcome = calculator.evaluate("a=2,b=1,000,000;b/a");
        assert_eq!(outcome.value(), Some(500000.0));
    }

    #[test]
    fn test_long_sum() {
        let mut calculator = Calculator::new();
        let formula = vec!["1"; 200_000].join(" + ");
        assert_eq!(calculator.evaluate(&formula).value(), Some(200000.0));
    }

    #[test]
    fn test_comparison() {
        let mut calculator = Calculator::new();
        let outcome = calculator.evaluate("10+20*50/2>10*PI");
        assert_eq!(outcome.to_string(), "true");
        assert_eq!(
            outcome.render(RenderOptions::new().include_formula(true)),
            "510 > 31.4159265358979 :: true"
        );
    }

    #[test]
    fn test_empty() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.evaluate("").error(), Some(ErrorKind::Empty));
        assert_eq!(calculator.evaluate("   ").error(), Some(ErrorKind::Empty));
    }

    #[test]
    fn test_shift_precedence() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.evaluate("1+2<<1").value(), Some(5.0));
        assert_eq!(calculator.evaluate("1 << 2 < 5").value(), Some(1.0));
    }

    #[test]
    fn test_base_escapes() {
        let mut calculator = Calculator::new();
        assert_eq!(calculator.evaluate("\\xff + \\b101").value(), Some(260.0));
        assert_eq!(
            calculator.evaluate("\\b102").error(),
            Some(ErrorKind::Syntax)
        );
        assert_eq!(
            calculator.evaluate("\\xfg").error(),
            Some(ErrorKind::HexDigit)
        );
        assert_eq!(
            calculator.evaluate("oct(18)").error(),
            Some(ErrorKind::OctalDigit)
        );
    }

    #[test]
    fn test_limits() {
        let config = CalculatorConfig::default()
            .max_nesting_depth(2)
            .max_chain_length(1);
        let mut calculator = Calculator::with_config(config);
        assert_eq!(calculator.evaluate("((1))").value(), Some(1.0));
        assert_eq!(
            calculator.evaluate("(((1)))").error(),
            Some(ErrorKind::LimitExceeded)
        );
        assert_eq!(
            calculator.evaluate("1<2<3").error(),
            Some(ErrorKind::LimitExceeded)
        );
    }

    #[test]
    fn test_cache_does_not_change_results() {
        let mut cached = Calculator::new();
        let mut uncached = Calculator::with_config(CalculatorConfig::default().cache_size(0));

        for _ in 0..3 {
            assert_eq!(cached.evaluate("2^10/4"), uncached.evaluate("2^10/4"));
        }
        assert_eq!(cached.cached_formulas(), 1);
        assert_eq!(uncached.cached_formulas(), 0);
    }

    #[test]
    fn test_cache_is_bounded() {
        let mut calculator = Calculator::with_config(CalculatorConfig::default().cache_size(2));
        calculator.evaluate("1+1");
        calculator.evaluate("1+2");
        calculator.evaluate("1+3");
        assert_eq!(calculator.cached_formulas(), 2);
    }

    #[test]
    fn test_determinism() {
        let mut rng = rand::rng();
        let mut calculator = Calculator::new();

        for _ in 0..50 {
            let a = rng.random_range(1.0..1000.0_f64);
            let b = rng.random_range(1.0..1000.0_f64);
            let formula = format!("sqrt({}*{})+{}/{}^2", a, b, a, b);
            let first = calculator.evaluate(&formula).value().unwrap();
            let second = calculator.evaluate(&formula).value().unwrap();
            assert_eq!(first.to_bits(), second.to_bits(), "formula: {}", formula);
        }
    }
}
