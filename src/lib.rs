pub mod ast;
pub mod calculator;
pub mod error;
pub mod format;
pub mod functions;
pub mod normalize;
pub mod outcome;

pub use calculator::{Calculator, CalculatorConfig};
pub use error::ErrorKind;
pub use outcome::{Outcome, RenderOptions};

/// Evaluates a single formula with default limits and no parse cache.
pub fn evaluate(formula: &str) -> Outcome {
    let mut calculator = Calculator::with_config(CalculatorConfig::default().cache_size(0));
    calculator.evaluate(formula)
}

/// Renders an outcome as text.
pub fn render(outcome: &Outcome, options: RenderOptions) -> String {
    outcome.render(options)
}
