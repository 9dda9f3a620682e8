use formulix_rs::{evaluate, render, RenderOptions};
use log::debug;

fn main() {
    pretty_env_logger::init();

    let formulas = [
        "6.47 * 19.5",
        "(((389,945.55 * 0.50) * 0.25) * 0.10",
        "(((389,945.55 * 0.50) * 0.25) * 0.10)",
        "5 / 0",
        "a = 12, b = 32; sqrt(a^2 + b^2)",
        "10 + 20 * 50 / 2 > 10 * PI",
        "1 + 2 << 1",
        "\\xff + \\b101",
    ];

    let with_formula = RenderOptions::new().include_formula(true);
    for formula in formulas {
        let outcome = evaluate(formula);
        debug!("outcome: {outcome:?}");
        println!("{:<45} -> {}", formula, render(&outcome, with_formula));
    }

    let outcome = evaluate("2 * 5");
    match outcome.fibonacci() {
        Ok(value) => println!("fib({}) = {}", outcome, value),
        Err(err) => println!("Error: {}", err),
    }
}
