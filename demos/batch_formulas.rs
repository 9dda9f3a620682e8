use formulix_rs::{Calculator, RenderOptions};
use std::io::{self, BufRead};

/// Evaluates one formula per stdin line, e.g.
/// `printf '1+1\n5/0\n' | cargo run --example batch_formulas`.
fn main() -> io::Result<()> {
    pretty_env_logger::init();

    let mut calculator = Calculator::new();
    let options = RenderOptions::new().include_formula(true);

    for (i, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let outcome = calculator.evaluate(&line);
        println!("Result {}: {}", i, outcome.render(options));
    }

    Ok(())
}
