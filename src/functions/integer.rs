use crate::error::{ErrorKind, Result};

/// Largest Fibonacci index whose value is still an exact `f64` integer.
pub const FIBONACCI_LIMIT: i64 = 78;

/// `n!` for non-negative integers.
pub fn factorial(n: f64) -> Result<f64> {
    if n < 0.0 || n.fract() != 0.0 || !n.is_finite() {
        return Err(ErrorKind::FactorialBounds);
    }
    let mut result = 1.0_f64;
    let mut i = 2.0;
    while i <= n {
        result *= i;
        if result.is_infinite() {
            return Err(ErrorKind::Range);
        }
        i += 1.0;
    }
    Ok(result)
}

/// Fibonacci and negafibonacci numbers by linear iteration.
///
/// The index is floored first. `F(-n) = (-1)^(n+1) * F(n)`.
pub fn fibonacci(n: f64) -> Result<f64> {
    if !n.is_finite() {
        return Err(ErrorKind::FibonacciBounds);
    }
    let index = n.floor();
    if index.abs() > FIBONACCI_LIMIT as f64 {
        return Err(ErrorKind::FibonacciBounds);
    }
    let index = index as i64;
    let magnitude = index.unsigned_abs();

    let (mut previous, mut current) = (0_u64, 1_u64);
    for _ in 0..magnitude {
        let next = previous + current;
        previous = current;
        current = next;
    }
    let value = previous as f64;

    if index < 0 && magnitude % 2 == 0 {
        Ok(-value)
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0.0).unwrap(), 1.0);
        assert_eq!(factorial(1.0).unwrap(), 1.0);
        assert_eq!(factorial(5.0).unwrap(), 120.0);
        assert_eq!(factorial(10.0).unwrap(), 3628800.0);
    }

    #[test]
    fn test_factorial_rejects_bad_input() {
        assert_eq!(factorial(-1.0), Err(ErrorKind::FactorialBounds));
        assert_eq!(factorial(2.5), Err(ErrorKind::FactorialBounds));
        assert_eq!(factorial(f64::NAN), Err(ErrorKind::FactorialBounds));
    }

    #[test]
    fn test_factorial_overflow() {
        assert!(factorial(170.0).unwrap().is_finite());
        assert_eq!(factorial(171.0), Err(ErrorKind::Range));
    }

    #[test]
    fn test_fibonacci() {
        let expected = [0.0, 1.0, 1.0, 2.0, 3.0, 5.0, 8.0, 13.0, 21.0, 34.0, 55.0];
        for (n, value) in expected.iter().enumerate() {
            assert_eq!(fibonacci(n as f64).unwrap(), *value, "F({})", n);
        }
        assert_eq!(fibonacci(78.0).unwrap(), 8944394323791464.0);
    }

    #[test]
    fn test_negafibonacci() {
        assert_eq!(fibonacci(-1.0).unwrap(), 1.0);
        assert_eq!(fibonacci(-2.0).unwrap(), -1.0);
        assert_eq!(fibonacci(-3.0).unwrap(), 2.0);
        assert_eq!(fibonacci(-4.0).unwrap(), -3.0);
        assert_eq!(fibonacci(-8.0).unwrap(), -21.0);
    }

    #[test]
    fn test_fibonacci_floors_index() {
        assert_eq!(fibonacci(10.9).unwrap(), 55.0);
    }

    #[test]
    fn test_fibonacci_bounds() {
        assert_eq!(fibonacci(79.0), Err(ErrorKind::FibonacciBounds));
        assert_eq!(fibonacci(-79.0), Err(ErrorKind::FibonacciBounds));
        assert_eq!(fibonacci(1475.0), Err(ErrorKind::FibonacciBounds));
        assert_eq!(fibonacci(f64::INFINITY), Err(ErrorKind::FibonacciBounds));
    }
}
