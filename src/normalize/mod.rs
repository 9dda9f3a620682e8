mod variables;

pub use variables::{
    parse_declarations, Binding, VariableExpander, DEFAULT_MAX_SUBSTITUTION_PASSES,
};

use crate::error::{ErrorKind, Result};
use crate::functions::Radix;
use log::{debug, trace};

pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

/// Scanner state: plain formula text, or the digit run of an escaped literal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ScanMode {
    Decimal,
    Digits(Radix),
}

/// Turns raw user text into the canonical formula every later stage expects.
pub struct Normalizer {
    max_nesting_depth: usize,
    expander: VariableExpander,
}

impl Normalizer {
    pub fn new(max_nesting_depth: usize, max_substitution_passes: usize) -> Self {
        Self {
            max_nesting_depth,
            expander: VariableExpander::new(max_substitution_passes),
        }
    }

    /// Strips whitespace, lowercases, expands variables and base escapes,
    /// then rejects structurally malformed formulas.
    ///
    /// Normalizing an already normalized formula returns it unchanged.
    pub fn normalize(&self, raw: &str) -> Result<String> {
        debug!("Normalizing formula: {}", raw);
        let mut text: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if text.contains(';') {
            text = self.expander.expand(&text)?;
        }

        let formula = self.scan(&text)?;
        validate(&formula)?;
        debug!("Normalized formula: {}", formula);
        Ok(formula)
    }

    fn scan(&self, text: &str) -> Result<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut output = String::with_capacity(text.len());
        let mut mode = ScanMode::Decimal;
        let mut depth = 0_usize;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if let ScanMode::Digits(radix) = mode {
                if radix.accepts_escaped(c) {
                    output.push(c);
                    i += 1;
                } else {
                    // close the literal and look at `c` again as plain text
                    trace!("Closing {} literal before '{}'", radix.function_name(), c);
                    output.push(')');
                    mode = ScanMode::Decimal;
                }
                continue;
            }

            match c {
                '(' => {
                    depth += 1;
                    if depth > self.max_nesting_depth {
                        debug!("Nesting depth {} exceeds {}", depth, self.max_nesting_depth);
                        return Err(ErrorKind::LimitExceeded);
                    }
                    output.push(c);
                }
                ')' => {
                    depth = depth.checked_sub(1).ok_or(ErrorKind::Parentheses)?;
                    output.push(c);
                }
                '\\' => {
                    let radix = chars
                        .get(i + 1)
                        .copied()
                        .and_then(Radix::from_escape)
                        .ok_or(ErrorKind::Syntax)?;
                    trace!("Escaped {} literal at {}", radix.function_name(), i);
                    output.push_str(radix.function_name());
                    output.push('(');
                    mode = ScanMode::Digits(radix);
                    i += 1;
                }
                ',' if is_digit_separator(&chars, i) => {}
                c if is_accepted(c) => output.push(c),
                c => {
                    debug!("Invalid character '{}' at {}", c, i);
                    return Err(ErrorKind::InvalidCharacter);
                }
            }
            i += 1;
        }

        if let ScanMode::Digits(_) = mode {
            output.push(')');
        }
        if depth != 0 {
            return Err(ErrorKind::Parentheses);
        }
        Ok(output)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH, DEFAULT_MAX_SUBSTITUTION_PASSES)
    }
}

fn is_accepted(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_lowercase() || ".+-*/%^<>=()".contains(c)
}

fn is_digit_separator(chars: &[char], i: usize) -> bool {
    i > 0
        && chars[i - 1].is_ascii_digit()
        && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
}

fn is_operator(c: u8) -> bool {
    matches!(c, b'+' | b'-' | b'*' | b'/' | b'%' | b'^' | b'<' | b'>' | b'=')
}

fn starts_operand(c: u8) -> bool {
    c.is_ascii_digit() || c.is_ascii_lowercase() || c == b'('
}

fn is_double_token(c: u8, next: u8) -> bool {
    matches!(
        (c, next),
        (b'>', b'=') | (b'<', b'=') | (b'<', b'>') | (b'=', b'=') | (b'<', b'<') | (b'>', b'>')
    )
}

/// Structural checks on the scanned text, in a fixed order so that each
/// malformed formula maps to exactly one error.
fn validate(formula: &str) -> Result<()> {
    let bytes = formula.as_bytes();
    let (first, last) = match (bytes.first(), bytes.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(ErrorKind::Empty),
    };

    if !(starts_operand(first) || first == b'+' || first == b'-') {
        return Err(ErrorKind::InvalidCharacter);
    }
    if is_operator(last) || last == b'(' {
        return Err(ErrorKind::Syntax);
    }
    if let Some(open) = formula.rfind('(') {
        if formula.rfind(')').map_or(true, |close| open > close) {
            return Err(ErrorKind::Parentheses);
        }
    }
    if formula.contains("()") {
        return Err(ErrorKind::EmptyParentheses);
    }

    let mut i = 0;
    while i + 1 < bytes.len() {
        let (c, next) = (bytes[i], bytes[i + 1]);
        if is_operator(c) && !starts_operand(next) {
            if next == b'-' && bytes.get(i + 2).is_some_and(|&after| starts_operand(after)) {
                i += 2;
                continue;
            }
            if !is_double_token(c, next) {
                debug!("Adjacent operators '{}{}' at {}", c as char, next as char, i);
                return Err(ErrorKind::Syntax);
            }
            i += 1;
        }
        i += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(raw: &str) -> Result<String> {
        Normalizer::default().normalize(raw)
    }

    #[test]
    fn test_whitespace_and_case() {
        assert_eq!(normalize(" 6.47 * 19.5 ").unwrap(), "6.47*19.5");
        assert_eq!(normalize("10 + 20*50/2 > 10*PI").unwrap(), "10+20*50/2>10*pi");
        assert_eq!(normalize("\tSQRT( 4 )\n").unwrap(), "sqrt(4)");
    }

    #[test]
    fn test_digit_grouping_commas_are_dropped() {
        assert_eq!(
            normalize("(((389,945.55*0.50)*0.25)*0.10)").unwrap(),
            "(((389945.55*0.50)*0.25)*0.10)"
        );
        assert_eq!(normalize("1,2"), Ok("12".to_string()));
        assert_eq!(normalize("sqrt(1,a)"), Err(ErrorKind::InvalidCharacter));
    }

    #[test]
    fn test_base_escapes() {
        assert_eq!(normalize("\\xFF+1").unwrap(), "hex(ff)+1");
        assert_eq!(normalize("\\b101*2").unwrap(), "bin(101)*2");
        assert_eq!(normalize("\\o17").unwrap(), "oct(17)");
        assert_eq!(normalize("\\b1012").unwrap(), "bin(101)2");
        assert_eq!(normalize("\\q12"), Err(ErrorKind::Syntax));
        assert_eq!(normalize("1+\\"), Err(ErrorKind::Syntax));
    }

    #[test]
    fn test_variables_are_expanded() {
        assert_eq!(
            normalize("a = 12, b = 32; sqrt(a^2 + b^2)").unwrap(),
            "sqrt((12)^2+(32)^2)"
        );
        assert_eq!(normalize("X=\\xa;x*2").unwrap(), "(hex(a))*2");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), Err(ErrorKind::Empty));
        assert_eq!(normalize("   "), Err(ErrorKind::Empty));
    }

    #[test]
    fn test_parentheses_errors() {
        assert_eq!(
            normalize("(((389945.55*0.50)*0.25)*0.10"),
            Err(ErrorKind::Parentheses)
        );
        assert_eq!(normalize("1+2)"), Err(ErrorKind::Parentheses));
        assert_eq!(normalize(")1+2("), Err(ErrorKind::Parentheses));
        assert_eq!(normalize("1+()"), Err(ErrorKind::EmptyParentheses));
    }

    #[test]
    fn test_invalid_characters() {
        assert_eq!(normalize("1+2$"), Err(ErrorKind::InvalidCharacter));
        assert_eq!(normalize("2×3"), Err(ErrorKind::InvalidCharacter));
        assert_eq!(normalize("*2"), Err(ErrorKind::InvalidCharacter));
        assert_eq!(normalize(".5"), Err(ErrorKind::InvalidCharacter));
    }

    #[test]
    fn test_operator_placement() {
        assert_eq!(normalize("1+"), Err(ErrorKind::Syntax));
        assert_eq!(normalize("sqrt("), Err(ErrorKind::Parentheses));
        assert_eq!(normalize("1*/2"), Err(ErrorKind::Syntax));
        assert_eq!(normalize("1=<2"), Err(ErrorKind::Syntax));
        assert_eq!(normalize("2*-3").unwrap(), "2*-3");
        assert_eq!(normalize("2^-(1)").unwrap(), "2^-(1)");
        assert_eq!(normalize("1<<2").unwrap(), "1<<2");
        assert_eq!(normalize("1<>2").unwrap(), "1<>2");
        assert_eq!(normalize("1>=-2").unwrap(), "1>=-2");
        assert_eq!(normalize("1==2").unwrap(), "1==2");
    }

    #[test]
    fn test_nesting_limit() {
        let normalizer = Normalizer::new(3, DEFAULT_MAX_SUBSTITUTION_PASSES);
        assert!(normalizer.normalize("(((1)))").is_ok());
        assert_eq!(
            normalizer.normalize("((((1))))"),
            Err(ErrorKind::LimitExceeded)
        );
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let inputs = [
            "6.47 * 19.5",
            "(((389,945.55*0.50)*0.25)*0.10)",
            "a=12,b=32;sqrt(a^2+b^2)",
            "10+20*50/2 > 10*PI",
            "\\xff + \\b11",
            "1 + 2 << 1",
        ];
        for input in inputs {
            let once = normalize(input).unwrap();
            assert_eq!(normalize(&once).unwrap(), once, "input: {}", input);
        }
    }
}
