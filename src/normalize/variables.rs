use crate::error::{ErrorKind, Result};
use crate::functions::Function;
use log::{debug, trace};
use std::iter::Peekable;
use std::str::CharIndices;

pub const DEFAULT_MAX_SUBSTITUTION_PASSES: usize = 5;

/// One `name=expression` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub expression: String,
}

impl TryFrom<&str> for Binding {
    type Error = ErrorKind;

    fn try_from(declaration: &str) -> std::result::Result<Self, Self::Error> {
        let (name, expression) = declaration
            .rsplit_once('=')
            .ok_or(ErrorKind::VariableSyntax)?;

        if !is_identifier(name)
            || expression.is_empty()
            || expression.contains(';')
            || expression.starts_with(',')
            || expression.ends_with(',')
            || Function::try_from(name).is_ok()
        {
            debug!("Rejected declaration: '{}'", declaration);
            return Err(ErrorKind::VariableSyntax);
        }

        Ok(Binding {
            name: name.to_string(),
            expression: expression.to_string(),
        })
    }
}

/// Expands `decl,decl;body` formulas into a plain body.
pub struct VariableExpander {
    max_passes: usize,
}

impl VariableExpander {
    pub fn new(max_passes: usize) -> Self {
        Self { max_passes }
    }

    /// Splits at the last `;`, then substitutes every binding into the body
    /// until a pass changes nothing.
    pub fn expand(&self, text: &str) -> Result<String> {
        let (declarations, body) = text.rsplit_once(';').ok_or(ErrorKind::VariableSyntax)?;
        debug!("Vars :: {} Formula :: {}", declarations, body);

        let bindings = parse_declarations(declarations)?;
        let mut formula = body.to_string();

        for pass in 0..self.max_passes {
            let (substituted, replaced) = substitute(&formula, &bindings);
            trace!("Substitution pass {} :: {}", pass + 1, substituted);
            formula = substituted;
            if !replaced {
                return Ok(formula);
            }
        }

        if references_any(&formula, &bindings) {
            debug!("Substitution still references variables: {}", formula);
            return Err(ErrorKind::InfiniteSubstitution);
        }
        Ok(formula)
    }
}

impl Default for VariableExpander {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SUBSTITUTION_PASSES)
    }
}

/// Parses comma separated declarations, rightmost first.
///
/// Each declaration starts after the last `,` before its `=`, so an
/// expression may itself contain digit grouping commas (`a=1,000`).
pub fn parse_declarations(declarations: &str) -> Result<Vec<Binding>> {
    let mut bindings = Vec::new();
    let mut remaining = declarations;

    loop {
        let equals = remaining.rfind('=').ok_or(ErrorKind::VariableSyntax)?;
        let start = remaining[..equals].rfind(',').map_or(0, |comma| comma + 1);
        bindings.push(Binding::try_from(&remaining[start..])?);
        if start == 0 {
            return Ok(bindings);
        }
        remaining = &remaining[..start - 1];
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

#[derive(Debug, PartialEq)]
enum Segment<'a> {
    Identifier(&'a str),
    Other(&'a str),
}

/// Splits a formula into identifiers and everything else. Numeric literals
/// (including exponents) and base escapes are never identifiers.
fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let identifier = c.is_ascii_alphabetic();
        if c == '\\' || identifier {
            skip_while(&mut chars, |c| c.is_ascii_alphanumeric());
        } else if c.is_ascii_digit() || c == '.' {
            skip_while(&mut chars, |c| c.is_ascii_alphanumeric() || c == '.');
        }

        let end = chars.peek().map_or(text.len(), |&(index, _)| index);
        let slice = &text[start..end];
        segments.push(if identifier {
            Segment::Identifier(slice)
        } else {
            Segment::Other(slice)
        });
    }
    segments
}

fn skip_while(chars: &mut Peekable<CharIndices<'_>>, predicate: impl Fn(char) -> bool) {
    while chars.next_if(|&(_, c)| predicate(c)).is_some() {}
}

/// Runs one pass over all bindings. Returns the new text and whether any
/// identifier was replaced.
fn substitute(formula: &str, bindings: &[Binding]) -> (String, bool) {
    let mut formula = formula.to_string();
    let mut replaced = false;

    for binding in bindings {
        let mut output = String::with_capacity(formula.len());
        for segment in segments(&formula) {
            match segment {
                Segment::Identifier(word) if word == binding.name => {
                    output.push('(');
                    output.push_str(&binding.expression);
                    output.push(')');
                    replaced = true;
                }
                Segment::Identifier(text) | Segment::Other(text) => output.push_str(text),
            }
        }
        formula = output;
    }

    (formula, replaced)
}

fn references_any(formula: &str, bindings: &[Binding]) -> bool {
    segments(formula).iter().any(|segment| match segment {
        Segment::Identifier(word) => bindings.iter().any(|binding| binding.name == *word),
        Segment::Other(_) => false,
    })
}
