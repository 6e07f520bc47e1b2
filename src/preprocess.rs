use crate::environment::Environment;
use crate::error::PreprocessError;
use clap::ValueEnum;
use log::debug;

/// How identifiers are replaced with their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Substitution {
    /// Raw substring replacement of every occurrence. A name that appears inside a
    /// longer identifier is replaced there too.
    #[default]
    Textual,
    /// Only whole identifier runs are replaced.
    Token,
}

pub fn check_equal_parens(text: &str) -> bool {
    let open = text.chars().filter(|&c| c == '(').count();
    let close = text.chars().filter(|&c| c == ')').count();
    open == close
}

pub fn verify(raw: &str, env: &Environment) -> Result<String, PreprocessError> {
    verify_with(raw, env, Substitution::Textual)
}

pub fn verify_with(
    raw: &str,
    env: &Environment,
    mode: Substitution,
) -> Result<String, PreprocessError> {
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if !check_equal_parens(&stripped) {
        return Err(PreprocessError::UnbalancedParens);
    }

    let substituted = match mode {
        Substitution::Textual => substitute_textual(&stripped, env)?,
        Substitution::Token => substitute_tokens(&stripped, env)?,
    };
    debug!("preprocessed {:?} -> {:?}", raw, substituted);
    Ok(substituted)
}

/// Maximal `[A-Za-z_][A-Za-z0-9_]*` runs as `(start, end)` byte ranges, left to right.
fn identifier_spans(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_alphabetic() || b == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            spans.push((start, i));
        } else {
            i += 1;
        }
    }
    spans
}

fn lookup(name: &str, env: &Environment) -> Result<String, PreprocessError> {
    env.resolve(name)
        .map(|value| value.to_text())
        .ok_or_else(|| PreprocessError::UnknownIdentifier(name.to_string()))
}

fn substitute_textual(text: &str, env: &Environment) -> Result<String, PreprocessError> {
    let mut names: Vec<&str> = Vec::new();
    for (start, end) in identifier_spans(text) {
        let name = &text[start..end];
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let mut result = text.to_string();
    for name in names {
        let value = lookup(name, env)?;
        result = result.replace(name, &value);
    }
    Ok(result)
}

fn substitute_tokens(text: &str, env: &Environment) -> Result<String, PreprocessError> {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for (start, end) in identifier_spans(text) {
        result.push_str(&text[last..start]);
        result.push_str(&lookup(&text[start..end], env)?);
        last = end;
    }
    result.push_str(&text[last..]);
    Ok(result)
}
