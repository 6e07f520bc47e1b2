use crate::error::VarError;
use log::info;
use std::collections::BTreeMap;
use std::f64::consts::{E, PI};

/// Command names and their help descriptions, in display order.
pub const COMMANDS: [(&str, &str); 7] = [
    ("constants", "display mathematical constants"),
    ("exit", "close calculator"),
    ("help", "show help"),
    ("history", "input history"),
    ("prev", "previous input"),
    ("var", "save variable"),
    ("variables", "display saved variables"),
];

pub const ANSWER: &str = "ans";

pub fn is_command(name: &str) -> bool {
    COMMANDS.iter().any(|(command, _)| *command == name)
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Optional leading minus, then digits with at most one decimal point.
pub fn is_numeric_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

/// Text used both for display and for substitution back into expressions.
/// Integral values keep a trailing `.0`; nothing is ever printed in exponent form.
pub fn format_number(x: f64) -> String {
    if x.fract() == 0.0 && x.abs() < 1e16 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Number(f64),
    Text(&'a str),
}

impl Resolved<'_> {
    pub fn to_text(&self) -> String {
        match self {
            Resolved::Number(v) => format_number(*v),
            Resolved::Text(t) => t.to_string(),
        }
    }
}

/// Session store of constants, user variables and evaluation history.
#[derive(Debug, Clone)]
pub struct Environment {
    constants: BTreeMap<String, Option<f64>>,
    variables: BTreeMap<String, String>,
    history: Vec<(String, String)>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        let mut constants = BTreeMap::new();
        constants.insert("pi".to_string(), Some(PI));
        constants.insert("e".to_string(), Some(E));
        constants.insert(ANSWER.to_string(), None);

        Environment {
            constants,
            variables: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    pub fn is_constant(&self, name: &str) -> bool {
        self.constants.contains_key(name)
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied().flatten()
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// Constants win over variables, though the two never share a name.
    pub fn resolve(&self, name: &str) -> Option<Resolved<'_>> {
        if let Some(value) = self.constant(name) {
            return Some(Resolved::Number(value));
        }
        self.variable(name).map(Resolved::Text)
    }

    pub fn set_variable(&mut self, name: &str, value: &str) -> Result<(), VarError> {
        if !is_identifier(name) {
            return Err(VarError::InvalidIdentifier);
        }
        if !is_numeric_literal(value) {
            return Err(VarError::InvalidValue);
        }
        if is_command(name) {
            return Err(VarError::CommandCollision);
        }
        if self.is_constant(name) {
            return Err(VarError::ConstantCollision);
        }

        info!("variable {} = {}", name, value);
        self.variables.insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn answer(&self) -> Option<f64> {
        self.constant(ANSWER)
    }

    pub fn set_answer(&mut self, value: f64) {
        self.constants.insert(ANSWER.to_string(), Some(value));
    }

    /// Re-adding a line overwrites its result but keeps its original position.
    pub fn add_history(&mut self, line: &str, result: &str) {
        match self.history.iter_mut().find(|(l, _)| l == line) {
            Some(entry) => entry.1 = result.to_string(),
            None => self.history.push((line.to_string(), result.to_string())),
        }
    }

    pub fn last_history(&self) -> Option<(&str, &str)> {
        self.history
            .last()
            .map(|(line, result)| (line.as_str(), result.as_str()))
    }

    pub fn all_history(&self) -> impl Iterator<Item = (&str, &str)> {
        self.history
            .iter()
            .map(|(line, result)| (line.as_str(), result.as_str()))
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_text(&self) -> String {
        join_pairs(self.all_history(), " = ")
    }

    pub fn variables_text(&self) -> String {
        join_pairs(
            self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            " = ",
        )
    }

    pub fn constants_text(&self) -> String {
        self.constants
            .iter()
            .map(|(name, value)| match value {
                Some(v) => format!("{} = {}", name, format_number(*v)),
                None => format!("{} = undefined", name),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn commands_text() -> String {
        join_pairs(COMMANDS.iter().copied(), ": ")
    }
}

fn join_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>, sep: &str) -> String {
    pairs
        .map(|(key, value)| format!("{}{}{}", key, sep, value))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_listed_alphabetically() {
        let expected = "constants: display mathematical constants\n\
                        exit: close calculator\n\
                        help: show help\n\
                        history: input history\n\
                        prev: previous input\n\
                        var: save variable\n\
                        variables: display saved variables";
        assert_eq!(Environment::commands_text(), expected);
    }

    #[test]
    fn history_keeps_first_position_on_overwrite() {
        let mut env = Environment::new();
        env.add_history("1+2", "3.0");
        env.add_history("2 * 2", "4.0");
        env.add_history("1+2", "5.0");
        assert_eq!(env.history_text(), "1+2 = 5.0\n2 * 2 = 4.0");
        assert_eq!(env.last_history(), Some(("2 * 2", "4.0")));
    }

    #[test]
    fn empty_environment_renders_empty_text() {
        let env = Environment::new();
        assert_eq!(env.history_text(), "");
        assert_eq!(env.variables_text(), "");
        assert_eq!(env.last_history(), None);
    }

    #[test]
    fn constants_render_sorted_with_undefined_answer() {
        let env = Environment::new();
        let expected = format!("ans = undefined\ne = {}\npi = {}", E, PI);
        assert_eq!(env.constants_text(), expected);
    }

    #[test]
    fn variables_render_sorted() {
        let mut env = Environment::new();
        env.set_variable("ten", "10").unwrap();
        env.set_variable("five", "5").unwrap();
        assert_eq!(env.variables_text(), "five = 5\nten = 10");
    }

    #[test]
    fn set_variable_rejections() {
        let mut env = Environment::new();
        assert_eq!(env.set_variable("5", "5"), Err(VarError::InvalidIdentifier));
        assert_eq!(env.set_variable("five", "X"), Err(VarError::InvalidValue));
        assert_eq!(env.set_variable("five", "1 2"), Err(VarError::InvalidValue));
        assert_eq!(env.set_variable("help", "5"), Err(VarError::CommandCollision));
        assert_eq!(env.set_variable("pi", "3.14"), Err(VarError::ConstantCollision));
        assert_eq!(env.variables_text(), "");
        assert_eq!(env.constant("pi"), Some(PI));
    }

    #[test]
    fn resolve_prefers_defined_values() {
        let mut env = Environment::new();
        assert_eq!(env.resolve("ans"), None);
        env.set_answer(4.0);
        assert_eq!(env.resolve("ans"), Some(Resolved::Number(4.0)));
        env.set_variable("x", "-2.5").unwrap();
        assert_eq!(env.resolve("x"), Some(Resolved::Text("-2.5")));
        assert_eq!(env.resolve("y"), None);
    }

    #[test]
    fn numeric_literals() {
        assert!(is_numeric_literal("5"));
        assert!(is_numeric_literal("-5.25"));
        assert!(is_numeric_literal(".5"));
        assert!(!is_numeric_literal("1.2.3"));
        assert!(!is_numeric_literal("-"));
        assert!(!is_numeric_literal(""));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(4.0), "4.0");
        assert_eq!(format_number(-50.0), "-50.0");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(PI), "3.141592653589793");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }
}
