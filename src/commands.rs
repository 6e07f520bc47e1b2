use crate::calc_engine::parse;
use crate::config::Settings;
use crate::environment::{format_number, Environment};
use crate::error::CalcError;
use crate::evaluator::{evaluate_traced, EvaluationTrace, Step};
use crate::preprocess::verify_with;
use log::{debug, warn};

/// What the front end should show for one input line.
pub enum Reply {
    Nothing,
    Value { result: f64, steps: Vec<Step> },
    Text(String),
    Error(String),
    Quit,
}

impl Reply {
    /// Text to print, `None` for blank input and quit.
    pub fn render(&self) -> Option<String> {
        match self {
            Reply::Nothing | Reply::Quit => None,
            Reply::Value { result, .. } => Some(format!("= {}", format_number(*result))),
            Reply::Text(text) => Some(text.clone()),
            Reply::Error(message) => Some(format!("Error: {}", message)),
        }
    }
}

/// A calculator session: one environment plus the command dispatcher around it.
pub struct Session {
    env: Environment,
    settings: Settings,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Session {
            env: Environment::new(),
            settings,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn banner() -> String {
        Environment::commands_text()
    }

    pub fn handle_line(&mut self, line: &str) -> Reply {
        let line = line.trim();
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = words.first() else {
            return Reply::Nothing;
        };

        match first.to_lowercase().as_str() {
            "exit" => Reply::Quit,
            "history" => Reply::Text(self.env.history_text()),
            "prev" => Reply::Text(self.previous(words.get(1) == Some(&"ans"))),
            "help" => Reply::Text(Environment::commands_text()),
            "variables" => Reply::Text(self.env.variables_text()),
            "constants" => Reply::Text(self.env.constants_text()),
            "var" => self.assign(&words),
            _ => self.calculate(line),
        }
    }

    /// Last evaluated line, with its result when `with_answer` is set.
    pub fn previous(&self, with_answer: bool) -> String {
        match self.env.last_history() {
            Some((line, result)) if with_answer => format!("{} = {}", line, result),
            Some((line, _)) => line.to_string(),
            None => String::new(),
        }
    }

    fn assign(&mut self, words: &[&str]) -> Reply {
        match words {
            [_, name, "=", value] => match self.env.set_variable(name, value) {
                Ok(()) => Reply::Text(format!("{} set to {}", name, value)),
                Err(e) => Reply::Error(e.to_string()),
            },
            _ if words.len() > 4 => {
                Reply::Error("Invalid var command\nToo many arguments".to_string())
            }
            _ => Reply::Error(
                "Invalid var command\nUsage: var 'variable name' = 'value'".to_string(),
            ),
        }
    }

    fn calculate(&mut self, line: &str) -> Reply {
        let mut trace = EvaluationTrace::new(self.settings.show_steps);
        match self.evaluate_traced(line, &mut trace) {
            Ok(result) => Reply::Value {
                result,
                steps: trace.steps,
            },
            Err(e) => Reply::Error(e.to_string()),
        }
    }

    /// Runs the full pipeline on `line`. On success the result becomes `ans` and the
    /// line is recorded in history; on failure the environment is untouched.
    pub fn evaluate(&mut self, line: &str) -> Result<f64, CalcError> {
        self.evaluate_traced(line, &mut EvaluationTrace::new(false))
    }

    fn evaluate_traced(
        &mut self,
        line: &str,
        trace: &mut EvaluationTrace,
    ) -> Result<f64, CalcError> {
        debug!("evaluating {:?}", line);
        let result = verify_with(line, &self.env, self.settings.substitution)
            .map_err(CalcError::from)
            .and_then(|text| Ok(parse(&text)?))
            .and_then(|node| Ok(evaluate_traced(&node, trace)?));

        match result {
            Ok(value) => {
                self.env.add_history(line, &format_number(value));
                self.env.set_answer(value);
                Ok(value)
            }
            Err(e) => {
                warn!("rejected {:?}: {}", line, e);
                Err(e)
            }
        }
    }
}
