use crate::preprocess::Substitution;
use clap::{Parser, ValueEnum};

/// Interactive arithmetic calculator with variables, constants and history.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Front end to run.
    #[arg(long, value_enum, default_value_t = Mode::default())]
    pub mode: Mode,

    /// How identifiers are replaced with their values before parsing.
    #[arg(long, value_enum, default_value_t = Substitution::Textual)]
    pub substitution: Substitution,

    /// Show each intermediate operation after a successful evaluation.
    #[arg(long)]
    pub steps: bool,

    /// Evaluate these lines in order, print the results and exit.
    #[arg(short, long = "eval", value_name = "EXPR")]
    pub eval: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Tui,
    Line,
    Plain,
}

impl Default for Mode {
    fn default() -> Self {
        if cfg!(feature = "tui") {
            Mode::Tui
        } else if cfg!(feature = "line") {
            Mode::Line
        } else {
            Mode::Plain
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Mode::Tui => "tui",
            Mode::Line => "line",
            Mode::Plain => "plain",
        };
        f.write_str(name)
    }
}

/// Evaluation settings shared by every front end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub substitution: Substitution,
    pub show_steps: bool,
}

impl From<&Cli> for Settings {
    fn from(cli: &Cli) -> Self {
        Settings {
            substitution: cli.substitution,
            show_steps: cli.steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["shellcalc"]);
        assert_eq!(cli.mode, Mode::default());
        assert!(cli.eval.is_empty());
        assert_eq!(Settings::from(&cli), Settings::default());
    }

    #[test]
    fn flags_map_to_settings() {
        let cli = Cli::parse_from([
            "shellcalc",
            "--mode",
            "plain",
            "--substitution",
            "token",
            "--steps",
            "-e",
            "1+1",
            "--eval",
            "2*2",
        ]);
        assert_eq!(cli.mode, Mode::Plain);
        assert_eq!(cli.eval, vec!["1+1".to_string(), "2*2".to_string()]);
        let settings = Settings::from(&cli);
        assert_eq!(settings.substitution, Substitution::Token);
        assert!(settings.show_steps);
    }
}
