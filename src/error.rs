use thiserror::Error;

/// Failures of the preprocessing pass, before any parsing happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreprocessError {
    #[error("missing parenthesis")]
    UnbalancedParens,
    #[error("invalid identifier '{0}'")]
    UnknownIdentifier(String),
}

/// Lexing failures. Positions are byte offsets into the substituted text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TokenizeError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("invalid number '{text}' at position {pos}")]
    InvalidNumber { text: String, pos: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error("empty expression")]
    Empty,
    #[error("unexpected end of input at position {pos}")]
    UnexpectedEnd { pos: usize },
    #[error("unexpected '{found}' at position {pos}")]
    UnexpectedToken { found: String, pos: usize },
    #[error("unmatched parenthesis at position {pos}")]
    UnmatchedParen { pos: usize },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Rejections of `var <name> = <value>`. The messages are shown to the user verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VarError {
    #[error("Variable must begin with a letter")]
    InvalidIdentifier,
    #[error("Value must be an integer or decimal")]
    InvalidValue,
    #[error("Cannot overwrite command")]
    CommandCollision,
    #[error("Cannot overwrite constant")]
    ConstantCollision,
}

/// Any failure of a single evaluation call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error(transparent)]
    Preprocess(#[from] PreprocessError),
    #[error("invalid input: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}
