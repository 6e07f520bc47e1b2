use crate::ast::{Node, Operator};
use crate::error::{ParseError, TokenizeError};
use log::trace;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Op(Operator),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{}", n),
            Token::Op(op) => write!(f, "{}", op),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub pos: usize,
}

pub fn tokenize(input: &str) -> Result<Vec<Lexeme>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            _ if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                tokens.push(Lexeme { token: Token::LParen, pos });
                chars.next();
            }
            ')' => {
                tokens.push(Lexeme { token: Token::RParen, pos });
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut num_str = String::new();
                while let Some(&(_, ch)) = chars.peek() {
                    if ch.is_ascii_digit() || ch == '.' {
                        num_str.push(ch);
                        chars.next();
                    } else {
                        break;
                    }
                }

                let value = num_str.parse::<f64>().map_err(|_| TokenizeError::InvalidNumber {
                    text: num_str.clone(),
                    pos,
                })?;
                tokens.push(Lexeme { token: Token::Number(value), pos });
            }
            _ => match Operator::from_char(c) {
                Some(op) => {
                    tokens.push(Lexeme { token: Token::Op(op), pos });
                    chars.next();
                }
                None => return Err(TokenizeError::UnexpectedChar { ch: c, pos }),
            },
        }
    }
    Ok(tokens)
}

/// Tokenize and parse `text` into an expression tree.
pub fn parse(text: &str) -> Result<Node, ParseError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let node = Parser::new(tokens, text.len()).parse()?;
    trace!("parsed {:?} as {}", text, node);
    Ok(node)
}

/// Recursive-descent parser, one method per precedence level:
///
/// ```text
/// additive  := multiplic (('+'|'-') multiplic)*
/// multiplic := power (('*'|'/'|'%') power)*
/// power     := atom ('^' atom)*
/// atom      := NUMBER | '(' additive ')' | '-' NUMBER
/// ```
pub struct Parser {
    tokens: Vec<Lexeme>,
    current: usize,
    end: usize,
}

impl Parser {
    /// `end` is the input length, reported as the position of a premature end.
    pub fn new(tokens: Vec<Lexeme>, end: usize) -> Self {
        Parser { tokens, current: 0, end }
    }

    pub fn parse(&mut self) -> Result<Node, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::Empty);
        }

        let node = self.additive()?;
        match self.peek() {
            None => Ok(node),
            Some(Lexeme { token: Token::RParen, pos }) => Err(ParseError::UnmatchedParen { pos }),
            Some(Lexeme { token, pos }) => Err(ParseError::UnexpectedToken {
                found: token.to_string(),
                pos,
            }),
        }
    }

    fn peek(&self) -> Option<Lexeme> {
        self.tokens.get(self.current).copied()
    }

    fn advance(&mut self) -> Option<Lexeme> {
        let lexeme = self.peek();
        if lexeme.is_some() {
            self.current += 1;
        }
        lexeme
    }

    /// Consumes the next token if it is one of `ops`.
    fn match_op(&mut self, ops: &[Operator]) -> Option<Operator> {
        match self.peek() {
            Some(Lexeme { token: Token::Op(op), .. }) if ops.contains(&op) => {
                self.current += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn additive(&mut self) -> Result<Node, ParseError> {
        let mut left = self.multiplicative()?;
        while let Some(op) = self.match_op(&[Operator::Add, Operator::Sub]) {
            let right = self.multiplicative()?;
            left = Node::binary(op, left, right);
        }
        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Node, ParseError> {
        let mut left = self.power()?;
        while let Some(op) = self.match_op(&[Operator::Mul, Operator::Div, Operator::Mod]) {
            let right = self.power()?;
            left = Node::binary(op, left, right);
        }
        Ok(left)
    }

    fn power(&mut self) -> Result<Node, ParseError> {
        let mut left = self.atom()?;
        while let Some(op) = self.match_op(&[Operator::Pow]) {
            let right = self.atom()?;
            left = Node::binary(op, left, right);
        }
        Ok(left)
    }

    fn atom(&mut self) -> Result<Node, ParseError> {
        let end = self.end;
        match self.advance() {
            None => Err(ParseError::UnexpectedEnd { pos: end }),
            Some(Lexeme { token: Token::Number(n), .. }) => Ok(Node::Literal(n)),
            Some(Lexeme { token: Token::LParen, pos }) => {
                let inner = self.additive()?;
                match self.advance() {
                    Some(Lexeme { token: Token::RParen, .. }) => Ok(inner),
                    Some(Lexeme { token, pos }) => Err(ParseError::UnexpectedToken {
                        found: token.to_string(),
                        pos,
                    }),
                    None => Err(ParseError::UnmatchedParen { pos }),
                }
            }
            // Unary minus only applies to a bare number.
            Some(Lexeme { token: Token::Op(Operator::Sub), .. }) => match self.advance() {
                Some(Lexeme { token: Token::Number(n), .. }) => {
                    Ok(Node::negate(Node::Literal(n)))
                }
                Some(Lexeme { token, pos }) => Err(ParseError::UnexpectedToken {
                    found: token.to_string(),
                    pos,
                }),
                None => Err(ParseError::UnexpectedEnd { pos: end }),
            },
            Some(Lexeme { token: Token::RParen, pos }) => Err(ParseError::UnmatchedParen { pos }),
            Some(Lexeme { token, pos }) => Err(ParseError::UnexpectedToken {
                found: token.to_string(),
                pos,
            }),
        }
    }
}
