use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '%' => Some(Operator::Mod),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Mod => '%',
            Operator::Pow => '^',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Parsed expression tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Literal(f64),
    /// Unary minus. The parser only ever wraps a `Literal` in this.
    Negate(Box<Node>),
    Binary {
        op: Operator,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn binary(op: Operator, left: Node, right: Node) -> Self {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn negate(operand: Node) -> Self {
        Node::Negate(Box::new(operand))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Literal(v) => write!(f, "{}", v),
            Node::Negate(operand) => write!(f, "-{}", operand),
            Node::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
        }
    }
}
