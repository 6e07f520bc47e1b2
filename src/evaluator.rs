use crate::ast::{Node, Operator};
use crate::environment::format_number;
use crate::error::EvalError;

pub struct Step {
    pub operation: String,
    pub result: f64,
}

/// Collects the intermediate operations of an evaluation when enabled.
pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, operation: impl FnOnce() -> String, result: f64) {
        if self.detailed_mode {
            self.steps.push(Step {
                operation: operation(),
                result,
            });
        }
    }
}

pub fn evaluate(node: &Node) -> Result<f64, EvalError> {
    evaluate_traced(node, &mut EvaluationTrace::new(false))
}

pub fn evaluate_traced(node: &Node, trace: &mut EvaluationTrace) -> Result<f64, EvalError> {
    match node {
        Node::Literal(v) if v.is_finite() => Ok(*v),
        Node::Literal(_) => Err(EvalError::InvalidOperation(
            "number is out of range".to_string(),
        )),
        Node::Negate(operand) => {
            let value = evaluate_traced(operand, trace)?;
            let result = -value;
            trace.add_step(|| format!("-{}", format_number(value)), result);
            Ok(result)
        }
        Node::Binary { op, left, right } => {
            let l = evaluate_traced(left, trace)?;
            let r = evaluate_traced(right, trace)?;
            let result = apply(*op, l, r)?;
            trace.add_step(
                || format!("{} {} {}", format_number(l), op, format_number(r)),
                result,
            );
            Ok(result)
        }
    }
}

fn apply(op: Operator, l: f64, r: f64) -> Result<f64, EvalError> {
    let result = match op {
        Operator::Add => l + r,
        Operator::Sub => l - r,
        Operator::Mul => l * r,
        Operator::Div => {
            if r == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            l / r
        }
        Operator::Mod => {
            if r == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            floored_rem(l, r)
        }
        Operator::Pow => l.powf(r),
    };

    if result.is_nan() {
        return Err(EvalError::InvalidOperation(format!(
            "{} {} {} is not a real number",
            format_number(l),
            op,
            format_number(r)
        )));
    }
    if result.is_infinite() {
        return Err(EvalError::InvalidOperation(format!(
            "{} {} {} is out of range",
            format_number(l),
            op,
            format_number(r)
        )));
    }
    Ok(result)
}

/// Remainder carrying the sign of the divisor, so `-7 % 3 == 2`.
fn floored_rem(l: f64, r: f64) -> f64 {
    let rem = l % r;
    if rem != 0.0 && (rem < 0.0) != (r < 0.0) {
        rem + r
    } else {
        rem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc_engine::parse;

    fn eval(text: &str) -> Result<f64, EvalError> {
        evaluate(&parse(text).unwrap())
    }

    #[test]
    fn basic_arithmetic() {
        assert_eq!(eval("2+2"), Ok(4.0));
        assert_eq!(eval("2^2"), Ok(4.0));
        assert_eq!(eval("10%2"), Ok(0.0));
        assert_eq!(eval("7/2"), Ok(3.5));
        assert_eq!(eval("((10^2/2)*5)-300"), Ok(-50.0));
    }

    #[test]
    fn power_is_left_associative() {
        assert_eq!(eval("2^3^2"), Ok(64.0));
        assert_eq!(eval("-2^2"), Ok(4.0));
        assert_eq!(eval("4^0.5"), Ok(2.0));
        assert_eq!(eval("2^-1"), Ok(0.5));
    }

    #[test]
    fn remainder_follows_divisor_sign() {
        assert_eq!(eval("-7%3"), Ok(2.0));
        assert_eq!(eval("7%-3"), Ok(-2.0));
        assert_eq!(eval("7.5%2"), Ok(1.5));
    }

    #[test]
    fn zero_divisors_are_errors() {
        assert_eq!(eval("1/0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("1%0"), Err(EvalError::DivisionByZero));
        assert_eq!(eval("0/(2-2)"), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn non_real_results_are_invalid() {
        assert!(matches!(eval("-8^0.5"), Err(EvalError::InvalidOperation(_))));
        assert!(matches!(eval("10^400"), Err(EvalError::InvalidOperation(_))));
    }

    #[test]
    fn overflowing_literals_are_invalid() {
        let huge = "9".repeat(400);
        assert!(matches!(eval(&huge), Err(EvalError::InvalidOperation(_))));
        assert!(matches!(
            eval(&format!("-{}", huge)),
            Err(EvalError::InvalidOperation(_))
        ));
        assert!(matches!(
            eval(&format!("0*{}", huge)),
            Err(EvalError::InvalidOperation(_))
        ));
    }

    #[test]
    fn trace_records_each_operation() {
        let node = parse("1+2*3").unwrap();
        let mut trace = EvaluationTrace::new(true);
        assert_eq!(evaluate_traced(&node, &mut trace), Ok(7.0));
        let ops: Vec<&str> = trace.steps.iter().map(|s| s.operation.as_str()).collect();
        assert_eq!(ops, vec!["2.0 * 3.0", "1.0 + 6.0"]);
        assert_eq!(trace.steps[1].result, 7.0);
    }

    #[test]
    fn disabled_trace_stays_empty() {
        let node = parse("1+2").unwrap();
        let mut trace = EvaluationTrace::new(false);
        evaluate_traced(&node, &mut trace).unwrap();
        assert!(trace.steps.is_empty());
    }
}
