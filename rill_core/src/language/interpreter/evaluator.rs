use log::trace;

use crate::language::ast::Expr;
use crate::language::error::Result;
use crate::language::token::{Token, TokenType};
use crate::runtime_error;

use super::value::Value;
use super::Interpreter;

impl Interpreter {
    pub(super) fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        trace!("Evaluating expression: {expr:?}");

        match expr {
            Expr::Literal(literal) => Ok(Value::from(literal)),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Unary { operator, operand } => self.evaluate_unary(operator, operand),
            Expr::Binary {
                operator,
                left,
                right,
            } => self.evaluate_binary(operator, left, right),
            Expr::Logical {
                operator,
                left,
                right,
            } => self.evaluate_logical(operator, left, right),
            Expr::Variable { name } => self.environment.get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.assign(name, value.clone())?;
                Ok(value)
            }
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, operand: &Expr) -> Result<Value> {
        let value = self.evaluate(operand)?;

        match operator.token_type {
            TokenType::Minus => match value {
                Value::Number(number) => Ok(Value::Number(-number)),
                _ => runtime_error!(operator, "Operand must be a number."),
            },
            TokenType::Bang => Ok(Value::Boolean(!value.is_truthy())),
            _ => runtime_error!(
                operator,
                format!("Unsupported unary operator: '{}'", operator.lexeme)
            ),
        }
    }

    fn evaluate_binary(&mut self, operator: &Token, left: &Expr, right: &Expr) -> Result<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        // Every binary operator refuses nil operands, before any
        // operator-specific typing applies.
        if left == Value::Nil || right == Value::Nil {
            return runtime_error!(operator, "Operands must be non-null.");
        }

        match operator.token_type {
            TokenType::Plus => match (left, right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),
                _ => runtime_error!(operator, "Operands must be two numbers or two strings."),
            },
            TokenType::Minus => Self::number_op(operator, left, right, |a, b| a - b),
            TokenType::Slash => Self::number_op(operator, left, right, |a, b| a / b),
            TokenType::Star => Self::number_op(operator, left, right, |a, b| a * b),
            TokenType::Greater => Self::comparison_op(operator, left, right, |a, b| a > b),
            TokenType::GreaterEqual => Self::comparison_op(operator, left, right, |a, b| a >= b),
            TokenType::Less => Self::comparison_op(operator, left, right, |a, b| a < b),
            TokenType::LessEqual => Self::comparison_op(operator, left, right, |a, b| a <= b),
            TokenType::EqualEqual => Ok(Value::Boolean(left == right)),
            TokenType::BangEqual => Ok(Value::Boolean(left != right)),
            _ => runtime_error!(
                operator,
                format!("Unsupported binary operator: '{}'", operator.lexeme)
            ),
        }
    }

    /// `and`/`or` return whichever operand decided the expression, not a
    /// coerced boolean; the right side only runs when the left did not
    /// already decide.
    fn evaluate_logical(&mut self, operator: &Token, left: &Expr, right: &Expr) -> Result<Value> {
        let left = self.evaluate(left)?;

        match operator.token_type {
            TokenType::Or if left.is_truthy() => Ok(left),
            TokenType::And if !left.is_truthy() => Ok(left),
            _ => self.evaluate(right),
        }
    }

    fn number_op(
        operator: &Token,
        left: Value,
        right: Value,
        op: impl Fn(f64, f64) -> f64,
    ) -> Result<Value> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(op(a, b))),
            _ => runtime_error!(operator, "Operands must be numbers."),
        }
    }

    fn comparison_op(
        operator: &Token,
        left: Value,
        right: Value,
        op: impl Fn(f64, f64) -> bool,
    ) -> Result<Value> {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Boolean(op(a, b))),
            _ => runtime_error!(operator, "Operands must be numbers."),
        }
    }
}
