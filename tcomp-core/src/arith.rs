//! Arithmetic evaluator for expression assignments.
//!
//! Input is plain text with every placeholder already replaced by a
//! decimal literal. Supported: `+ - * / %`, right-associative `^`,
//! unary signs and parentheses.

use crate::ast::PLACEHOLDER;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ArithToken {
    Number(f64),
    Op(char),
    LParen,
    RParen,
}

/// Evaluate `text` to a finite floating-point value.
pub fn evaluate(text: &str) -> Result<f64, CoreError> {
    let tokens = tokenize(text)?;
    let mut position = 0;
    let value = parse_sum(&tokens, &mut position)?;
    if position != tokens.len() {
        return Err(CoreError::Evaluation(format!(
            "unexpected trailing input in '{text}'"
        )));
    }
    if !value.is_finite() {
        return Err(CoreError::Evaluation(format!(
            "'{text}' does not evaluate to a finite number"
        )));
    }
    Ok(value)
}

fn tokenize(text: &str) -> Result<Vec<ArithToken>, CoreError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut index = 0;
    while index < chars.len() {
        let ch = chars[index];
        match ch {
            c if c.is_whitespace() => index += 1,
            '0'..='9' | '.' => {
                let start = index;
                while index < chars.len()
                    && (chars[index].is_ascii_digit() || chars[index] == '.')
                {
                    index += 1;
                }
                let literal: String = chars[start..index].iter().collect();
                let value = literal.parse::<f64>().map_err(|_| {
                    CoreError::Evaluation(format!("malformed number '{literal}'"))
                })?;
                tokens.push(ArithToken::Number(value));
            }
            '+' | '-' | '*' | '/' | '%' | '^' => {
                tokens.push(ArithToken::Op(ch));
                index += 1;
            }
            '(' => {
                tokens.push(ArithToken::LParen);
                index += 1;
            }
            ')' => {
                tokens.push(ArithToken::RParen);
                index += 1;
            }
            '{' if text[char_offset(&chars, index)..].starts_with(PLACEHOLDER) => {
                return Err(CoreError::Evaluation(
                    "expression still contains an unsubstituted placeholder".to_string(),
                ));
            }
            other => {
                return Err(CoreError::Evaluation(format!(
                    "unexpected character '{other}'"
                )));
            }
        }
    }
    Ok(tokens)
}

fn char_offset(chars: &[char], index: usize) -> usize {
    chars[..index].iter().map(|c| c.len_utf8()).sum()
}

fn parse_sum(tokens: &[ArithToken], position: &mut usize) -> Result<f64, CoreError> {
    let mut value = parse_product(tokens, position)?;
    while let Some(ArithToken::Op(op @ ('+' | '-'))) = tokens.get(*position).copied() {
        *position += 1;
        let rhs = parse_product(tokens, position)?;
        value = if op == '+' { value + rhs } else { value - rhs };
    }
    Ok(value)
}

fn parse_product(tokens: &[ArithToken], position: &mut usize) -> Result<f64, CoreError> {
    let mut value = parse_unary(tokens, position)?;
    while let Some(ArithToken::Op(op @ ('*' | '/' | '%'))) = tokens.get(*position).copied() {
        *position += 1;
        let rhs = parse_unary(tokens, position)?;
        value = match op {
            '*' => value * rhs,
            '/' => {
                if rhs == 0.0 {
                    return Err(CoreError::Evaluation(
                        "division by zero is not allowed".to_string(),
                    ));
                }
                value / rhs
            }
            _ => {
                if rhs == 0.0 {
                    return Err(CoreError::Evaluation(
                        "modulo by zero is not allowed".to_string(),
                    ));
                }
                value % rhs
            }
        };
    }
    Ok(value)
}

fn parse_unary(tokens: &[ArithToken], position: &mut usize) -> Result<f64, CoreError> {
    match tokens.get(*position).copied() {
        Some(ArithToken::Op('-')) => {
            *position += 1;
            Ok(-parse_unary(tokens, position)?)
        }
        Some(ArithToken::Op('+')) => {
            *position += 1;
            parse_unary(tokens, position)
        }
        _ => parse_power(tokens, position),
    }
}

fn parse_power(tokens: &[ArithToken], position: &mut usize) -> Result<f64, CoreError> {
    let base = parse_primary(tokens, position)?;
    if let Some(ArithToken::Op('^')) = tokens.get(*position).copied() {
        *position += 1;
        let exponent = parse_unary(tokens, position)?;
        return Ok(base.powf(exponent));
    }
    Ok(base)
}

fn parse_primary(tokens: &[ArithToken], position: &mut usize) -> Result<f64, CoreError> {
    let token = tokens
        .get(*position)
        .copied()
        .ok_or_else(|| CoreError::Evaluation("unexpected end of expression".to_string()))?;
    *position += 1;
    match token {
        ArithToken::Number(value) => Ok(value),
        ArithToken::LParen => {
            let value = parse_sum(tokens, position)?;
            match tokens.get(*position) {
                Some(ArithToken::RParen) => {
                    *position += 1;
                    Ok(value)
                }
                _ => Err(CoreError::Evaluation("expected ')'".to_string())),
            }
        }
        ArithToken::RParen => Err(CoreError::Evaluation("unexpected ')'".to_string())),
        ArithToken::Op(op) => Err(CoreError::Evaluation(format!("unexpected operator '{op}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> f64 {
        evaluate(text).expect("evaluates")
    }

    #[test]
    fn respects_precedence() {
        assert_eq!(eval("1+2*3"), 7.0);
        assert_eq!(eval("(1+2)*3"), 9.0);
        assert_eq!(eval("10-4-3"), 3.0);
        assert_eq!(eval("7%4"), 3.0);
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(eval("2^3^2"), 512.0);
        assert_eq!(eval("-2^2"), -4.0);
        assert_eq!(eval("2^-1"), 0.5);
    }

    #[test]
    fn handles_substituted_negatives() {
        assert_eq!(eval("5--3"), 8.0);
        assert_eq!(eval("-1*-1"), 1.0);
        assert_eq!(eval(" 7 / 2 "), 3.5);
    }

    #[test]
    fn rejects_division_by_zero() {
        let err = evaluate("1/0").unwrap_err();
        assert!(matches!(err, CoreError::Evaluation(_)));
        assert!(evaluate("1%0").is_err());
    }

    #[test]
    fn rejects_non_finite_results() {
        let err = evaluate("(-8)^(1/2)").unwrap_err();
        assert!(err.to_string().contains("finite"));
        assert!(evaluate("10^400").is_err());
        assert!(evaluate("10^400-10^400").is_err());
    }

    #[test]
    fn rejects_leftover_placeholders() {
        let err = evaluate("{}+1").unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(evaluate("").is_err());
        assert!(evaluate("(1+2").is_err());
        assert!(evaluate("1 2").is_err());
        assert!(evaluate("1+a").is_err());
        assert!(evaluate("1..2").is_err());
    }
}
