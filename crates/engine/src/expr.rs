//! Arithmetic amount input: `1200 - 350*2`, `(40+60)/4`, `-₹1,000`.
//!
//! Evaluation runs on fixed-point integers (six decimal places) and the
//! result is rounded to paise, so no floating-point error reaches the ledger.

use std::{iter::Peekable, str::Chars};

use crate::{EngineError, Money, ResultEngine};

/// Fixed-point scale used while evaluating.
const SCALE: i128 = 1_000_000;
const MAX_FRACTION_DIGITS: usize = 6;
/// `SCALE` expressed in paise.
const SCALE_PER_PAISA: i128 = SCALE / 100;
/// Deepest nesting of parentheses and unary signs.
const MAX_DEPTH: usize = 64;

/// Evaluate `input` into an amount.
///
/// `₹`, `,` and whitespace are ignored. Supports `+ - * /`, parentheses and
/// unary signs. Results beyond [`Money::MAX`] are rejected.
pub fn evaluate(input: &str) -> ResultEngine<Money> {
    let cleaned: String = input
        .chars()
        .filter(|c| !matches!(c, '₹' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err(invalid("empty expression"));
    }

    let mut parser = Parser {
        chars: cleaned.chars().peekable(),
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(ch) = parser.chars.next() {
        return Err(invalid(&format!("unexpected '{ch}'")));
    }

    let paise = round_div(value, SCALE_PER_PAISA).ok_or_else(overflow)?;
    i64::try_from(paise)
        .ok()
        .and_then(Money::bounded)
        .ok_or_else(overflow)
}

/// `true` if `input` evaluates to an amount.
pub fn is_valid(input: &str) -> bool {
    evaluate(input).is_ok()
}

fn invalid(reason: &str) -> EngineError {
    EngineError::InvalidExpression(reason.to_string())
}

fn overflow() -> EngineError {
    invalid("result too large")
}

/// Integer division rounding half away from zero; `None` on overflow.
fn round_div(value: i128, divisor: i128) -> Option<i128> {
    let quotient = value.checked_div(divisor)?;
    let remainder = value.checked_rem(divisor)?;
    if remainder.unsigned_abs() * 2 >= divisor.unsigned_abs() {
        if (value < 0) != (divisor < 0) {
            quotient.checked_sub(1)
        } else {
            quotient.checked_add(1)
        }
    } else {
        Some(quotient)
    }
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    depth: usize,
}

impl Parser<'_> {
    fn expr(&mut self) -> ResultEngine<i128> {
        let mut value = self.term()?;
        while let Some(&op) = self.chars.peek() {
            if op != '+' && op != '-' {
                break;
            }
            self.chars.next();
            let rhs = self.term()?;
            value = if op == '+' {
                value.checked_add(rhs)
            } else {
                value.checked_sub(rhs)
            }
            .ok_or_else(overflow)?;
        }
        Ok(value)
    }

    fn term(&mut self) -> ResultEngine<i128> {
        let mut value = self.factor()?;
        while let Some(&op) = self.chars.peek() {
            if op != '*' && op != '/' {
                break;
            }
            self.chars.next();
            let rhs = self.factor()?;
            value = if op == '*' {
                value
                    .checked_mul(rhs)
                    .and_then(|product| round_div(product, SCALE))
            } else {
                if rhs == 0 {
                    return Err(invalid("division by zero"));
                }
                value
                    .checked_mul(SCALE)
                    .and_then(|scaled| round_div(scaled, rhs))
            }
            .ok_or_else(overflow)?;
        }
        Ok(value)
    }

    fn factor(&mut self) -> ResultEngine<i128> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(invalid("expression too deeply nested"));
        }
        let value = self.primary();
        self.depth -= 1;
        value
    }

    fn primary(&mut self) -> ResultEngine<i128> {
        match self.chars.peek().copied() {
            Some('-') => {
                self.chars.next();
                self.factor()?.checked_neg().ok_or_else(overflow)
            }
            Some('+') => {
                self.chars.next();
                self.factor()
            }
            Some('(') => {
                self.chars.next();
                let value = self.expr()?;
                match self.chars.next() {
                    Some(')') => Ok(value),
                    _ => Err(invalid("missing ')'")),
                }
            }
            Some(c) if c.is_ascii_digit() || c == '.' => self.number(),
            Some(c) => Err(invalid(&format!("unexpected '{c}'"))),
            None => Err(invalid("unexpected end of expression")),
        }
    }

    fn number(&mut self) -> ResultEngine<i128> {
        let mut whole: i128 = 0;
        let mut fraction: i128 = 0;
        let mut fraction_digits = 0usize;
        let mut seen_digit = false;
        let mut in_fraction = false;

        while let Some(&c) = self.chars.peek() {
            if c == '.' {
                if in_fraction {
                    return Err(invalid("malformed number"));
                }
                in_fraction = true;
            } else if let Some(digit) = c.to_digit(10) {
                seen_digit = true;
                if in_fraction {
                    fraction_digits += 1;
                    if fraction_digits > MAX_FRACTION_DIGITS {
                        return Err(invalid("too many decimals"));
                    }
                    fraction = fraction * 10 + i128::from(digit);
                } else {
                    whole = whole
                        .checked_mul(10)
                        .and_then(|w| w.checked_add(i128::from(digit)))
                        .ok_or_else(overflow)?;
                }
            } else {
                break;
            }
            self.chars.next();
        }

        if !seen_digit {
            return Err(invalid("malformed number"));
        }
        let fraction_scale = 10i128.pow((MAX_FRACTION_DIGITS - fraction_digits) as u32);
        whole
            .checked_mul(SCALE)
            .and_then(|w| w.checked_add(fraction * fraction_scale))
            .ok_or_else(overflow)
    }
}
