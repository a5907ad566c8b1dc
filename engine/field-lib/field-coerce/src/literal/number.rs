use anyhow::Result;

use super::cursor::{is_ident_continue, Cursor};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum Number {
    /// Unsigned magnitude; the sign is applied by the caller.
    Int(u64),
    Float(f64),
}

impl Number {
    /// Applies a leading sign, rejecting magnitudes that do not fit `i64`.
    pub fn signed(self, negative: bool) -> Result<field_types::FieldValue> {
        use field_types::FieldValue;
        match self {
            Number::Int(magnitude) if negative => {
                if magnitude == i64::MIN.unsigned_abs() {
                    Ok(FieldValue::Int(i64::MIN))
                } else {
                    i64::try_from(magnitude)
                        .map(|v| FieldValue::Int(-v))
                        .map_err(|_| anyhow::anyhow!("Integer literal out of range: -{}", magnitude))
                }
            }
            Number::Int(magnitude) => i64::try_from(magnitude)
                .map(FieldValue::Int)
                .map_err(|_| anyhow::anyhow!("Integer literal out of range: {}", magnitude)),
            Number::Float(f) if negative => Ok(FieldValue::Float(-f)),
            Number::Float(f) => Ok(FieldValue::Float(f)),
        }
    }
}

pub(super) fn starts_number(cursor: &Cursor) -> bool {
    match cursor.peek() {
        Some(c) if c.is_ascii_digit() => true,
        Some('.') => cursor.peek_at(1).is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Reads digits in `radix`, allowing single `_` separators between digits.
fn digits(cursor: &mut Cursor, radix: u32, allow_leading_underscore: bool) -> Result<String> {
    let start = cursor.pos();
    let mut out = String::new();
    let mut last_was_digit = allow_leading_underscore;
    while let Some(c) = cursor.peek() {
        if c.is_digit(radix) {
            out.push(c);
            last_was_digit = true;
            cursor.bump();
        } else if c == '_' {
            let next_is_digit = cursor.peek_at(1).is_some_and(|n| n.is_digit(radix));
            if !last_was_digit || !next_is_digit {
                anyhow::bail!("Invalid digit separator at {}", cursor.pos());
            }
            last_was_digit = false;
            cursor.bump();
        } else {
            break;
        }
    }
    if out.is_empty() {
        anyhow::bail!("Expected digits at {}", start);
    }
    Ok(out)
}

fn reject_trailing_ident(cursor: &Cursor) -> Result<()> {
    match cursor.peek() {
        Some('j') | Some('J') => anyhow::bail!("Complex literals are not supported"),
        Some(c) if is_ident_continue(c) => {
            anyhow::bail!("Invalid numeric literal at {}", cursor.pos())
        }
        _ => Ok(()),
    }
}

pub(super) fn scan_number(cursor: &mut Cursor) -> Result<Number> {
    if cursor.peek() == Some('0') {
        let radix = match cursor.peek_at(1) {
            Some('x') | Some('X') => Some(16),
            Some('o') | Some('O') => Some(8),
            Some('b') | Some('B') => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            cursor.bump();
            cursor.bump();
            let raw = digits(cursor, radix, true)?;
            reject_trailing_ident(cursor)?;
            return u64::from_str_radix(&raw, radix)
                .map(Number::Int)
                .map_err(|_| anyhow::anyhow!("Integer literal out of range: {}", raw));
        }
    }

    let mut text = String::new();
    let mut is_float = false;

    if cursor.peek() != Some('.') {
        text.push_str(&digits(cursor, 10, false)?);
    }
    if cursor.peek() == Some('.') {
        is_float = true;
        cursor.bump();
        text.push('.');
        if cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
            text.push_str(&digits(cursor, 10, false)?);
        } else {
            text.push('0');
        }
    }
    if matches!(cursor.peek(), Some('e') | Some('E')) {
        let sign_offset = match cursor.peek_at(1) {
            Some('+') | Some('-') => 2,
            _ => 1,
        };
        if cursor.peek_at(sign_offset).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            text.push('e');
            cursor.bump();
            if sign_offset == 2 {
                text.push(cursor.bump().unwrap_or('+'));
            }
            text.push_str(&digits(cursor, 10, false)?);
        }
    }
    reject_trailing_ident(cursor)?;

    if is_float {
        let text = if text.starts_with('.') {
            format!("0{}", text)
        } else {
            text
        };
        return text
            .parse::<f64>()
            .map(Number::Float)
            .map_err(|e| anyhow::anyhow!("Invalid float literal {}: {}", text, e));
    }

    // `007` is not a valid decimal literal, `000` is.
    if text.len() > 1 && text.starts_with('0') && text.chars().any(|c| c != '0') {
        anyhow::bail!("Leading zeros in decimal integer literal: {}", text);
    }
    text.parse::<u64>()
        .map(Number::Int)
        .map_err(|_| anyhow::anyhow!("Integer literal out of range: {}", text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Result<Number> {
        let mut cursor = Cursor::new(input);
        let n = scan_number(&mut cursor)?;
        assert!(cursor.at_end(), "trailing input in {:?}", input);
        Ok(n)
    }

    #[test]
    fn test_integers() {
        assert_eq!(scan("42").unwrap(), Number::Int(42));
        assert_eq!(scan("1_000_000").unwrap(), Number::Int(1_000_000));
        assert_eq!(scan("0xff").unwrap(), Number::Int(255));
        assert_eq!(scan("0o17").unwrap(), Number::Int(15));
        assert_eq!(scan("0b_101").unwrap(), Number::Int(5));
        assert_eq!(scan("000").unwrap(), Number::Int(0));
    }

    #[test]
    fn test_floats() {
        assert_eq!(scan("3.25").unwrap(), Number::Float(3.25));
        assert_eq!(scan("1.").unwrap(), Number::Float(1.0));
        assert_eq!(scan(".5").unwrap(), Number::Float(0.5));
        assert_eq!(scan("1e3").unwrap(), Number::Float(1000.0));
        assert_eq!(scan("1.e2").unwrap(), Number::Float(100.0));
        assert_eq!(scan("2.5E-1").unwrap(), Number::Float(0.25));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(scan("007").is_err());
        assert!(scan("1__0").is_err());
        assert!(scan("1_").is_err());
        assert!(scan("12abc").is_err());
        assert!(scan("3j").is_err());
        assert!(scan("0x").is_err());
        assert!(scan("99999999999999999999").is_err());
    }

    #[test]
    fn test_sign_bounds() {
        use field_types::FieldValue;
        assert_eq!(
            Number::Int(9_223_372_036_854_775_808).signed(true).unwrap(),
            FieldValue::Int(i64::MIN)
        );
        assert!(Number::Int(9_223_372_036_854_775_808).signed(false).is_err());
        assert_eq!(Number::Float(1.5).signed(true).unwrap(), FieldValue::Float(-1.5));
    }
}
