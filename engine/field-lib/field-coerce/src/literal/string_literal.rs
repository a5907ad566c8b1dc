use anyhow::Result;

use super::cursor::Cursor;

/// Length of the string prefix (`r`, `u`, `b`, `rb`, ...) when the cursor sits
/// on the start of a string literal, `None` otherwise.
pub(super) fn string_start(cursor: &Cursor) -> Option<usize> {
    let mut len = 0;
    while len < 2 && cursor.peek_at(len).is_some_and(|c| "rRuUbBfF".contains(c)) {
        len += 1;
    }
    match cursor.peek_at(len) {
        Some('\'') | Some('"') => Some(len),
        _ => None,
    }
}

struct Prefix {
    raw: bool,
}

fn read_prefix(cursor: &mut Cursor, len: usize) -> Result<Prefix> {
    let mut prefix = String::new();
    for _ in 0..len {
        if let Some(c) = cursor.bump() {
            prefix.push(c.to_ascii_lowercase());
        }
    }
    match prefix.as_str() {
        "" | "u" => Ok(Prefix { raw: false }),
        "r" => Ok(Prefix { raw: true }),
        "b" | "br" | "rb" => anyhow::bail!("Byte strings are not supported"),
        "f" | "fr" | "rf" => anyhow::bail!("Formatted strings are not literals"),
        other => anyhow::bail!("Invalid string prefix: {}", other),
    }
}

fn hex_escape(cursor: &mut Cursor, width: usize) -> Result<char> {
    let mut code = 0u32;
    for _ in 0..width {
        let digit = cursor
            .bump()
            .and_then(|c| c.to_digit(16))
            .ok_or_else(|| anyhow::anyhow!("Truncated \\x/\\u escape at {}", cursor.pos()))?;
        code = code * 16 + digit;
    }
    char::from_u32(code).ok_or_else(|| anyhow::anyhow!("Invalid code point: {:#x}", code))
}

fn octal_escape(cursor: &mut Cursor, first: char) -> Result<char> {
    let mut code = first.to_digit(8).unwrap_or(0);
    for _ in 0..2 {
        match cursor.peek().and_then(|c| c.to_digit(8)) {
            Some(d) => {
                code = code * 8 + d;
                cursor.bump();
            }
            None => break,
        }
    }
    char::from_u32(code).ok_or_else(|| anyhow::anyhow!("Invalid code point: {:#o}", code))
}

fn escape(cursor: &mut Cursor, out: &mut String) -> Result<()> {
    let Some(c) = cursor.bump() else {
        anyhow::bail!("Unterminated string literal");
    };
    match c {
        '\n' => {}
        '\r' => {
            cursor.eat('\n');
        }
        '\\' | '\'' | '"' => out.push(c),
        'a' => out.push('\x07'),
        'b' => out.push('\x08'),
        'f' => out.push('\x0c'),
        'n' => out.push('\n'),
        'r' => out.push('\r'),
        't' => out.push('\t'),
        'v' => out.push('\x0b'),
        'x' => out.push(hex_escape(cursor, 2)?),
        'u' => out.push(hex_escape(cursor, 4)?),
        'U' => out.push(hex_escape(cursor, 8)?),
        '0'..='7' => out.push(octal_escape(cursor, c)?),
        'N' => anyhow::bail!("Named unicode escapes are not supported"),
        other => {
            // Unknown escapes are kept verbatim.
            out.push('\\');
            out.push(other);
        }
    }
    Ok(())
}

/// Scans one string literal (prefix, quotes and body) and returns its value.
pub(super) fn scan_string(cursor: &mut Cursor) -> Result<String> {
    let start = cursor.pos();
    let prefix_len =
        string_start(cursor).ok_or_else(|| anyhow::anyhow!("Expected string at {}", start))?;
    let Prefix { raw } = read_prefix(cursor, prefix_len)?;

    let quote = cursor
        .bump()
        .ok_or_else(|| anyhow::anyhow!("Expected quote at {}", cursor.pos()))?;
    let triple = cursor.peek() == Some(quote) && cursor.peek_at(1) == Some(quote);
    if triple {
        cursor.bump();
        cursor.bump();
    }

    let mut out = String::new();
    loop {
        let Some(c) = cursor.bump() else {
            anyhow::bail!("Unterminated string literal starting at {}", start);
        };
        match c {
            c if c == quote => {
                if !triple {
                    return Ok(out);
                }
                if cursor.peek() == Some(quote) && cursor.peek_at(1) == Some(quote) {
                    cursor.bump();
                    cursor.bump();
                    return Ok(out);
                }
                out.push(c);
            }
            '\n' | '\r' if !triple => {
                anyhow::bail!("Unterminated string literal starting at {}", start);
            }
            '\\' if raw => {
                // A raw backslash still protects the following character.
                let Some(next) = cursor.bump() else {
                    anyhow::bail!("Unterminated string literal starting at {}", start);
                };
                out.push('\\');
                out.push(next);
            }
            '\\' => escape(cursor, &mut out)?,
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Result<String> {
        let mut cursor = Cursor::new(input);
        let s = scan_string(&mut cursor)?;
        assert!(cursor.at_end(), "trailing input in {:?}", input);
        Ok(s)
    }

    #[test]
    fn test_quotes() {
        assert_eq!(scan("'abc'").unwrap(), "abc");
        assert_eq!(scan("\"it's\"").unwrap(), "it's");
        assert_eq!(scan("'''a\n'b'\n'''").unwrap(), "a\n'b'\n");
        assert_eq!(scan("\"\"").unwrap(), "");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(scan(r"'a\nb\t\'c\\'").unwrap(), "a\nb\t'c\\");
        assert_eq!(scan(r"'\x41é\U0001F600\101'").unwrap(), "Aé😀A");
        assert_eq!(scan(r"'\d'").unwrap(), "\\d");
        assert_eq!(scan("'a\\\nb'").unwrap(), "ab");
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(scan(r"r'\n'").unwrap(), "\\n");
        assert_eq!(scan(r"R'\''").unwrap(), "\\'");
        assert_eq!(scan("u'x'").unwrap(), "x");
        assert!(scan("b'x'").is_err());
        assert!(scan("f'{x}'").is_err());
    }

    #[test]
    fn test_unterminated() {
        assert!(scan("'abc").is_err());
        assert!(scan("'a\nb'").is_err());
        assert!(scan("'''abc''").is_err());
        assert!(scan(r"'\x4'").is_err());
    }

    #[test]
    fn test_string_start() {
        assert_eq!(string_start(&Cursor::new("'x'")), Some(0));
        assert_eq!(string_start(&Cursor::new("rb'x'")), Some(2));
        assert_eq!(string_start(&Cursor::new("r'x'")), Some(1));
        assert_eq!(string_start(&Cursor::new("True")), None);
        assert_eq!(string_start(&Cursor::new("rx'")), None);
    }
}
