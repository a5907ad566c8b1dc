use anyhow::Result;
use field_types::FieldValue;

use super::{
    cursor::{is_ident_continue, is_ident_start, Cursor},
    number::{scan_number, starts_number},
    string_literal::{scan_string, string_start},
    MAX_DEPTH,
};

/// Parses `input` as a single literal expression.
///
/// Leading spaces and tabs are ignored, as are trailing whitespace, newlines
/// and comments. A top level `a, b` is a tuple. Anything else left over is an
/// error.
pub fn parse(input: &str) -> Result<FieldValue> {
    let mut parser = LiteralParser::new(input.trim_start_matches([' ', '\t']));
    parser.skip_blank();
    let value = parser.parse_top()?;
    parser.skip_blank();
    if let Some(c) = parser.cursor.peek() {
        anyhow::bail!(
            "Unexpected {:?} after literal at {}",
            c,
            parser.cursor.pos()
        );
    }
    Ok(value)
}

struct LiteralParser {
    cursor: Cursor,
    // Newlines only separate tokens while at least one bracket is open.
    open_brackets: usize,
}

impl LiteralParser {
    fn new(input: &str) -> Self {
        LiteralParser {
            cursor: Cursor::new(input),
            open_brackets: 0,
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.open_brackets += 1;
        if self.open_brackets > MAX_DEPTH {
            anyhow::bail!("Literal nested deeper than {} levels", MAX_DEPTH);
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.open_brackets -= 1;
    }

    fn skip_comment(&mut self) {
        self.cursor.take_while(|c| c != '\n' && c != '\r');
    }

    fn skip_ws(&mut self) {
        loop {
            match self.cursor.peek() {
                Some(' ') | Some('\t') | Some('\x0c') => {
                    self.cursor.bump();
                }
                Some('\n') | Some('\r') if self.open_brackets > 0 => {
                    self.cursor.bump();
                }
                Some('#') => self.skip_comment(),
                Some('\\') if self.cursor.peek_at(1) == Some('\n') => {
                    self.cursor.bump();
                    self.cursor.bump();
                }
                Some('\\')
                    if self.cursor.peek_at(1) == Some('\r')
                        && self.cursor.peek_at(2) == Some('\n') =>
                {
                    self.cursor.bump();
                    self.cursor.bump();
                    self.cursor.bump();
                }
                _ => return,
            }
        }
    }

    /// Whitespace, comments and blank lines around the top level literal.
    fn skip_blank(&mut self) {
        loop {
            self.skip_ws();
            match self.cursor.peek() {
                Some('\n') | Some('\r') => {
                    self.cursor.bump();
                }
                _ => return,
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.cursor.eat(expected) {
            return Ok(());
        }
        match self.cursor.peek() {
            Some(c) => anyhow::bail!(
                "Expected {:?}, found {:?} at {}",
                expected,
                c,
                self.cursor.pos()
            ),
            None => anyhow::bail!("Expected {:?}, found end of input", expected),
        }
    }

    fn parse_top(&mut self) -> Result<FieldValue> {
        let first = self.parse_expr()?;
        self.skip_ws();
        if self.cursor.peek() != Some(',') {
            return Ok(first);
        }

        let mut items = vec![first];
        while self.cursor.eat(',') {
            self.skip_ws();
            if self.cursor.at_end() || matches!(self.cursor.peek(), Some('\n') | Some('\r')) {
                break;
            }
            items.push(self.parse_expr()?);
            self.skip_ws();
        }
        Ok(FieldValue::Tuple(items))
    }

    fn parse_expr(&mut self) -> Result<FieldValue> {
        self.skip_ws();
        match self.cursor.peek() {
            Some('+') | Some('-') => self.parse_signed(),
            _ => self.parse_atom(),
        }
    }

    /// A single `+` or `-` applied to a (possibly parenthesized) number.
    fn parse_signed(&mut self) -> Result<FieldValue> {
        let negative = self.cursor.bump() == Some('-');
        self.skip_ws();

        let mut parens = 0;
        while self.cursor.eat('(') {
            self.enter()?;
            parens += 1;
            self.skip_ws();
        }
        if !starts_number(&self.cursor) {
            anyhow::bail!(
                "Unary operator applied to a non-number at {}",
                self.cursor.pos()
            );
        }
        let value = scan_number(&mut self.cursor)?.signed(negative)?;
        for _ in 0..parens {
            self.skip_ws();
            self.expect(')')?;
            self.leave();
        }
        Ok(value)
    }

    fn parse_atom(&mut self) -> Result<FieldValue> {
        if string_start(&self.cursor).is_some() {
            return self.parse_strings();
        }
        if starts_number(&self.cursor) {
            return scan_number(&mut self.cursor)?.signed(false);
        }
        match self.cursor.peek() {
            Some('[') => self.parse_list(),
            Some('(') => self.parse_parens(),
            Some('{') => self.parse_braces(),
            Some(c) if is_ident_start(c) => self.parse_name(),
            Some(c) => anyhow::bail!("Unexpected {:?} at {}", c, self.cursor.pos()),
            None => anyhow::bail!("Unexpected end of input"),
        }
    }

    /// Adjacent string literals concatenate.
    fn parse_strings(&mut self) -> Result<FieldValue> {
        let mut value = scan_string(&mut self.cursor)?;
        loop {
            self.skip_ws();
            if string_start(&self.cursor).is_none() {
                return Ok(FieldValue::String(value));
            }
            value.push_str(&scan_string(&mut self.cursor)?);
        }
    }

    fn parse_name(&mut self) -> Result<FieldValue> {
        let start = self.cursor.pos();
        let name = self.cursor.take_while(is_ident_continue);
        match name.as_str() {
            "True" => Ok(FieldValue::Bool(true)),
            "False" => Ok(FieldValue::Bool(false)),
            "None" => Ok(FieldValue::Null),
            "set" => {
                self.skip_ws();
                self.expect('(')?;
                self.enter()?;
                self.skip_ws();
                self.expect(')')?;
                self.leave();
                Ok(FieldValue::Set(vec![]))
            }
            _ => anyhow::bail!("Name {:?} at {} is not a literal", name, start),
        }
    }

    /// Comma separated expressions up to `close`, after the opening bracket.
    fn parse_sequence(&mut self, close: char) -> Result<Vec<FieldValue>> {
        let mut items = vec![];
        loop {
            self.skip_ws();
            if self.cursor.eat(close) {
                return Ok(items);
            }
            items.push(self.parse_expr()?);
            self.skip_ws();
            if self.cursor.eat(close) {
                return Ok(items);
            }
            self.expect(',')?;
        }
    }

    fn parse_list(&mut self) -> Result<FieldValue> {
        self.expect('[')?;
        self.enter()?;
        let items = self.parse_sequence(']')?;
        self.leave();
        Ok(FieldValue::List(items))
    }

    fn parse_parens(&mut self) -> Result<FieldValue> {
        self.expect('(')?;
        self.enter()?;
        self.skip_ws();
        if self.cursor.eat(')') {
            self.leave();
            return Ok(FieldValue::Tuple(vec![]));
        }

        let first = self.parse_expr()?;
        self.skip_ws();
        if self.cursor.eat(')') {
            // Plain grouping, not a tuple.
            self.leave();
            return Ok(first);
        }
        self.expect(',')?;
        let mut items = vec![first];
        items.extend(self.parse_sequence(')')?);
        self.leave();
        Ok(FieldValue::Tuple(items))
    }

    fn parse_braces(&mut self) -> Result<FieldValue> {
        self.expect('{')?;
        self.enter()?;
        self.skip_ws();
        if self.cursor.eat('}') {
            self.leave();
            return Ok(FieldValue::Map(vec![]));
        }

        let first = self.parse_expr()?;
        self.skip_ws();
        let value = if self.cursor.eat(':') {
            let mut entries = vec![(first, self.parse_expr()?)];
            loop {
                self.skip_ws();
                if self.cursor.eat('}') {
                    break;
                }
                self.expect(',')?;
                self.skip_ws();
                if self.cursor.eat('}') {
                    break;
                }
                let key = self.parse_expr()?;
                self.skip_ws();
                self.expect(':')?;
                let value = self.parse_expr()?;
                entries.push((key, value));
            }
            if let Some((key, _)) = entries.iter().find(|(k, _)| !is_hashable(k)) {
                anyhow::bail!("Unhashable dict key: {}", key.r#type());
            }
            FieldValue::map_of(entries)
        } else {
            let mut members = vec![first];
            if !self.cursor.eat('}') {
                self.expect(',')?;
                members.extend(self.parse_sequence('}')?);
            }
            if let Some(member) = members.iter().find(|m| !is_hashable(m)) {
                anyhow::bail!("Unhashable set member: {}", member.r#type());
            }
            FieldValue::set_of(members)
        };
        self.leave();
        Ok(value)
    }
}

/// Only immutable values may be set members or dict keys.
fn is_hashable(value: &FieldValue) -> bool {
    match value {
        FieldValue::List(_) | FieldValue::Set(_) | FieldValue::Map(_) => false,
        FieldValue::Tuple(items) => items.iter().all(is_hashable),
        _ => true,
    }
}
