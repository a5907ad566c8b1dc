//! A bounded literal grammar: numbers, booleans, `None`, quoted strings and
//! bracketed lists, tuples, sets and dicts.
//!
//! This never evaluates anything. Names other than `True`, `False`, `None`
//! and an empty `set()` call are rejected, as are operators other than a
//! single unary sign on a number.

mod cursor;
mod number;
mod parser;
mod string_literal;

pub use parser::parse;

/// Deepest bracket nesting the parser will follow before giving up.
pub const MAX_DEPTH: usize = 100;
