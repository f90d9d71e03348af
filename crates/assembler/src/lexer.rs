//! Tokenizer for bci assembly text.

use crate::error::AsmError;

/// A single token from an assembly line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// An opcode mnemonic. Always uppercase.
    Ident(String),
    /// A decimal literal, or a negated hex literal.
    Number(i64),
    /// An unsigned hex literal. Kept apart so PUSH can accept bit patterns
    /// up to `0xffffffff`.
    Hex(u64),
}

impl Token {
    /// The token as it would be written back in source.
    pub(crate) fn text(&self) -> String {
        match self {
            Token::Ident(s) => s.clone(),
            Token::Number(n) => n.to_string(),
            Token::Hex(n) => format!("{n:#x}"),
        }
    }
}

/// Tokenize a single line of assembly text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` and extend to end of line.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let line = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };

    line.split_whitespace()
        .map(|word| tokenize_word(word, line_num))
        .collect()
}

fn tokenize_word(word: &str, line_num: usize) -> Result<Token, AsmError> {
    let (negative, digits) = match word.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, word),
    };

    if !digits.as_bytes().first().is_some_and(u8::is_ascii_digit) {
        if negative {
            return Err(invalid(word, line_num));
        }
        return Ok(Token::Ident(word.to_uppercase()));
    }

    let hex = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"));
    match (hex, negative) {
        (Some(hex), false) => u64::from_str_radix(hex, 16)
            .map(Token::Hex)
            .map_err(|_| invalid(word, line_num)),
        (Some(hex), true) => i64::from_str_radix(hex, 16)
            .map(|n| Token::Number(-n))
            .map_err(|_| invalid(word, line_num)),
        (None, _) => word
            .parse::<i64>()
            .map(Token::Number)
            .map_err(|_| invalid(word, line_num)),
    }
}

fn invalid(word: &str, line_num: usize) -> AsmError {
    AsmError::InvalidNumber {
        line: line_num,
        token: word.to_string(),
    }
}
