//! RTF keyword lexer.
//!
//! The lexer is pull based: the parser reads plain bytes itself and calls
//! [`read_token`] each time it meets a backslash. This keeps the whole
//! conversion a single pass over the input stream.

use super::error::{RtfError, RtfResult};
use super::keyword::Keyword;
use super::source::Source;
use std::io::BufRead;

/// Parameter value reported for a control word without a numeric parameter.
///
/// Distinguishes `\b` (no parameter) from `\b0` (parameter zero).
pub const NO_PARAMETER: i32 = -1;

/// A single lexed control word or control symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Control symbol: a backslash followed by one non-letter character
    ControlChar(char),
    /// Control word found in the keyword table
    Keyword(Keyword, Option<i32>),
    /// Control word not in the keyword table
    Unknown(String, Option<i32>),
}

impl Token {
    /// Numeric parameter, or [`NO_PARAMETER`] when absent.
    #[inline]
    pub fn parameter(&self) -> i32 {
        match self {
            Token::ControlChar(_) => NO_PARAMETER,
            Token::Keyword(_, param) | Token::Unknown(_, param) => param.unwrap_or(NO_PARAMETER),
        }
    }
}

/// Lex one control word or control symbol.
///
/// The cursor must be positioned immediately after the backslash. On return
/// it is positioned on the first byte that is not part of the token; a single
/// space delimiter after a control word is consumed.
pub(crate) fn read_token<R: BufRead>(src: &mut Source<R>) -> RtfResult<Token> {
    let first = src.next_byte()?.ok_or(RtfError::UnexpectedEof)?;
    if !first.is_ascii_alphabetic() {
        return Ok(Token::ControlChar(first as char));
    }

    let mut name = String::with_capacity(12);
    name.push(first as char);
    let mut next = src.next_byte()?;
    while let Some(byte) = next {
        if !byte.is_ascii_alphabetic() {
            break;
        }
        name.push(byte as char);
        next = src.next_byte()?;
    }

    let mut param = None;
    if let Some(byte) = next
        && (byte == b'-' || byte.is_ascii_digit())
    {
        let (value, after) = read_parameter(src, byte)?;
        param = value;
        next = after;
    }

    // One space terminates a control word and belongs to it.
    match next {
        Some(b' ') | None => {},
        Some(byte) => src.unread(byte),
    }

    Ok(match Keyword::lookup(&name) {
        Some(keyword) => Token::Keyword(keyword, param),
        None => Token::Unknown(name, param),
    })
}

/// Read a signed decimal parameter whose first byte has already been read.
///
/// Returns the value and the first byte after the parameter. A `-` that is
/// not followed by a digit is pushed back and no parameter is reported.
fn read_parameter<R: BufRead>(
    src: &mut Source<R>,
    first: u8,
) -> RtfResult<(Option<i32>, Option<u8>)> {
    let negative = first == b'-';
    let mut next = if negative {
        match src.next_byte()? {
            Some(digit) if digit.is_ascii_digit() => Some(digit),
            other => {
                if let Some(byte) = other {
                    src.unread(byte);
                }
                return Ok((None, Some(b'-')));
            },
        }
    } else {
        Some(first)
    };

    let mut value: i32 = 0;
    while let Some(byte) = next {
        if !byte.is_ascii_digit() {
            break;
        }
        let digit = i32::from(byte - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
        next = src.next_byte()?;
    }

    Ok((Some(value), next))
}

/// Read the two hexadecimal digits of a `\'XX` escape.
pub(crate) fn read_hex_byte<R: BufRead>(src: &mut Source<R>) -> RtfResult<u8> {
    let high = src.next_byte()?.ok_or(RtfError::UnexpectedEof)?;
    let low = src.next_byte()?.ok_or(RtfError::UnexpectedEof)?;
    match (hex_value(high), hex_value(low)) {
        (Some(h), Some(l)) => Ok((h << 4) | l),
        _ => Err(RtfError::InvalidHexEscape(format!(
            "{}{}",
            high as char, low as char
        ))),
    }
}

#[inline]
fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Map a byte from a `\'XX` escape to a character.
///
/// Bytes are taken as code points, except for the bullet and ellipsis
/// positions which get their typographic characters.
#[inline]
pub fn decode_escaped_byte(byte: u8) -> char {
    match byte {
        0x95 => '\u{2022}',
        0x85 => '\u{2026}',
        _ => byte as char,
    }
}

/// Skip the rest of a group.
///
/// The cursor must be positioned just inside the opening brace. On return the
/// matching closing brace has been consumed. Data following `\binN` is
/// skipped unread so that braces inside binary payloads are not counted.
///
/// Returns `false` when the input ended before the group was closed.
pub(crate) fn skip_group<R: BufRead>(src: &mut Source<R>) -> RtfResult<bool> {
    let mut depth: usize = 1;

    while let Some(byte) = src.scan_to_any(b'{', b'}', b'\\')? {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(true);
                }
            },
            _ => match read_token(src) {
                Ok(Token::Keyword(Keyword::Bin, Some(len))) if len > 0 => {
                    src.skip_bytes(len as usize)?;
                },
                Ok(_) => {},
                Err(RtfError::UnexpectedEof) => return Ok(false),
                Err(e) => return Err(e),
            },
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(input: &str) -> (Token, Option<u8>) {
        let mut src = Source::new(input.as_bytes());
        let token = read_token(&mut src).unwrap();
        let rest = src.next_byte().unwrap();
        (token, rest)
    }

    #[test]
    fn test_parameter_sentinel() {
        let (token, _) = lex("b x");
        assert_eq!(token, Token::Keyword(Keyword::Bold, None));
        assert_eq!(token.parameter(), NO_PARAMETER);

        let (token, _) = lex("b0 x");
        assert_eq!(token, Token::Keyword(Keyword::Bold, Some(0)));
        assert_eq!(token.parameter(), 0);

        let (token, _) = lex("fs24 x");
        assert_eq!(token.parameter(), 24);
    }

    #[test]
    fn test_negative_parameter() {
        let (token, rest) = lex("fi-360\\li");
        assert_eq!(token, Token::Keyword(Keyword::FirstIndent, Some(-360)));
        assert_eq!(rest, Some(b'\\'));
    }

    #[test]
    fn test_dash_without_digits_is_pushed_back() {
        let mut src = Source::new(&b"line-x"[..]);
        let token = read_token(&mut src).unwrap();
        assert_eq!(token, Token::Keyword(Keyword::Line, None));
        assert_eq!(src.next_byte().unwrap(), Some(b'-'));
        assert_eq!(src.next_byte().unwrap(), Some(b'x'));
    }

    #[test]
    fn test_single_space_delimiter() {
        let mut src = Source::new(&b"par  text"[..]);
        read_token(&mut src).unwrap();
        // Only the first space belongs to the control word.
        assert_eq!(src.next_byte().unwrap(), Some(b' '));
        assert_eq!(src.next_byte().unwrap(), Some(b't'));
    }

    #[test]
    fn test_control_symbols() {
        assert_eq!(lex("~").0, Token::ControlChar('~'));
        assert_eq!(lex("*\\foo").0, Token::ControlChar('*'));
        assert_eq!(lex("{").0, Token::ControlChar('{'));
        // No space is swallowed after a control symbol.
        assert_eq!(lex("~ ").1, Some(b' '));
    }

    #[test]
    fn test_unknown_keyword() {
        let (token, _) = lex("nosuchword12 ");
        assert_eq!(token, Token::Unknown("nosuchword".to_string(), Some(12)));
    }

    #[test]
    fn test_parameter_saturates() {
        let (token, _) = lex("fs99999999999 ");
        assert_eq!(token.parameter(), i32::MAX);
    }

    #[test]
    fn test_eof_after_backslash() {
        let mut src = Source::new(&b""[..]);
        assert!(matches!(read_token(&mut src), Err(RtfError::UnexpectedEof)));
    }

    #[test]
    fn test_hex_escape() {
        let mut src = Source::new(&b"e9"[..]);
        let byte = read_hex_byte(&mut src).unwrap();
        assert_eq!(decode_escaped_byte(byte), '\u{e9}');
        assert_eq!(decode_escaped_byte(0x95), '\u{2022}');
        assert_eq!(decode_escaped_byte(0x85), '\u{2026}');

        let mut src = Source::new(&b"zz"[..]);
        assert!(matches!(
            read_hex_byte(&mut src),
            Err(RtfError::InvalidHexEscape(_))
        ));
    }

    #[test]
    fn test_skip_group_nested() {
        let mut src = Source::new(&b"\\pict{a{b}}\\}c}after"[..]);
        assert!(skip_group(&mut src).unwrap());
        assert_eq!(src.next_byte().unwrap(), Some(b'a'));
    }

    #[test]
    fn test_skip_group_binary_payload() {
        // The payload contains braces that must not be counted.
        let mut src = Source::new(&b"\\bin4 }}{{}rest"[..]);
        assert!(skip_group(&mut src).unwrap());
        assert_eq!(src.next_byte().unwrap(), Some(b'r'));
    }

    #[test]
    fn test_skip_group_unterminated() {
        let mut src = Source::new(&b"{never closed"[..]);
        assert!(!skip_group(&mut src).unwrap());
    }
}
