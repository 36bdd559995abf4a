//! Color table and font table destinations.
//!
//! Both parsers are entered right after the destination keyword, inside the
//! destination's group, and return once the group's closing brace has been
//! consumed. They return `false` when the input ends first.

use super::error::RtfResult;
use super::keyword::Keyword;
use super::lexer::{Token, decode_escaped_byte, read_hex_byte, read_token, skip_group};
use super::source::Source;
use super::types::{Color, ColorTable, Font, FontFamily, FontTable};
use std::io::BufRead;

#[inline]
fn component(param: Option<i32>) -> u8 {
    param.unwrap_or(0).clamp(0, 255) as u8
}

/// Parse `{\colortbl ...}`.
///
/// Each `;` closes one entry. An entry with no `\red`, `\green` or `\blue`
/// is the automatic color.
pub(crate) fn parse_color_table<R: BufRead>(
    src: &mut Source<R>,
    table: &mut ColorTable,
) -> RtfResult<bool> {
    let mut red = None;
    let mut green = None;
    let mut blue = None;
    let mut depth: usize = 1;

    while let Some(byte) = src.next_byte()? {
        match byte {
            b';' => {
                let color = if red.is_some() || green.is_some() || blue.is_some() {
                    Some(Color::new(
                        red.unwrap_or(0),
                        green.unwrap_or(0),
                        blue.unwrap_or(0),
                    ))
                } else {
                    None
                };
                table.push(color);
                red = None;
                green = None;
                blue = None;
            },
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(true);
                }
            },
            b'\\' => match read_token(src)? {
                Token::Keyword(Keyword::Red, param) => red = Some(component(param)),
                Token::Keyword(Keyword::Green, param) => green = Some(component(param)),
                Token::Keyword(Keyword::Blue, param) => blue = Some(component(param)),
                Token::Keyword(Keyword::Bin, Some(len)) if len > 0 => {
                    src.skip_bytes(len as usize)?;
                },
                _ => {},
            },
            _ => {},
        }
    }

    Ok(false)
}

/// A font table entry under construction.
#[derive(Debug, Default)]
struct FontEntry {
    index: Option<i32>,
    font: Font,
    /// A `;` ended the name; later text is alternate-name data
    name_done: bool,
}

impl FontEntry {
    fn is_blank(&self) -> bool {
        self.index.is_none() && self.font.name.trim().is_empty()
    }

    fn push_name(&mut self, ch: char) {
        if !self.name_done {
            self.font.name.push(ch);
        }
    }

    /// Store the entry. Entries without `\f` land at index 0.
    fn commit(mut self, table: &mut FontTable) {
        let index = self.index.unwrap_or_else(|| {
            tracing::debug!(name = %self.font.name, "font entry without \\f, using index 0");
            0
        });
        let trimmed = self.font.name.trim();
        if trimmed.len() != self.font.name.len() {
            self.font.name = trimmed.to_string();
        }
        table.insert(index, self.font);
    }
}

/// Parse `{\fonttbl ...}`.
///
/// Entries are normally one group each (`{\f0\froman Times;}`), but the
/// older flat form separated only by `;` is accepted too. Nested groups
/// inside an entry (`{\*\panose ...}`, `{\*\falt ...}`) are skipped.
pub(crate) fn parse_font_table<R: BufRead>(
    src: &mut Source<R>,
    table: &mut FontTable,
) -> RtfResult<bool> {
    let mut entry = FontEntry::default();
    let mut in_entry_group = false;

    while let Some(byte) = src.next_byte()? {
        match byte {
            b'{' if !in_entry_group => {
                if !entry.is_blank() {
                    std::mem::take(&mut entry).commit(table);
                }
                in_entry_group = true;
            },
            b'{' => {
                if !skip_group(src)? {
                    return Ok(false);
                }
            },
            b'}' if in_entry_group => {
                std::mem::take(&mut entry).commit(table);
                in_entry_group = false;
            },
            b'}' => {
                if !entry.is_blank() {
                    entry.commit(table);
                }
                return Ok(true);
            },
            b';' => {
                entry.name_done = true;
                if !in_entry_group {
                    std::mem::take(&mut entry).commit(table);
                }
            },
            b'\\' => match read_token(src)? {
                Token::Keyword(Keyword::Font, param) => entry.index = Some(param.unwrap_or(0)),
                Token::Keyword(Keyword::FontNil | Keyword::FontTech, _) => {
                    entry.font.family = FontFamily::None;
                },
                Token::Keyword(Keyword::FontRoman, _) => entry.font.family = FontFamily::Serif,
                Token::Keyword(Keyword::FontSwiss, _) => entry.font.family = FontFamily::SansSerif,
                Token::Keyword(Keyword::FontModern, _) => entry.font.family = FontFamily::Monospace,
                Token::Keyword(Keyword::FontScript, _) => entry.font.family = FontFamily::Cursive,
                Token::Keyword(Keyword::FontDecor, _) => entry.font.family = FontFamily::Fantasy,
                Token::Keyword(Keyword::FontPitch, param) => entry.font.pitch = param.unwrap_or(0),
                Token::Keyword(Keyword::FontCharset, param) => {
                    entry.font.charset = param.unwrap_or(0);
                },
                Token::Keyword(Keyword::Bin, Some(len)) if len > 0 => {
                    src.skip_bytes(len as usize)?;
                },
                Token::ControlChar('\'') => {
                    let ch = decode_escaped_byte(read_hex_byte(src)?);
                    entry.push_name(ch);
                },
                Token::ControlChar(ch @ ('\\' | '{' | '}')) => entry.push_name(ch),
                _ => {},
            },
            b'\r' | b'\n' => {},
            other => entry.push_name(other as char),
        }
    }

    Ok(false)
}
