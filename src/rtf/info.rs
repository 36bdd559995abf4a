//! RTF document information.
//!
//! This module reads the `\info` destination: document title, subject,
//! author and the other free-text properties. Timestamps and statistics
//! groups are read past without being interpreted.

use super::error::RtfResult;
use super::keyword::Keyword;
use super::lexer::{Token, decode_escaped_byte, read_hex_byte, read_token, skip_group};
use super::source::Source;
use serde::Serialize;
use std::io::BufRead;

/// Document information/metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    /// Document title
    pub title: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Keywords
    pub keywords: Option<String>,
    /// Comments
    pub comment: Option<String>,
    /// Operator (last person to modify)
    pub operator: Option<String>,
    /// Company name
    pub company: Option<String>,
}

impl DocumentInfo {
    /// Create a new document info
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    #[inline]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the author
    #[inline]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    fn field_mut(&mut self, field: InfoField) -> &mut String {
        let slot = match field {
            InfoField::Title => &mut self.title,
            InfoField::Subject => &mut self.subject,
            InfoField::Author => &mut self.author,
            InfoField::Keywords => &mut self.keywords,
            InfoField::Comment => &mut self.comment,
            InfoField::Operator => &mut self.operator,
            InfoField::Company => &mut self.company,
        };
        slot.get_or_insert_with(String::new)
    }
}

/// Text-valued `\info` properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoField {
    Title,
    Subject,
    Author,
    Keywords,
    Comment,
    Operator,
    Company,
}

impl InfoField {
    fn from_keyword(keyword: Keyword) -> Option<Self> {
        match keyword {
            Keyword::Title => Some(InfoField::Title),
            Keyword::Subject => Some(InfoField::Subject),
            Keyword::Author => Some(InfoField::Author),
            Keyword::Keywords => Some(InfoField::Keywords),
            Keyword::Comment => Some(InfoField::Comment),
            Keyword::Operator => Some(InfoField::Operator),
            Keyword::Company => Some(InfoField::Company),
            _ => None,
        }
    }
}

/// Parse `{\info ...}`.
///
/// Each nested group may select a property with its keyword; literal text
/// is appended to the property selected by the innermost enclosing group
/// that selected one. Returns `false` when the input ends first.
pub(crate) fn parse_info<R: BufRead>(
    src: &mut Source<R>,
    info: &mut DocumentInfo,
) -> RtfResult<bool> {
    // Field selected by each open group; the first entry is the \info group.
    let mut scopes: Vec<Option<InfoField>> = vec![None];
    let mut ignorable = false;
    let mut skip_chars: usize = 0;

    while let Some(byte) = src.next_byte()? {
        let active = scopes.iter().rev().find_map(|field| *field);
        let ch = match byte {
            b'{' => {
                scopes.push(None);
                continue;
            },
            b'}' => {
                scopes.pop();
                if scopes.is_empty() {
                    return Ok(true);
                }
                continue;
            },
            b'\r' | b'\n' => continue,
            b'\\' => {
                let token = read_token(src)?;
                if std::mem::take(&mut ignorable)
                    && !matches!(token, Token::Keyword(k, _) if InfoField::from_keyword(k).is_some())
                {
                    // Unknown \* destination: drop the whole group.
                    scopes.pop();
                    if !skip_group(src)? {
                        return Ok(false);
                    }
                    if scopes.is_empty() {
                        return Ok(true);
                    }
                    continue;
                }
                match token {
                    Token::Keyword(keyword, param) => {
                        if let Some(field) = InfoField::from_keyword(keyword) {
                            if let Some(scope) = scopes.last_mut() {
                                *scope = Some(field);
                            }
                        } else if keyword == Keyword::Unicode {
                            if let Some(ch) = param.and_then(|p| char::from_u32(p as u16 as u32)) {
                                skip_chars = 1;
                                if let Some(field) = active {
                                    info.field_mut(field).push(ch);
                                }
                            }
                        } else if keyword == Keyword::Bin
                            && let Some(len) = param.filter(|len| *len > 0)
                        {
                            src.skip_bytes(len as usize)?;
                        }
                        continue;
                    },
                    Token::ControlChar('*') => {
                        ignorable = true;
                        continue;
                    },
                    Token::ControlChar('\'') => decode_escaped_byte(read_hex_byte(src)?),
                    Token::ControlChar('~') => '\u{a0}',
                    Token::ControlChar(ch @ ('\\' | '{' | '}')) => ch,
                    _ => continue,
                }
            },
            other => other as char,
        };

        if skip_chars > 0 {
            skip_chars -= 1;
            continue;
        }
        if let Some(field) = active {
            info.field_mut(field).push(ch);
        }
    }

    Ok(false)
}
