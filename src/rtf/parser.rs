//! RTF parser that builds document structure in a single pass.
//!
//! The parser owns the byte cursor, the group stack and the current
//! formatting. Literal text is buffered into runs; paragraph marks turn the
//! buffered runs into paragraphs, and `\cell`/`\row` feed the table builder.

use super::border::{BorderSide, BorderStyle};
use super::error::{RtfError, RtfResult};
use super::info::{DocumentInfo, parse_info};
use super::keyword::Keyword;
use super::lexer::{Token, decode_escaped_byte, read_hex_byte, read_token, skip_group};
use super::options::ConvertOptions;
use super::resources::{parse_color_table, parse_font_table};
use super::source::Source;
use super::state::{Diagnostics, GroupStack, GroupState};
use super::style::StyleDiffer;
use super::table::{Cell, CellVerticalAlign, TableBuilder};
use super::types::*;
use std::io::BufRead;

/// Page width in twips when `\paperw` is absent (8.5in).
pub(crate) const DEFAULT_PAGE_WIDTH: i32 = 12240;
/// Left and right margin in twips when `\margl`/`\margr` are absent (1.25in).
pub(crate) const DEFAULT_MARGIN: i32 = 1800;

/// RTF Parser.
pub(crate) struct Parser<R> {
    src: Source<R>,
    options: ConvertOptions,
    /// Saved states of the enclosing groups
    stack: GroupStack,
    /// State of the innermost group
    state: GroupState,
    color_table: ColorTable,
    font_table: FontTable,
    info: DocumentInfo,
    page_width: i32,
    left_margin: i32,
    right_margin: i32,
    table: TableBuilder,
    /// Finished runs of the current paragraph or cell
    runs: Vec<Run>,
    /// Text of the run being collected
    text: String,
    /// Formatting of `text`
    text_formatting: FormattingOptions,
    elements: Vec<DocumentElement>,
    diagnostics: Diagnostics,
    /// A `\*` was seen and not yet consumed
    ignorable: bool,
    /// Fallback characters still to drop after `\uN`
    fallback_skip: usize,
    /// High half of a UTF-16 surrogate pair given by `\uN`
    high_surrogate: Option<u16>,
}

impl<R: BufRead> Parser<R> {
    /// Create a new parser over a buffered reader.
    pub fn new(reader: R, options: ConvertOptions) -> Self {
        Self {
            src: Source::new(reader),
            options,
            stack: GroupStack::new(),
            state: GroupState::default(),
            color_table: ColorTable::new(),
            font_table: FontTable::new(),
            info: DocumentInfo::new(),
            page_width: DEFAULT_PAGE_WIDTH,
            left_margin: DEFAULT_MARGIN,
            right_margin: DEFAULT_MARGIN,
            table: TableBuilder::new(),
            runs: Vec::new(),
            text: String::new(),
            text_formatting: FormattingOptions::default(),
            elements: Vec::new(),
            diagnostics: Diagnostics::default(),
            ignorable: false,
            fallback_skip: 0,
            high_surrogate: None,
        }
    }

    /// Parse the whole input into a document.
    pub fn parse(mut self) -> RtfResult<ParsedDocument> {
        while let Some(byte) = self.src.next_byte()? {
            match byte {
                b'{' => self.open_group()?,
                b'}' => self.close_group()?,
                b'\\' => self.control()?,
                b'\r' | b'\n' => {},
                0x80.. => {
                    let ch = self.read_literal(byte)?;
                    self.push_char(ch);
                },
                _ => self.push_char(byte as char),
            }
        }

        self.finish()
    }

    fn open_group(&mut self) -> RtfResult<()> {
        self.fallback_skip = 0;
        self.stack.push(&self.state);
        if std::mem::take(&mut self.ignorable) {
            // `\*` directly before a group discards the group.
            self.skip_destination()?;
        }
        Ok(())
    }

    fn close_group(&mut self) -> RtfResult<()> {
        self.fallback_skip = 0;
        self.ignorable = false;
        match self.stack.pop() {
            Some(state) => self.state = state,
            None if self.options.strict => {
                return Err(RtfError::UnbalancedGroup {
                    unmatched_close: self.stack.unmatched_close(),
                    unclosed: 0,
                });
            },
            None => {
                tracing::warn!(position = self.src.position(), "unmatched closing brace ignored");
            },
        }
        Ok(())
    }

    /// Discard the rest of the current group and restore the enclosing state.
    fn skip_destination(&mut self) -> RtfResult<()> {
        if skip_group(&mut self.src)? {
            self.close_group()?;
        }
        Ok(())
    }

    /// Finish a destination whose parser consumed the closing brace.
    fn end_destination(&mut self, closed: bool) -> RtfResult<()> {
        if closed {
            self.close_group()?;
        }
        Ok(())
    }

    fn control(&mut self) -> RtfResult<()> {
        let token = read_token(&mut self.src)?;

        if std::mem::take(&mut self.ignorable)
            && !matches!(
                token,
                Token::Keyword(Keyword::ColorTable | Keyword::FontTable | Keyword::Info, _)
            )
        {
            tracing::debug!(?token, "skipping ignorable destination");
            return self.skip_destination();
        }

        match token {
            Token::ControlChar(ch) => self.control_symbol(ch),
            Token::Keyword(keyword, param) => self.keyword(keyword, param),
            Token::Unknown(name, _) => {
                tracing::trace!(keyword = %name, "unknown keyword ignored");
                Ok(())
            },
        }
    }

    fn control_symbol(&mut self, ch: char) -> RtfResult<()> {
        match ch {
            '\\' | '{' | '}' => self.push_char(ch),
            '\'' => {
                let byte = read_hex_byte(&mut self.src)?;
                self.push_char(decode_escaped_byte(byte));
            },
            '~' => self.push_char('\u{a0}'),
            '-' => self.push_char('\u{ad}'),
            '_' => self.push_char('\u{2011}'),
            '*' => self.ignorable = true,
            '\r' | '\n' => self.paragraph_break(),
            _ => tracing::trace!(symbol = %ch, "unknown control symbol ignored"),
        }
        Ok(())
    }

    fn keyword(&mut self, keyword: Keyword, param: Option<i32>) -> RtfResult<()> {
        if keyword.is_skipped_destination() {
            tracing::debug!(position = self.src.position(), "skipping destination");
            return self.skip_destination();
        }
        if self.character_keyword(keyword, param) || self.paragraph_keyword(keyword, param) {
            return Ok(());
        }
        if self.table_keyword(keyword, param) {
            return Ok(());
        }

        let value = param.unwrap_or(0);
        match keyword {
            Keyword::Par | Keyword::Sect => self.paragraph_break(),
            Keyword::Line => self.push_char('\n'),
            Keyword::Tab => self.push_char('\t'),
            Keyword::Bullet => self.push_char('\u{2022}'),
            Keyword::EmDash => self.push_char('\u{2014}'),
            Keyword::EnDash => self.push_char('\u{2013}'),
            Keyword::EmSpace => self.push_char('\u{2003}'),
            Keyword::EnSpace => self.push_char('\u{2002}'),
            Keyword::LeftQuote => self.push_char('\u{2018}'),
            Keyword::RightQuote => self.push_char('\u{2019}'),
            Keyword::LeftDoubleQuote => self.push_char('\u{201c}'),
            Keyword::RightDoubleQuote => self.push_char('\u{201d}'),
            Keyword::Unicode => self.unicode(value),
            Keyword::UnicodeSkip => self.state.unicode_skip = value.max(0) as usize,
            Keyword::Bin => {
                if value > 0 {
                    self.src.skip_bytes(value as usize)?;
                }
            },
            Keyword::PaperWidth => self.page_width = value,
            Keyword::MarginLeft => self.left_margin = value,
            Keyword::MarginRight => self.right_margin = value,
            Keyword::ColorTable => {
                let closed = parse_color_table(&mut self.src, &mut self.color_table)?;
                tracing::debug!(colors = self.color_table.len(), "color table parsed");
                self.end_destination(closed)?;
            },
            Keyword::FontTable => {
                let closed = parse_font_table(&mut self.src, &mut self.font_table)?;
                tracing::debug!(fonts = self.font_table.len(), "font table parsed");
                self.end_destination(closed)?;
            },
            Keyword::Info => {
                let closed = parse_info(&mut self.src, &mut self.info)?;
                self.end_destination(closed)?;
            },
            // Header keywords and keywords that only mean something inside
            // a destination.
            _ => {},
        }
        Ok(())
    }

    /// Apply a character formatting keyword. Returns `false` for any other
    /// keyword.
    fn character_keyword(&mut self, keyword: Keyword, param: Option<i32>) -> bool {
        // Toggles are on unless the parameter is 0.
        let on = keyword.is_toggle() && param != Some(0);
        let value = param.unwrap_or(0);
        let fmt = &mut self.state.formatting;

        match keyword {
            Keyword::Bold => fmt.bold = on,
            Keyword::Italic => fmt.italic = on,
            Keyword::Underline => fmt.underline = on,
            Keyword::UnderlineNone => fmt.underline = false,
            Keyword::Superscript => {
                fmt.vertical_align = if on {
                    VerticalAlign::Super
                } else {
                    VerticalAlign::Normal
                };
            },
            Keyword::Subscript => {
                fmt.vertical_align = if on {
                    VerticalAlign::Sub
                } else {
                    VerticalAlign::Normal
                };
            },
            Keyword::NoSuperSub => fmt.vertical_align = VerticalAlign::Normal,
            Keyword::FontSize => fmt.font_size = value.max(0),
            Keyword::Highlight => fmt.highlight = value.max(0),
            Keyword::Foreground => fmt.foreground = self.color_table.get(value),
            Keyword::Background => fmt.background = self.color_table.get(value),
            Keyword::Font => {
                fmt.font = self.font_table.get(value).cloned();
                if fmt.font.is_none() {
                    tracing::trace!(index = value, "font not in font table");
                }
            },
            Keyword::Plain => fmt.reset_character(),
            _ => return false,
        }
        true
    }

    /// Apply a paragraph formatting keyword. Returns `false` for any other
    /// keyword.
    fn paragraph_keyword(&mut self, keyword: Keyword, param: Option<i32>) -> bool {
        let points = twips_to_points(param.unwrap_or(0));
        let fmt = &mut self.state.formatting;

        match keyword {
            Keyword::Pard => fmt.reset_paragraph(),
            Keyword::LeftAlign => fmt.align = Alignment::Left,
            Keyword::RightAlign => fmt.align = Alignment::Right,
            Keyword::Center => fmt.align = Alignment::Center,
            Keyword::Justify => fmt.align = Alignment::Justify,
            Keyword::FirstIndent => fmt.first = points,
            Keyword::LeftIndent => fmt.left = points,
            Keyword::RightIndent => fmt.right = points,
            Keyword::SpaceBefore => fmt.before = points,
            Keyword::SpaceAfter => fmt.after = points,
            Keyword::InTable => fmt.in_table = true,
            _ => return false,
        }
        true
    }

    /// Apply a table keyword. Returns `false` for any other keyword.
    fn table_keyword(&mut self, keyword: Keyword, param: Option<i32>) -> bool {
        let value = param.unwrap_or(0);

        match keyword {
            Keyword::RowDefaults => self.table.reset_row_definition(),
            Keyword::CellX => self.table.define_cell(value),
            Keyword::RowLeft => self.table.set_left(value),
            Keyword::RowHeight => self.table.set_height(value),
            Keyword::Cell => self.end_cell(),
            Keyword::Row => self.table.end_row(),
            Keyword::CellMergeFirst => self.table.pending_def_mut().h_first_merged = true,
            Keyword::CellMerge => self.table.pending_def_mut().h_merged = true,
            Keyword::CellVMergeFirst => self.table.pending_def_mut().first_merged = true,
            Keyword::CellVMerge => self.table.pending_def_mut().merged = true,
            Keyword::CellVAlignTop => self.table.pending_def_mut().v_align = CellVerticalAlign::Top,
            Keyword::CellVAlignCenter => {
                self.table.pending_def_mut().v_align = CellVerticalAlign::Center;
            },
            Keyword::CellVAlignBottom => {
                self.table.pending_def_mut().v_align = CellVerticalAlign::Bottom;
            },
            Keyword::CellBorderTop => self.select_border(BorderSide::Top),
            Keyword::CellBorderBottom => self.select_border(BorderSide::Bottom),
            Keyword::CellBorderLeft => self.select_border(BorderSide::Left),
            Keyword::CellBorderRight => self.select_border(BorderSide::Right),
            Keyword::BorderNone => self.set_border_style(BorderStyle::None),
            Keyword::BorderSingle => self.set_border_style(BorderStyle::Single),
            Keyword::BorderThick => self.set_border_style(BorderStyle::Thick),
            Keyword::BorderDouble => self.set_border_style(BorderStyle::Double),
            Keyword::BorderDotted => self.set_border_style(BorderStyle::Dotted),
            Keyword::BorderDashed => self.set_border_style(BorderStyle::Dashed),
            _ => return false,
        }
        true
    }

    /// `\clbrdrX`: the edge is drawn and later `\brdr*` keywords style it.
    fn select_border(&mut self, side: BorderSide) {
        let def = self.table.pending_def_mut();
        def.borders.set(side, BorderStyle::Single);
        def.active_border = Some(side);
    }

    fn set_border_style(&mut self, style: BorderStyle) {
        let def = self.table.pending_def_mut();
        if let Some(side) = def.active_border {
            def.borders.set(side, style);
        }
    }

    fn unicode(&mut self, value: i32) {
        // Negative parameters are the upper half of the 16-bit range.
        let unit = value as u16;
        let skip = self.state.unicode_skip;

        if (0xD800..0xDC00).contains(&unit) {
            if self.high_surrogate.replace(unit).is_some() {
                self.push_text(char::REPLACEMENT_CHARACTER);
            }
        } else {
            let high = self.high_surrogate.take();
            for decoded in char::decode_utf16(high.into_iter().chain(Some(unit))) {
                self.push_text(decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }

        self.fallback_skip = skip;
    }

    /// Decode a literal byte >= 0x80: a valid UTF-8 sequence gives its
    /// character, anything else is taken as a Latin-1 code point.
    fn read_literal(&mut self, lead: u8) -> RtfResult<char> {
        let width = match lead {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Ok(lead as char),
        };

        let mut buf = [lead, 0, 0, 0];
        let mut read = 1;
        while read < width {
            match self.src.next_byte()? {
                Some(byte) if (0x80..0xC0).contains(&byte) => {
                    buf[read] = byte;
                    read += 1;
                },
                Some(byte) => {
                    self.src.unread(byte);
                    break;
                },
                None => break,
            }
        }

        if read == width
            && let Ok(decoded) = std::str::from_utf8(&buf[..width])
            && let Some(ch) = decoded.chars().next()
        {
            return Ok(ch);
        }

        for &byte in buf[1..read].iter().rev() {
            self.src.unread(byte);
        }
        Ok(lead as char)
    }

    /// Add a document character, honoring pending `\uN` fallback skips.
    fn push_char(&mut self, ch: char) {
        if self.fallback_skip > 0 {
            self.fallback_skip -= 1;
            return;
        }
        if self.high_surrogate.take().is_some() {
            self.push_text(char::REPLACEMENT_CHARACTER);
        }
        self.push_text(ch);
    }

    /// Append a character to the current run, starting a new run when the
    /// formatting changed.
    fn push_text(&mut self, ch: char) {
        if self.text.is_empty() {
            self.text_formatting.clone_from(&self.state.formatting);
        } else if self.text_formatting != self.state.formatting {
            self.flush_run();
            self.text_formatting.clone_from(&self.state.formatting);
        }
        self.text.push(ch);
    }

    fn flush_run(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.runs.push(Run::new(text, self.text_formatting.clone()));
        }
    }

    /// `\par`: a line break inside a table cell, otherwise the end of a
    /// paragraph. A paragraph outside the table closes any open table.
    fn paragraph_break(&mut self) {
        if self.state.formatting.in_table {
            self.push_text('\n');
            return;
        }

        self.close_table();
        self.flush_run();
        let runs = std::mem::take(&mut self.runs);
        if runs.is_empty() && !self.options.emit_empty_paragraphs {
            return;
        }
        self.elements.push(DocumentElement::Paragraph(Paragraph {
            runs,
            formatting: self.state.formatting.clone(),
        }));
    }

    /// `\cell`: the buffered runs become one cell.
    fn end_cell(&mut self) {
        self.flush_run();
        let runs = std::mem::take(&mut self.runs);

        let text: String = runs.iter().map(|run| run.text.as_str()).collect();
        let mut html = String::with_capacity(text.len());
        StyleDiffer::new().render_runs(&runs, &mut html);

        self.table.add_cell(Cell {
            text,
            html,
            align: self.state.formatting.align,
        });
    }

    fn close_table(&mut self) {
        if !self.table.is_open() {
            return;
        }

        let (table, unterminated) = self.table.finish();
        if unterminated {
            self.diagnostics.unterminated_rows += 1;
            tracing::warn!("table row without \\row closed with its table");
        }
        if let Some(table) = table {
            tracing::debug!(rows = table.row_count(), "table emitted");
            self.elements.push(DocumentElement::Table(table));
        }
    }

    fn finish(mut self) -> RtfResult<ParsedDocument> {
        let unclosed = self.stack.depth();
        if unclosed > 0 {
            if self.options.strict {
                return Err(RtfError::UnbalancedGroup {
                    unmatched_close: self.stack.unmatched_close(),
                    unclosed,
                });
            }
            tracing::warn!(unclosed, "input ended inside open groups");
        }

        if self.high_surrogate.take().is_some() {
            self.push_text(char::REPLACEMENT_CHARACTER);
        }
        self.flush_run();
        self.close_table();
        if !self.runs.is_empty() {
            let runs = std::mem::take(&mut self.runs);
            self.elements.push(DocumentElement::Paragraph(Paragraph {
                runs,
                formatting: self.state.formatting.clone(),
            }));
        }

        self.diagnostics.unmatched_close = self.stack.unmatched_close();
        self.diagnostics.unclosed_groups = unclosed;

        Ok(ParsedDocument {
            info: self.info,
            color_table: self.color_table,
            font_table: self.font_table,
            page_width: self.page_width,
            left_margin: self.left_margin,
            right_margin: self.right_margin,
            elements: self.elements,
            diagnostics: self.diagnostics,
        })
    }
}

/// Parsed RTF document.
pub(crate) struct ParsedDocument {
    pub info: DocumentInfo,
    pub color_table: ColorTable,
    pub font_table: FontTable,
    pub page_width: i32,
    pub left_margin: i32,
    pub right_margin: i32,
    pub elements: Vec<DocumentElement>,
    pub diagnostics: Diagnostics,
}
