//! RTF document type definitions.

use serde::Serialize;
use std::collections::BTreeMap;

/// RTF color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Color {
    /// Red component (0-255)
    pub red: u8,
    /// Green component (0-255)
    pub green: u8,
    /// Blue component (0-255)
    pub blue: u8,
}

impl Color {
    /// Create a new color.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// CSS hex notation, e.g. `#ff0000`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Color table containing document colors.
///
/// Entries are kept in declaration order. An entry without any color
/// component is the "automatic" color and resolves to `None`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ColorTable {
    colors: Vec<Option<Color>>,
}

impl ColorTable {
    /// Create a new color table.
    #[inline]
    pub fn new() -> Self {
        Self { colors: Vec::new() }
    }

    /// Append an entry and return its index.
    #[inline]
    pub fn push(&mut self, color: Option<Color>) -> usize {
        self.colors.push(color);
        self.colors.len() - 1
    }

    /// Resolve a `\cf`/`\cb` index. Automatic and undefined entries yield `None`.
    #[inline]
    pub fn get(&self, index: i32) -> Option<Color> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.colors.get(i).copied().flatten())
    }

    /// Number of entries, including automatic ones.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the table has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Font family categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum FontFamily {
    /// Unknown or default (`\fnil`, `\ftech`)
    #[default]
    None,
    /// Roman fonts (`\froman`)
    Serif,
    /// Swiss fonts (`\fswiss`)
    SansSerif,
    /// Script fonts (`\fscript`)
    Cursive,
    /// Decorative fonts (`\fdecor`)
    Fantasy,
    /// Fixed-pitch fonts (`\fmodern`)
    Monospace,
}

impl FontFamily {
    /// Generic CSS family name.
    pub fn css_generic(self) -> Option<&'static str> {
        match self {
            FontFamily::None => None,
            FontFamily::Serif => Some("serif"),
            FontFamily::SansSerif => Some("sans-serif"),
            FontFamily::Cursive => Some("cursive"),
            FontFamily::Fantasy => Some("fantasy"),
            FontFamily::Monospace => Some("monospace"),
        }
    }
}

/// Font definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Font {
    /// Font family category
    pub family: FontFamily,
    /// Font name
    pub name: String,
    /// Pitch (`\fprq`)
    pub pitch: i32,
    /// Character set (`\fcharset`)
    pub charset: i32,
}

/// Font table keyed by the `\f` index of each entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FontTable {
    fonts: BTreeMap<i32, Font>,
}

impl FontTable {
    /// Create a new font table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a font under its index, replacing any earlier definition.
    #[inline]
    pub fn insert(&mut self, index: i32, font: Font) {
        self.fonts.insert(index, font);
    }

    /// Get a font by index.
    #[inline]
    pub fn get(&self, index: i32) -> Option<&Font> {
        self.fonts.get(&index)
    }

    /// All fonts in index order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &Font)> {
        self.fonts.iter().map(|(index, font)| (*index, font))
    }

    /// Number of fonts.
    #[inline]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether the table is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

/// Vertical text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum VerticalAlign {
    /// Baseline
    #[default]
    Normal,
    /// Subscript
    Sub,
    /// Superscript
    Super,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Alignment {
    /// Left-aligned
    #[default]
    Left,
    /// Right-aligned
    Right,
    /// Centered
    Center,
    /// Justified
    Justify,
}

impl Alignment {
    /// CSS `text-align` value.
    pub fn as_css(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Center => "center",
            Alignment::Justify => "justify",
        }
    }
}

/// Convert twips to points, rounding half up.
#[inline]
pub fn twips_to_points(twips: i32) -> i32 {
    twips.saturating_add(10).div_euclid(20)
}

/// Character and paragraph formatting in effect at some point of the input.
///
/// This is a plain value: groups save and restore copies of it. Equality is
/// structural over every field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct FormattingOptions {
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Underline
    pub underline: bool,
    /// Superscript / subscript
    pub vertical_align: VerticalAlign,
    /// Font size in half-points, 0 when unset
    pub font_size: i32,
    /// Index into the highlight palette, 0 for none
    pub highlight: i32,
    /// Text color, `None` for automatic
    pub foreground: Option<Color>,
    /// Background color, `None` for automatic
    pub background: Option<Color>,
    /// Font, `None` when unset
    pub font: Option<Font>,

    /// Left indent in points
    pub left: i32,
    /// Right indent in points
    pub right: i32,
    /// First line indent in points
    pub first: i32,
    /// Space before in points
    pub before: i32,
    /// Space after in points
    pub after: i32,
    /// Paragraph alignment
    pub align: Alignment,
    /// Paragraph is part of a table (`\intbl`)
    pub in_table: bool,
}

impl FormattingOptions {
    /// Reset character properties (`\plain`).
    pub fn reset_character(&mut self) {
        self.bold = false;
        self.italic = false;
        self.underline = false;
        self.vertical_align = VerticalAlign::Normal;
        self.font_size = 0;
        self.highlight = 0;
        self.foreground = None;
        self.background = None;
        self.font = None;
    }

    /// Whether the character properties of both values are equal.
    pub fn same_character(&self, other: &FormattingOptions) -> bool {
        self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.vertical_align == other.vertical_align
            && self.font_size == other.font_size
            && self.highlight == other.highlight
            && self.foreground == other.foreground
            && self.background == other.background
            && self.font == other.font
    }

    /// Reset paragraph properties (`\pard`).
    pub fn reset_paragraph(&mut self) {
        self.left = 0;
        self.right = 0;
        self.first = 0;
        self.before = 0;
        self.after = 0;
        self.align = Alignment::Left;
        self.in_table = false;
    }
}

/// A text run with formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    /// Text content
    pub text: String,
    /// Formatting of the whole run
    pub formatting: FormattingOptions,
}

impl Run {
    /// Create a new run.
    #[inline]
    pub fn new(text: impl Into<String>, formatting: FormattingOptions) -> Self {
        Self {
            text: text.into(),
            formatting,
        }
    }

    /// Get the text content.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A paragraph: its runs and the formatting in effect at the paragraph mark.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Paragraph {
    /// Runs in source order
    pub runs: Vec<Run>,
    /// Formatting at the time the paragraph was emitted
    pub formatting: FormattingOptions,
}

impl Paragraph {
    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Get the runs in this paragraph.
    #[inline]
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Whether the paragraph has no text.
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }
}

/// Document element - either a paragraph or a table, in source order.
#[derive(Debug, Clone, Serialize)]
pub enum DocumentElement {
    /// A paragraph with formatted runs
    Paragraph(Paragraph),
    /// A table with rows and cells
    Table(super::table::Table),
}
