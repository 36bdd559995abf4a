//! RTF document representation.

use super::error::RtfResult;
use super::info::DocumentInfo;
use super::options::ConvertOptions;
use super::parser::{ParsedDocument, Parser};
use super::state::Diagnostics;
use super::style::StyleDiffer;
use super::table::Table;
use super::types::{ColorTable, DocumentElement, FontTable, Paragraph, Run};
use serde::Serialize;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// RTF Document.
///
/// This is the main entry point for converting RTF documents. It holds the
/// document's paragraphs and tables in source order together with the
/// resource tables, page geometry and metadata read from the header.
#[derive(Debug, Clone, Serialize)]
pub struct RtfDocument {
    /// Document metadata from `\info`
    info: DocumentInfo,
    /// Paper width in twips
    page_width: i32,
    /// Left margin in twips
    left_margin: i32,
    /// Right margin in twips
    right_margin: i32,
    /// Paragraphs and tables
    elements: Vec<DocumentElement>,
    /// Color table
    color_table: ColorTable,
    /// Font table
    font_table: FontTable,
    /// Recovery events seen during a lenient conversion
    diagnostics: Diagnostics,
    /// Options the document was converted with
    #[serde(skip)]
    options: ConvertOptions,
}

impl RtfDocument {
    /// Parse an RTF document from a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use rtfdoc::rtf::RtfDocument;
    ///
    /// let rtf = r#"{\rtf1\ansi Hello World!\par}"#;
    /// let doc = RtfDocument::parse(rtf)?;
    /// assert_eq!(doc.text(), "Hello World!");
    /// # Ok::<(), rtfdoc::rtf::RtfError>(())
    /// ```
    pub fn parse(input: &str) -> RtfResult<Self> {
        Self::parse_with_options(input, ConvertOptions::default())
    }

    /// Parse an RTF document from a string with custom options.
    pub fn parse_with_options(input: &str, options: ConvertOptions) -> RtfResult<Self> {
        Self::from_bytes_with_options(input.as_bytes(), options)
    }

    /// Parse an RTF document from bytes.
    pub fn from_bytes(bytes: &[u8]) -> RtfResult<Self> {
        Self::from_bytes_with_options(bytes, ConvertOptions::default())
    }

    /// Parse an RTF document from bytes with custom options.
    pub fn from_bytes_with_options(bytes: &[u8], options: ConvertOptions) -> RtfResult<Self> {
        Self::convert(bytes, options)
    }

    /// Parse an RTF document from a reader.
    ///
    /// The reader is consumed in a single forward pass. I/O errors are
    /// returned unchanged as [`RtfError::Io`](super::RtfError::Io).
    pub fn from_reader<R: Read>(reader: R) -> RtfResult<Self> {
        Self::from_reader_with_options(reader, ConvertOptions::default())
    }

    /// Parse an RTF document from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(reader: R, options: ConvertOptions) -> RtfResult<Self> {
        Self::convert(BufReader::new(reader), options)
    }

    /// Open and parse an RTF file.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use rtfdoc::rtf::RtfDocument;
    ///
    /// let doc = RtfDocument::open("document.rtf")?;
    /// println!("{}", doc.text());
    /// # Ok::<(), rtfdoc::rtf::RtfError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> RtfResult<Self> {
        Self::open_with_options(path, ConvertOptions::default())
    }

    /// Open and parse an RTF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ConvertOptions) -> RtfResult<Self> {
        let file = File::open(path)?;
        Self::from_reader_with_options(file, options)
    }

    fn convert<R: std::io::BufRead>(reader: R, options: ConvertOptions) -> RtfResult<Self> {
        let parsed = Parser::new(reader, options.clone()).parse()?;
        Ok(Self::from_parsed(parsed, options))
    }

    fn from_parsed(parsed: ParsedDocument, options: ConvertOptions) -> Self {
        if parsed.diagnostics.is_degraded() {
            tracing::warn!(diagnostics = ?parsed.diagnostics, "document converted in degraded mode");
        }
        Self {
            info: parsed.info,
            page_width: parsed.page_width,
            left_margin: parsed.left_margin,
            right_margin: parsed.right_margin,
            elements: parsed.elements,
            color_table: parsed.color_table,
            font_table: parsed.font_table,
            diagnostics: parsed.diagnostics,
            options,
        }
    }

    /// Document title, empty when the document has none.
    pub fn title(&self) -> &str {
        self.info.title.as_deref().unwrap_or("")
    }

    /// Document metadata.
    #[inline]
    pub fn info(&self) -> &DocumentInfo {
        &self.info
    }

    /// Left margin in twips (`\margl`, default 1800).
    #[inline]
    pub fn left_margin(&self) -> i32 {
        self.left_margin
    }

    /// Right margin in twips (`\margr`, default 1800).
    #[inline]
    pub fn right_margin(&self) -> i32 {
        self.right_margin
    }

    /// Paper width in twips (`\paperw`, default 12240).
    #[inline]
    pub fn page_width(&self) -> i32 {
        self.page_width
    }

    /// All paragraphs and tables in source order.
    #[inline]
    pub fn elements(&self) -> &[DocumentElement] {
        &self.elements
    }

    /// Top-level paragraphs (outside tables).
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.elements.iter().filter_map(|element| match element {
            DocumentElement::Paragraph(paragraph) => Some(paragraph),
            DocumentElement::Table(_) => None,
        })
    }

    /// All runs of the top-level paragraphs.
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.paragraphs().flat_map(|paragraph| paragraph.runs.iter())
    }

    /// All tables.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.elements.iter().filter_map(|element| match element {
            DocumentElement::Table(table) => Some(table),
            DocumentElement::Paragraph(_) => None,
        })
    }

    /// Plain text of the document.
    ///
    /// Paragraphs are separated by newlines; table cells are separated by
    /// tabs and table rows by newlines.
    pub fn text(&self) -> String {
        let mut blocks: Vec<String> = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            match element {
                DocumentElement::Paragraph(paragraph) => blocks.push(paragraph.text()),
                DocumentElement::Table(table) => {
                    for row in table.rows() {
                        let cells: Vec<&str> = row.cells.iter().map(|cell| cell.text()).collect();
                        blocks.push(cells.join("\t"));
                    }
                },
            }
        }
        blocks.join("\n")
    }

    /// Get the color table.
    #[inline]
    pub fn color_table(&self) -> &ColorTable {
        &self.color_table
    }

    /// Get the font table.
    #[inline]
    pub fn font_table(&self) -> &FontTable {
        &self.font_table
    }

    /// Recovery events seen while converting.
    #[inline]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Whether the input needed lenient recovery (unbalanced braces or an
    /// unterminated table row).
    #[inline]
    pub fn is_degraded(&self) -> bool {
        self.diagnostics.is_degraded()
    }

    /// Render the document body as HTML.
    ///
    /// Paragraphs become `<p>` elements with their paragraph formatting as
    /// inline style and their runs as nested spans. Tables are rendered from
    /// their reconstructed grid, which fails for a table whose rows do not
    /// pair every cell with a cell definition.
    pub fn to_html(&self) -> RtfResult<String> {
        let mut out = String::with_capacity(1024);

        for element in &self.elements {
            match element {
                DocumentElement::Paragraph(paragraph) => {
                    write_paragraph_html(paragraph, &mut out);
                },
                DocumentElement::Table(table) => {
                    out.push_str(&table.to_html(&self.options)?);
                },
            }
            out.push('\n');
        }

        Ok(out)
    }
}

fn write_paragraph_html(paragraph: &Paragraph, out: &mut String) {
    let fmt = &paragraph.formatting;
    let mut style = String::new();
    if fmt.align != Default::default() {
        let _ = write!(style, "text-align:{};", fmt.align.as_css());
    }
    for (property, value) in [
        ("margin-left", fmt.left),
        ("margin-right", fmt.right),
        ("text-indent", fmt.first),
        ("margin-top", fmt.before),
        ("margin-bottom", fmt.after),
    ] {
        if value != 0 {
            let _ = write!(style, "{}:{}pt;", property, value);
        }
    }

    if style.is_empty() {
        out.push_str("<p>");
    } else {
        let _ = write!(out, "<p style=\"{}\">", style);
    }
    StyleDiffer::new().render_runs(&paragraph.runs, out);
    out.push_str("</p>");
}
