//! RTF (Rich Text Format) conversion module.
//!
//! This module converts RTF documents into structured paragraphs and tables
//! in a single streaming pass, and renders them as HTML.
//!
//! # Architecture
//!
//! The converter is organized into several components:
//! - **Lexer**: Reads control words and control symbols on demand, and skips
//!   uninterpreted destinations
//! - **Parser**: Tracks nested group state and formatting, reads the color,
//!   font and info destinations, and emits runs, paragraphs and table rows
//! - **Grid**: Reconstructs a regular grid with column and row spans from
//!   RTF's per-row cell definitions
//! - **Style differ**: Turns formatting changes into minimal nested span markup
//! - **Document**: High-level document representation with paragraphs, runs,
//!   tables and metadata
//!
//! # Example
//!
//! ```rust
//! use rtfdoc::rtf::RtfDocument;
//!
//! let rtf_text = r#"{\rtf1\ansi{\fonttbl\f0\fswiss Helvetica;}\f0\pard Hello World!\par}"#;
//! let doc = RtfDocument::parse(rtf_text)?;
//! assert_eq!(doc.text(), "Hello World!");
//! # Ok::<(), rtfdoc::rtf::RtfError>(())
//! ```

mod border;
mod document;
mod error;
mod grid;
mod info;
mod keyword;
mod lexer;
mod options;
mod parser;
mod resources;
mod source;
mod state;
mod style;
mod table;
mod types;

#[cfg(test)]
mod tests;

// Re-exports
pub use border::{BorderSide, BorderStyle, CellBorders};
pub use document::RtfDocument;
pub use error::{RtfError, RtfResult};
pub use grid::{Grid, GridCell, GridRow};
pub use info::DocumentInfo;
pub use keyword::Keyword;
pub use lexer::{NO_PARAMETER, Token, decode_escaped_byte};
pub use options::ConvertOptions;
pub use state::Diagnostics;
pub use style::{HIGHLIGHT_PALETTE, StyleDiffer, css_declarations, escape_html, highlight_color};
pub use table::{Cell, CellDef, CellVerticalAlign, Row, Table};
pub use types::{
    Alignment, Color, ColorTable, DocumentElement, Font, FontFamily, FontTable,
    FormattingOptions, Paragraph, Run, VerticalAlign, twips_to_points,
};
