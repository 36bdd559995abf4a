//! rtfdoc - Streaming RTF to structured document conversion
//!
//! This library converts RTF (Rich Text Format) input into an ordered list
//! of styled paragraphs and tables, and renders the result as HTML.
//!
//! # Features
//!
//! - **Single pass**: The input is read once from any `std::io::Read`
//! - **Formatting state**: Character and paragraph formatting with group
//!   save/restore, color and font tables, Unicode escapes
//! - **Table reconstruction**: RTF rows and cell definitions become a regular
//!   grid with column spans, row spans and intersected borders
//! - **Lenient by default**: Unbalanced braces are recovered from and reported
//!   through [`rtf::Diagnostics`]; strict mode turns them into errors
//!
//! # Example - Reading an RTF document
//!
//! ```rust
//! use rtfdoc::rtf::RtfDocument;
//!
//! let rtf = r#"{\rtf1\ansi{\colortbl;\red255\green0\blue0;}\b Hello \b0 {\cf1 World}\par}"#;
//! let doc = RtfDocument::parse(rtf)?;
//!
//! for paragraph in doc.paragraphs() {
//!     for run in paragraph.runs() {
//!         println!("{:?}: bold={}", run.text(), run.formatting.bold);
//!     }
//! }
//! # Ok::<(), rtfdoc::rtf::RtfError>(())
//! ```
//!
//! # Example - Rendering tables
//!
//! ```rust
//! use rtfdoc::rtf::{ConvertOptions, RtfDocument};
//!
//! let rtf = r#"{\rtf1\trowd\cellx1500\cellx3000\intbl A\cell B\cell\row\pard}"#;
//! let doc = RtfDocument::parse(rtf)?;
//!
//! let table = doc.tables().next().expect("one table");
//! let grid = table.grid(&ConvertOptions::default())?;
//! assert_eq!(grid.column_count(), 2);
//! println!("{}", doc.to_html()?);
//! # Ok::<(), rtfdoc::rtf::RtfError>(())
//! ```

/// RTF conversion
pub mod rtf;
