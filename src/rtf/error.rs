//! Error types for RTF conversion.

use thiserror::Error;

/// Result type for RTF operations.
pub type RtfResult<T> = Result<T, RtfError>;

/// RTF conversion errors.
///
/// Unknown keywords and unknown destinations are never errors; they are
/// ignored or skipped by the parser.
#[derive(Error, Debug)]
pub enum RtfError {
    /// Error reading the underlying stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input ended in the middle of a control word or escape
    #[error("Unexpected end of input")]
    UnexpectedEof,

    /// A `\'` escape not followed by two hexadecimal digits
    #[error("Invalid hex escape: {0:?}")]
    InvalidHexEscape(String),

    /// Unbalanced braces (strict mode only)
    #[error("Unbalanced group: {unmatched_close} unmatched '}}', {unclosed} unclosed '{{'")]
    UnbalancedGroup {
        /// Number of `}` seen with an empty group stack
        unmatched_close: usize,
        /// Number of groups still open at end of input
        unclosed: usize,
    },

    /// A table without any cell definition
    #[error("Invalid table structure: no cell definitions")]
    NoCellDefinitions,

    /// A table row whose cell count differs from its cell definition count
    #[error(
        "Invalid table structure: row {row} has {cells} cells but {definitions} cell definitions"
    )]
    CellCountMismatch {
        /// Zero-based row index inside the table
        row: usize,
        /// Number of `\cell` marks in the row
        cells: usize,
        /// Number of `\cellx` definitions in the row
        definitions: usize,
    },
}

impl RtfError {
    /// Whether this error describes a violated structural invariant of the
    /// input, as opposed to an I/O failure.
    pub fn is_structural(&self) -> bool {
        !matches!(self, RtfError::Io(_))
    }
}
