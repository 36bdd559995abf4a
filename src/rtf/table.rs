//! RTF table support.
//!
//! RTF has no table object. A table is a run of paragraphs marked `\intbl`,
//! split into cells by `\cell` and into rows by `\row`. Each row carries its
//! own cell definitions (`\cellx` right boundaries plus merge, border and
//! alignment flags) introduced by `\trowd`. The builder collects rows in that
//! form; [`Table::grid`](super::grid) turns them into a regular grid.

use super::border::{BorderSide, CellBorders};
use super::types::Alignment;
use serde::Serialize;
use smallvec::SmallVec;

/// Vertical alignment of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CellVerticalAlign {
    /// `\clvertalt`
    #[default]
    Top,
    /// `\clvertalc`
    Center,
    /// `\clvertalb`
    Bottom,
}

impl CellVerticalAlign {
    /// CSS `vertical-align` value.
    pub fn as_css(self) -> &'static str {
        match self {
            CellVerticalAlign::Top => "top",
            CellVerticalAlign::Center => "middle",
            CellVerticalAlign::Bottom => "bottom",
        }
    }
}

/// Definition of one cell of a row (`\cellx` and the flags before it).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CellDef {
    /// Right boundary in twips
    pub right: i32,
    /// Left boundary in twips: the previous cell's right, or the row's left
    pub left: i32,
    /// Continuation of a vertical merge (`\clvmrg`)
    pub merged: bool,
    /// First cell of a vertical merge (`\clvmgf`)
    pub first_merged: bool,
    /// Continuation of a horizontal merge (`\clmrg`)
    pub h_merged: bool,
    /// First cell of a horizontal merge (`\clmgf`)
    pub h_first_merged: bool,
    /// Cell borders
    pub borders: CellBorders,
    /// Edge that subsequent `\brdr*` keywords apply to
    #[serde(skip)]
    pub active_border: Option<BorderSide>,
    /// Vertical alignment
    pub v_align: CellVerticalAlign,
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Cell {
    /// Plain text content
    pub text: String,
    /// Content as HTML span markup
    pub html: String,
    /// Paragraph alignment in effect at `\cell`
    pub align: Alignment,
}

impl Cell {
    /// Create a cell with plain text only.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut html = String::with_capacity(text.len());
        super::style::escape_html(&text, &mut html);
        Self {
            text,
            html,
            align: Alignment::Left,
        }
    }

    /// Get the cell text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the cell markup.
    #[inline]
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Row {
    /// Cells in source order
    pub cells: Vec<Cell>,
    /// Cell definitions, one per cell
    pub cell_defs: Vec<CellDef>,
    /// Left edge of the row in twips
    pub left: i32,
    /// Row height in twips (`\trrh`, negative for an exact height)
    pub height: i32,
}

impl Row {
    /// Get the number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Get all cells.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// A table in an RTF document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Table {
    /// Table rows
    rows: Vec<Row>,
}

impl Table {
    /// Create a new table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get all rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Collects cell definitions and cells into rows while the document is in
/// table mode.
#[derive(Debug, Default)]
pub(crate) struct TableBuilder {
    /// Table being built, present while table mode is open
    table: Option<Table>,
    /// Flags collected for the next `\cellx`
    pending_def: CellDef,
    /// Definitions of the current row
    defs: SmallVec<[CellDef; 8]>,
    /// Cells of the current row
    cells: Vec<Cell>,
    /// `\trleft` of the current row, if given
    left: Option<i32>,
    /// `\trrh` of the current row, if given
    height: Option<i32>,
    /// Resolved values of the last closed row
    previous_left: Option<i32>,
    previous_height: Option<i32>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a table is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.table.is_some()
    }

    /// Start a new row definition (`\trowd`).
    pub fn reset_row_definition(&mut self) {
        self.table.get_or_insert_with(Table::new);
        self.defs.clear();
        self.pending_def = CellDef::default();
        self.left = None;
        self.height = None;
    }

    /// Set the row's left edge (`\trleft`).
    #[inline]
    pub fn set_left(&mut self, left: i32) {
        self.left = Some(left);
    }

    /// Set the row's height (`\trrh`).
    #[inline]
    pub fn set_height(&mut self, height: i32) {
        self.height = Some(height);
    }

    /// Flags of the cell definition currently being described.
    #[inline]
    pub fn pending_def_mut(&mut self) -> &mut CellDef {
        &mut self.pending_def
    }

    /// Close the pending cell definition at a right boundary (`\cellx`).
    pub fn define_cell(&mut self, right: i32) {
        self.table.get_or_insert_with(Table::new);
        let mut def = std::mem::take(&mut self.pending_def);
        def.right = right;
        def.active_border = None;
        self.defs.push(def);
    }

    /// Append a finished cell (`\cell`).
    pub fn add_cell(&mut self, cell: Cell) {
        self.table.get_or_insert_with(Table::new);
        self.cells.push(cell);
    }

    /// Close the current row (`\row`).
    ///
    /// Row left and height fall back to the previous row's values when the
    /// row does not set them. Cell definitions stay in effect for following
    /// rows until the next `\trowd`.
    pub fn end_row(&mut self) {
        if self.cells.is_empty() && self.defs.is_empty() {
            return;
        }

        let left = self.left.or(self.previous_left).unwrap_or(0);
        let height = self.height.or(self.previous_height).unwrap_or(0);
        self.previous_left = Some(left);
        self.previous_height = Some(height);

        let mut cell_defs: Vec<CellDef> = self.defs.to_vec();
        let mut edge = left;
        for def in &mut cell_defs {
            def.left = edge;
            edge = def.right;
        }

        let row = Row {
            cells: std::mem::take(&mut self.cells),
            cell_defs,
            left,
            height,
        };
        tracing::trace!(cells = row.cells.len(), left, "table row closed");
        self.table.get_or_insert_with(Table::new).add_row(row);
    }

    /// Close table mode and return the collected table, if it has rows.
    ///
    /// Cells collected after the last `\row` are closed into a final row;
    /// the returned flag reports that this happened.
    pub fn finish(&mut self) -> (Option<Table>, bool) {
        let unterminated = !self.cells.is_empty();
        if unterminated {
            self.end_row();
        }
        self.defs.clear();
        self.pending_def = CellDef::default();
        self.left = None;
        self.height = None;
        self.previous_left = None;
        self.previous_height = None;
        (self.table.take().filter(|t| !t.is_empty()), unterminated)
    }
}
