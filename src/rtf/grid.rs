//! Table grid reconstruction.
//!
//! RTF rows are independent: every row lists its own right boundaries, rows
//! may be indented differently, and merged cells are flagged per row. To lay
//! the table out as one grid, the distinct boundaries of all rows become the
//! grid's column edges; each cell then spans the columns between its left and
//! right boundary, and vertical merges are resolved into row spans.

use super::border::CellBorders;
use super::error::{RtfError, RtfResult};
use super::options::ConvertOptions;
use super::table::{CellDef, CellVerticalAlign, Row, Table};
use super::types::Alignment;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as FmtWrite;

/// A reconstructed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    /// Column boundaries in twips, sorted and distinct
    pub boundaries: Vec<i32>,
    /// Column widths in pixels, one per column
    pub column_widths: Vec<i32>,
    /// One entry per table row
    pub rows: Vec<GridRow>,
}

impl Grid {
    /// Number of grid columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }
}

/// A reconstructed row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridRow {
    /// Columns left empty before the first cell (row indented past the table's left edge)
    pub indent: usize,
    /// Row height in pixels, 0 when automatic
    pub height: i32,
    /// Cells emitted for this row; cells covered by a row span are absent
    pub cells: Vec<GridCell>,
}

/// A reconstructed cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridCell {
    /// First grid column covered
    pub column: usize,
    /// Number of grid columns covered
    pub colspan: usize,
    /// Number of grid rows covered
    pub rowspan: usize,
    /// Width in pixels
    pub width: i32,
    /// Borders drawn for the whole span
    pub borders: CellBorders,
    /// Horizontal alignment
    pub align: Alignment,
    /// Vertical alignment
    pub v_align: CellVerticalAlign,
    /// Plain text content
    pub text: String,
    /// Content markup
    pub html: String,
}

/// Locate a boundary among the sorted grid boundaries.
#[inline]
fn column_of(boundaries: &[i32], x: i32) -> usize {
    boundaries.binary_search(&x).unwrap_or_else(|index| index)
}

/// Find the continuation of a vertical merge at `right` in `row`.
#[inline]
fn merged_def_at(row: &Row, right: i32) -> Option<&CellDef> {
    row.cell_defs
        .iter()
        .find(|def| def.right == right && def.merged && !def.first_merged)
}

impl Table {
    /// Reconstruct the table as a regular grid.
    ///
    /// Fails when a row's cell count differs from its cell definition count,
    /// or when the table has no cell definition at all.
    pub fn grid(&self, options: &ConvertOptions) -> RtfResult<Grid> {
        let rows = self.rows();

        for (index, row) in rows.iter().enumerate() {
            if row.cells.len() != row.cell_defs.len() {
                return Err(RtfError::CellCountMismatch {
                    row: index,
                    cells: row.cells.len(),
                    definitions: row.cell_defs.len(),
                });
            }
        }
        if rows.iter().all(|row| row.cell_defs.is_empty()) {
            return Err(RtfError::NoCellDefinitions);
        }

        let boundaries: Vec<i32> = rows
            .iter()
            .flat_map(|row| std::iter::once(row.left).chain(row.cell_defs.iter().map(|d| d.right)))
            .collect::<BTreeSet<i32>>()
            .into_iter()
            .collect();
        let column_widths: Vec<i32> = boundaries
            .windows(2)
            .map(|pair| options.twips_to_pixels(pair[1].saturating_sub(pair[0])))
            .collect();

        let mut grid_rows = Vec::with_capacity(rows.len());
        for (r, row) in rows.iter().enumerate() {
            let mut cells = Vec::with_capacity(row.cells.len());
            let defs = &row.cell_defs;
            let mut i = 0;

            while i < defs.len() {
                let def = &defs[i];
                if def.merged && !def.first_merged {
                    // Covered by a cell spanning from a row above.
                    i += 1;
                    continue;
                }

                // Fold horizontally merged continuation cells into this one.
                let mut last = i;
                let mut text = row.cells[i].text.clone();
                let mut html = row.cells[i].html.clone();
                if def.h_first_merged {
                    while last + 1 < defs.len()
                        && defs[last + 1].h_merged
                        && !defs[last + 1].h_first_merged
                    {
                        last += 1;
                        let absorbed = &row.cells[last];
                        if !absorbed.text.is_empty() {
                            text.push_str(&absorbed.text);
                            html.push_str(&absorbed.html);
                        }
                    }
                }

                let right = defs[last].right;
                let mut borders = def.borders;
                borders.right = defs[last].borders.right;

                let mut rowspan = 1;
                if def.first_merged {
                    for below in &rows[r + 1..] {
                        match merged_def_at(below, right) {
                            Some(continuation) => {
                                borders = borders.intersect(&continuation.borders);
                                rowspan += 1;
                            },
                            None => break,
                        }
                    }
                }

                let first_column = column_of(&boundaries, def.left);
                let last_column = column_of(&boundaries, right);
                let colspan = last_column.saturating_sub(first_column).max(1);
                let width = options.twips_to_pixels(right.saturating_sub(def.left));

                cells.push(GridCell {
                    column: first_column,
                    colspan,
                    rowspan,
                    width,
                    borders,
                    align: row.cells[i].align,
                    v_align: def.v_align,
                    text,
                    html,
                });
                i = last + 1;
            }

            grid_rows.push(GridRow {
                indent: column_of(&boundaries, row.left),
                height: options.twips_to_pixels(row.height.saturating_abs()),
                cells,
            });
        }

        tracing::debug!(
            rows = grid_rows.len(),
            columns = column_widths.len(),
            "table grid reconstructed"
        );

        Ok(Grid {
            boundaries,
            column_widths,
            rows: grid_rows,
        })
    }

    /// Render the table as an HTML `<table>`.
    pub fn to_html(&self, options: &ConvertOptions) -> RtfResult<String> {
        let grid = self.grid(options)?;
        Ok(grid.to_html(options))
    }
}

impl Grid {
    /// Render the grid as an HTML `<table>`.
    ///
    /// Column widths are declared once in a `<colgroup>`; every table row
    /// becomes exactly one `<tr>`.
    pub fn to_html(&self, options: &ConvertOptions) -> String {
        let indent = " ".repeat(options.html_indent);
        let mut out = String::with_capacity(256);

        out.push_str("<table style=\"border-collapse:collapse\">\n");
        let _ = writeln!(out, "{}<colgroup>", indent);
        for width in &self.column_widths {
            let _ = writeln!(out, "{0}{0}<col style=\"width:{1}px\"/>", indent, width);
        }
        let _ = writeln!(out, "{}</colgroup>", indent);

        for row in &self.rows {
            if row.height > 0 {
                let _ = writeln!(out, "{}<tr style=\"height:{}px\">", indent, row.height);
            } else {
                let _ = writeln!(out, "{}<tr>", indent);
            }

            if row.indent > 0 {
                let _ = writeln!(out, "{0}{0}<td colspan=\"{1}\"></td>", indent, row.indent);
            }

            for cell in &row.cells {
                let _ = write!(out, "{0}{0}<td", indent);
                if cell.colspan > 1 {
                    let _ = write!(out, " colspan=\"{}\"", cell.colspan);
                }
                if cell.rowspan > 1 {
                    let _ = write!(out, " rowspan=\"{}\"", cell.rowspan);
                }
                let _ = write!(
                    out,
                    " style=\"width:{}px;text-align:{};vertical-align:{};",
                    cell.width,
                    cell.align.as_css(),
                    cell.v_align.as_css()
                );
                cell.borders.write_css(&mut out);
                let _ = writeln!(out, "\">{}</td>", cell.html);
            }

            let _ = writeln!(out, "{}</tr>", indent);
        }

        out.push_str("</table>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::border::{BorderSide, BorderStyle};
    use crate::rtf::table::Cell;

    fn def(left: i32, right: i32) -> CellDef {
        CellDef {
            left,
            right,
            borders: CellBorders::all(BorderStyle::Single),
            ..Default::default()
        }
    }

    fn row(left: i32, defs: Vec<CellDef>) -> Row {
        Row {
            cells: defs
                .iter()
                .enumerate()
                .map(|(i, _)| Cell::new(format!("c{}", i)))
                .collect(),
            cell_defs: defs,
            left,
            height: 0,
        }
    }

    fn table(rows: Vec<Row>) -> Table {
        let mut table = Table::new();
        for row in rows {
            table.add_row(row);
        }
        table
    }

    #[test]
    fn test_uniform_grid() {
        let t = table(vec![
            row(0, vec![def(0, 1500), def(1500, 3000)]),
            row(0, vec![def(0, 1500), def(1500, 3000)]),
        ]);
        let options = ConvertOptions::default();
        let grid = t.grid(&options).unwrap();

        assert_eq!(grid.boundaries, vec![0, 1500, 3000]);
        assert_eq!(grid.column_widths, vec![100, 100]);
        for row in &grid.rows {
            assert_eq!(row.indent, 0);
            assert_eq!(row.cells.len(), 2);
            assert!(row.cells.iter().all(|c| c.colspan == 1 && c.rowspan == 1));
        }

        let html = t.to_html(&options).unwrap();
        assert_eq!(html.matches("<tr").count(), 2);
        assert!(!html.contains("colspan"));
        assert!(!html.contains("rowspan"));
    }

    #[test]
    fn test_colspan_from_other_rows_boundaries() {
        let t = table(vec![
            row(0, vec![def(0, 1000), def(1000, 2000), def(2000, 3000)]),
            row(0, vec![def(0, 2000), def(2000, 3000)]),
        ]);
        let grid = t.grid(&ConvertOptions::default()).unwrap();
        assert_eq!(grid.rows[1].cells[0].colspan, 2);
        assert_eq!(grid.rows[1].cells[1].column, 2);
        assert_eq!(grid.rows[1].cells[1].colspan, 1);
    }

    #[test]
    fn test_indented_row_gets_filler() {
        let t = table(vec![
            row(0, vec![def(0, 1000), def(1000, 2000)]),
            row(1000, vec![def(1000, 2000)]),
        ]);
        let options = ConvertOptions::default();
        let grid = t.grid(&options).unwrap();
        assert_eq!(grid.rows[1].indent, 1);
        assert_eq!(grid.rows[1].cells[0].column, 1);
        assert!(grid.to_html(&options).contains("<td colspan=\"1\"></td>"));
    }

    #[test]
    fn test_rowspan_resolution() {
        let mut first = def(0, 1000);
        first.first_merged = true;
        let mut cont = def(0, 1000);
        cont.merged = true;

        let t = table(vec![
            row(0, vec![first, def(1000, 2000)]),
            row(0, vec![cont, def(1000, 2000)]),
            row(0, vec![cont, def(1000, 2000)]),
            row(0, vec![def(0, 1000), def(1000, 2000)]),
        ]);
        let options = ConvertOptions::default();
        let grid = t.grid(&options).unwrap();

        assert_eq!(grid.rows[0].cells[0].rowspan, 3);
        assert_eq!(grid.rows[1].cells.len(), 1);
        assert_eq!(grid.rows[1].cells[0].column, 1);
        assert_eq!(grid.rows[2].cells.len(), 1);
        assert_eq!(grid.rows[3].cells.len(), 2);
        assert!(t.to_html(&options).unwrap().contains("rowspan=\"3\""));
    }

    #[test]
    fn test_rowspan_stops_at_unmerged_row() {
        let mut first = def(0, 1000);
        first.first_merged = true;
        let mut cont = def(0, 1000);
        cont.merged = true;

        let t = table(vec![
            row(0, vec![first]),
            row(0, vec![def(0, 1000)]),
            row(0, vec![cont]),
        ]);
        let grid = t.grid(&ConvertOptions::default()).unwrap();
        assert_eq!(grid.rows[0].cells[0].rowspan, 1);
    }

    #[test]
    fn test_border_intersection_across_span() {
        let mut first = def(0, 1000);
        first.first_merged = true;
        let mut cont = def(0, 1000);
        cont.merged = true;
        cont.borders.set(BorderSide::Right, BorderStyle::None);

        let t = table(vec![row(0, vec![first]), row(0, vec![cont])]);
        let cell = &t.grid(&ConvertOptions::default()).unwrap().rows[0].cells[0];
        assert_eq!(cell.rowspan, 2);
        assert!(!cell.borders.is_active(BorderSide::Right));
        assert!(cell.borders.is_active(BorderSide::Left));

        let html = t.to_html(&ConvertOptions::default()).unwrap();
        assert!(!html.contains("border-right"));
        assert!(html.contains("border-left"));
    }

    #[test]
    fn test_horizontal_merge() {
        let mut first = def(0, 1000);
        first.h_first_merged = true;
        let mut cont = def(1000, 2000);
        cont.h_merged = true;

        let t = table(vec![
            row(0, vec![first, cont, def(2000, 3000)]),
            row(0, vec![def(0, 1000), def(1000, 2000), def(2000, 3000)]),
        ]);
        let grid = t.grid(&ConvertOptions::default()).unwrap();
        assert_eq!(grid.rows[0].cells.len(), 2);
        assert_eq!(grid.rows[0].cells[0].colspan, 2);
        assert_eq!(grid.rows[0].cells[0].text, "c0c1");
        assert_eq!(grid.rows[0].cells[1].column, 2);
    }

    #[test]
    fn test_cell_count_mismatch() {
        let mut bad = row(0, vec![def(0, 1000), def(1000, 2000)]);
        bad.cells.pop();
        let t = table(vec![row(0, vec![def(0, 1000), def(1000, 2000)]), bad]);
        match t.grid(&ConvertOptions::default()) {
            Err(RtfError::CellCountMismatch {
                row,
                cells,
                definitions,
            }) => {
                assert_eq!((row, cells, definitions), (1, 1, 2));
            },
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_no_cell_definitions() {
        assert!(matches!(
            Table::new().grid(&ConvertOptions::default()),
            Err(RtfError::NoCellDefinitions)
        ));
    }
}
