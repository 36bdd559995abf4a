//! End-to-end conversion tests.

use super::*;
use proptest::prelude::*;

fn parse(input: &str) -> RtfDocument {
    RtfDocument::parse(input).unwrap()
}

fn only_paragraph(doc: &RtfDocument) -> &Paragraph {
    let paragraphs: Vec<&Paragraph> = doc.paragraphs().collect();
    assert_eq!(paragraphs.len(), 1, "expected exactly one paragraph");
    paragraphs[0]
}

#[test]
fn test_bold_toggle_splits_runs() {
    let doc = parse("\\b Hello \\b0 World\\par");
    let paragraph = only_paragraph(&doc);

    assert_eq!(paragraph.runs.len(), 2);
    assert_eq!(paragraph.runs[0].text, "Hello ");
    assert!(paragraph.runs[0].formatting.bold);
    assert_eq!(paragraph.runs[1].text, "World");
    assert!(!paragraph.runs[1].formatting.bold);
}

#[test]
fn test_color_table_foreground() {
    let doc = parse("{\\colortbl;\\red255\\green0\\blue0;}\\cf1 red text\\par");
    let paragraph = only_paragraph(&doc);

    assert_eq!(paragraph.runs.len(), 1);
    assert_eq!(paragraph.runs[0].text, "red text");
    assert_eq!(paragraph.runs[0].formatting.foreground, Some(Color::new(255, 0, 0)));
}

#[test]
fn test_color_table_indexing() {
    let doc = parse("{\\rtf1{\\colortbl;\\red255\\green0\\blue0;\\red0\\green255\\blue0;}}");
    let colors = doc.color_table();
    assert_eq!(colors.get(0), None);
    assert_eq!(colors.get(1), Some(Color::new(255, 0, 0)));
    assert_eq!(colors.get(2), Some(Color::new(0, 255, 0)));
}

#[test]
fn test_escaped_braces_and_backslash() {
    let doc = parse("{\\rtf1 \\{\\}\\\\\\par}");
    assert_eq!(doc.text(), "{}\\");
}

#[test]
fn test_hex_escape_substitutions() {
    let doc = parse("{\\rtf1 \\'95 item\\'85 caf\\'e9\\par}");
    assert_eq!(doc.text(), "\u{2022} item\u{2026} caf\u{e9}");
}

#[test]
fn test_fonts_resolve_from_font_table() {
    let doc = parse(
        "{\\rtf1{\\fonttbl{\\f0\\froman Times New Roman;}{\\f1\\fmodern Courier New;}}\
         \\f0 serif {\\f1 mono}\\par}",
    );
    let paragraph = only_paragraph(&doc);
    let first = paragraph.runs[0].formatting.font.as_ref().unwrap();
    let second = paragraph.runs[1].formatting.font.as_ref().unwrap();
    assert_eq!(first.family, FontFamily::Serif);
    assert_eq!(second.name, "Courier New");
    assert_eq!(doc.font_table().len(), 2);
}

#[test]
fn test_plain_and_pard_are_partial_resets() {
    let doc = parse("{\\rtf1\\qr\\b\\i x\\plain y\\par\\pard z\\par}");
    let paragraphs: Vec<&Paragraph> = doc.paragraphs().collect();

    let y = &paragraphs[0].runs[1];
    assert_eq!(y.text, "y");
    assert!(!y.formatting.bold && !y.formatting.italic);
    assert_eq!(y.formatting.align, Alignment::Right);

    assert_eq!(paragraphs[1].formatting.align, Alignment::Left);
}

#[test]
fn test_uniform_table_html() {
    let doc = parse(
        "{\\rtf1\\trowd\\cellx1500\\cellx3000\
         \\intbl a\\cell b\\cell\\row\
         \\trowd\\cellx1500\\cellx3000\
         \\intbl c\\cell d\\cell\\row\\pard}",
    );
    let html = doc.to_html().unwrap();

    assert_eq!(html.matches("<tr").count(), 2);
    assert!(!html.contains("colspan"));
    assert!(!html.contains("rowspan"));
    assert!(html.contains("<col style=\"width:100px\"/>"));
}

#[test]
fn test_vertical_merge_from_rtf() {
    let doc = parse(
        "{\\rtf1\
         \\trowd\\clvmgf\\clbrdrl\\brdrs\\clbrdrr\\brdrs\\cellx2000\\cellx4000\
         \\intbl tall\\cell r1\\cell\\row\
         \\trowd\\clvmrg\\clbrdrl\\brdrs\\cellx2000\\cellx4000\
         \\intbl\\cell r2\\cell\\row\
         \\trowd\\clvmrg\\clbrdrl\\brdrs\\clbrdrr\\brdrs\\cellx2000\\cellx4000\
         \\intbl\\cell r3\\cell\\row\
         \\pard after\\par}",
    );
    let table = doc.tables().next().unwrap();
    let grid = table.grid(&ConvertOptions::default()).unwrap();

    let tall = &grid.rows[0].cells[0];
    assert_eq!(tall.text, "tall");
    assert_eq!(tall.rowspan, 3);
    // Row 2 has no right border on the merged cell.
    assert!(tall.borders.left.is_visible());
    assert!(!tall.borders.right.is_visible());

    assert_eq!(grid.rows[1].cells.len(), 1);
    assert_eq!(grid.rows[1].cells[0].text, "r2");
    assert_eq!(grid.rows[2].cells.len(), 1);

    let html = table.to_html(&ConvertOptions::default()).unwrap();
    assert_eq!(html.matches("rowspan=\"3\"").count(), 1);
}

#[test]
fn test_horizontal_merge_and_indented_row() {
    let doc = parse(
        "{\\rtf1\
         \\trowd\\clmgf\\cellx1000\\clmrg\\cellx2000\\cellx3000\
         \\intbl wide\\cell\\cell end\\cell\\row\
         \\trowd\\trleft1000\\cellx2000\\cellx3000\
         \\intbl x\\cell y\\cell\\row}",
    );
    let grid = doc
        .tables()
        .next()
        .unwrap()
        .grid(&ConvertOptions::default())
        .unwrap();

    assert_eq!(grid.boundaries, vec![0, 1000, 2000, 3000]);
    assert_eq!(grid.rows[0].cells[0].colspan, 2);
    assert_eq!(grid.rows[0].cells[0].text, "wide");
    assert_eq!(grid.rows[1].indent, 1);
    assert_eq!(grid.rows[1].cells[0].column, 1);
}

#[test]
fn test_table_between_paragraphs() {
    let doc = parse(
        "{\\rtf1 before\\par\\trowd\\cellx1000\\intbl cell\\cell\\row\\pard after\\par}",
    );
    let kinds: Vec<&str> = doc
        .elements()
        .iter()
        .map(|element| match element {
            DocumentElement::Paragraph(_) => "p",
            DocumentElement::Table(_) => "table",
        })
        .collect();
    assert_eq!(kinds, vec!["p", "table", "p"]);
}

#[test]
fn test_extreme_cell_boundaries_saturate() {
    let doc = parse(
        "{\\rtf1\\trowd\\trleft-2000000000\\cellx2000000000\\intbl a\\cell\\row\\pard x\\par}",
    );
    let grid = doc
        .tables()
        .next()
        .unwrap()
        .grid(&ConvertOptions::default())
        .unwrap();

    let cell = &grid.rows[0].cells[0];
    assert_eq!(cell.text, "a");
    assert!(cell.width > 0);
    assert!(doc.to_html().is_ok());
}

#[test]
fn test_section_break_and_background_color() {
    let doc = parse("{\\rtf1{\\colortbl;\\red0\\green0\\blue255;}\\cb1 a\\sect b\\par}");
    let paragraphs: Vec<&Paragraph> = doc.paragraphs().collect();

    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0].text(), "a");
    assert_eq!(paragraphs[1].text(), "b");
    for paragraph in paragraphs {
        assert_eq!(paragraph.runs[0].formatting.background, Some(Color::new(0, 0, 255)));
    }
}

#[test]
fn test_cell_count_mismatch_is_reported() {
    let doc = parse("{\\rtf1\\trowd\\cellx1000\\cellx2000\\intbl only\\cell\\row\\pard x\\par}");
    let err = doc.to_html().unwrap_err();
    assert!(matches!(
        err,
        RtfError::CellCountMismatch {
            row: 0,
            cells: 1,
            definitions: 2
        }
    ));
    assert!(err.is_structural());
}

#[test]
fn test_degraded_mode_is_flagged() {
    let doc = parse("{\\rtf1 a}} b\\par");
    assert!(doc.is_degraded());
    assert_eq!(doc.diagnostics().unmatched_close, 1);
    assert_eq!(doc.text(), "a b");

    let doc = parse("{\\rtf1 {\\b open");
    assert_eq!(doc.diagnostics().unclosed_groups, 2);
    assert_eq!(doc.text(), "open");

    let doc = parse("{\\rtf1\\trowd\\cellx1000\\intbl a\\cell}");
    assert_eq!(doc.diagnostics().unterminated_rows, 1);
    assert_eq!(doc.tables().count(), 1);
}

#[test]
fn test_strict_mode_rejects_unbalanced_groups() {
    let strict = ConvertOptions::new().with_strict(true);

    let err = RtfDocument::parse_with_options("{\\rtf1 a}}", strict.clone()).unwrap_err();
    assert!(matches!(
        err,
        RtfError::UnbalancedGroup {
            unmatched_close: 1,
            unclosed: 0
        }
    ));

    let err = RtfDocument::parse_with_options("{\\rtf1 a", strict.clone()).unwrap_err();
    assert!(matches!(err, RtfError::UnbalancedGroup { unclosed: 1, .. }));

    assert!(RtfDocument::parse_with_options("{\\rtf1 a}", strict).is_ok());
}

#[test]
fn test_unknown_keywords_are_ignored() {
    let doc = parse("{\\rtf1\\ansi\\deff0\\viewkind4\\uc1\\lang1033\\noproof text\\par}");
    assert_eq!(doc.text(), "text");
    assert!(!doc.is_degraded());
}

#[test]
fn test_open_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{\\rtf1 From disk\\par}").unwrap();
    file.flush().unwrap();

    let doc = RtfDocument::open(file.path()).unwrap();
    assert_eq!(doc.text(), "From disk");
}

#[test]
fn test_unexpected_eof_after_backslash() {
    let err = RtfDocument::parse("{\\rtf1 text\\").unwrap_err();
    assert!(matches!(err, RtfError::UnexpectedEof));
}

#[test]
fn test_serialized_shape() {
    let doc = parse("{\\rtf1{\\info{\\title T}}\\b x\\par}");
    let value = serde_json::to_value(&doc).unwrap();

    assert_eq!(value["info"]["title"], "T");
    assert_eq!(value["page_width"], 12240);
    let run = &value["elements"][0]["Paragraph"]["runs"][0];
    assert_eq!(run["text"], "x");
    assert_eq!(run["formatting"]["bold"], true);
    assert_eq!(value["diagnostics"]["unmatched_close"], 0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_balanced_groups_restore_formatting(depth in 1usize..12, size in 1i32..200) {
        let mut input = String::from("{\\rtf1 a");
        for _ in 0..depth {
            input.push_str("{\\b\\i ");
            input.push_str(&format!("\\fs{} x", size));
        }
        for _ in 0..depth {
            input.push('}');
        }
        input.push_str("z\\par}");

        let doc = RtfDocument::parse(&input).unwrap();
        prop_assert!(!doc.is_degraded());

        let paragraph = doc.paragraphs().next().unwrap();
        let first = &paragraph.runs.first().unwrap().formatting;
        let last = &paragraph.runs.last().unwrap().formatting;
        prop_assert_eq!(first, last);
        prop_assert!(!last.bold);
        prop_assert_eq!(last.font_size, 0);
    }

    #[test]
    fn prop_font_size_parameter(size in 0i32..10_000) {
        let doc = RtfDocument::parse(&format!("\\fs{} x\\par", size)).unwrap();
        let run = doc.runs().next().unwrap();
        prop_assert_eq!(run.formatting.font_size, size);
    }

    #[test]
    fn prop_plain_text_survives(text in "[a-zA-Z0-9 .,;:!?]{1,40}") {
        let doc = RtfDocument::parse(&format!("{{\\rtf1 {}\\par}}", text)).unwrap();
        prop_assert_eq!(doc.text(), text);
    }
}
