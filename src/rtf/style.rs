//! Style differ for HTML-flavored run markup.
//!
//! Runs are rendered as nested `<span style="...">` scopes. Each transition
//! closes as few scopes as possible and opens at most one new scope that
//! declares only what changed relative to the scope it nests in.

use super::types::{Color, FormattingOptions, Run, VerticalAlign};
use std::fmt::Write as FmtWrite;

/// The `\highlight` palette.
pub const HIGHLIGHT_PALETTE: [Option<Color>; 17] = [
    None,
    Some(Color::new(0, 0, 0)),
    Some(Color::new(0, 0, 255)),
    Some(Color::new(0, 255, 255)),
    Some(Color::new(0, 255, 0)),
    Some(Color::new(255, 0, 255)),
    Some(Color::new(255, 0, 0)),
    Some(Color::new(255, 255, 0)),
    None,
    Some(Color::new(0, 0, 128)),
    Some(Color::new(0, 128, 128)),
    Some(Color::new(0, 128, 0)),
    Some(Color::new(128, 0, 128)),
    Some(Color::new(128, 0, 0)),
    Some(Color::new(128, 128, 0)),
    Some(Color::new(128, 128, 128)),
    Some(Color::new(192, 192, 192)),
];

/// Font size in half-points assumed when none is set.
const DEFAULT_FONT_SIZE: i32 = 24;

/// Resolve a highlight palette index.
#[inline]
pub fn highlight_color(index: i32) -> Option<Color> {
    usize::try_from(index)
        .ok()
        .and_then(|i| HIGHLIGHT_PALETTE.get(i).copied().flatten())
}

/// Background actually painted behind a run: highlight wins over `\cb`.
#[inline]
fn effective_background(options: &FormattingOptions) -> Option<Color> {
    highlight_color(options.highlight).or(options.background)
}

/// Font size declaration for a run, scaled down for sub/superscript.
fn font_size_css(options: &FormattingOptions) -> String {
    let half_points = if options.font_size > 0 {
        options.font_size
    } else {
        DEFAULT_FONT_SIZE
    };
    let points = match options.vertical_align {
        VerticalAlign::Normal => f64::from(half_points) / 2.0,
        VerticalAlign::Sub | VerticalAlign::Super => f64::from(half_points) * 0.7 / 2.0,
    };
    let rounded = (points * 100.0).round() / 100.0;
    format!("font-size:{}pt;", rounded)
}

/// CSS declarations for the character properties that differ between
/// `from` and `to`.
pub fn css_declarations(from: &FormattingOptions, to: &FormattingOptions) -> String {
    let mut css = String::new();

    if from.bold != to.bold {
        css.push_str(if to.bold {
            "font-weight:bold;"
        } else {
            "font-weight:normal;"
        });
    }
    if from.italic != to.italic {
        css.push_str(if to.italic {
            "font-style:italic;"
        } else {
            "font-style:normal;"
        });
    }
    if from.underline != to.underline {
        css.push_str(if to.underline {
            "text-decoration:underline;"
        } else {
            "text-decoration:none;"
        });
    }
    if from.font != to.font {
        match &to.font {
            Some(font) => {
                let _ = write!(css, "font-family:'{}'", escape_css_string(&font.name));
                if let Some(generic) = font.family.css_generic() {
                    let _ = write!(css, ",{}", generic);
                }
                css.push(';');
            },
            None => css.push_str("font-family:initial;"),
        }
    }
    if from.vertical_align != to.vertical_align {
        css.push_str(match to.vertical_align {
            VerticalAlign::Normal => "vertical-align:baseline;",
            VerticalAlign::Sub => "vertical-align:sub;",
            VerticalAlign::Super => "vertical-align:super;",
        });
    }
    if from.font_size != to.font_size || from.vertical_align != to.vertical_align {
        css.push_str(&font_size_css(to));
    }
    if from.foreground != to.foreground {
        match to.foreground {
            Some(color) => {
                let _ = write!(css, "color:{};", color.to_hex());
            },
            None => css.push_str("color:initial;"),
        }
    }
    let (bg_from, bg_to) = (effective_background(from), effective_background(to));
    if bg_from != bg_to {
        match bg_to {
            Some(color) => {
                let _ = write!(css, "background-color:{};", color.to_hex());
            },
            None => css.push_str("background-color:transparent;"),
        }
    }

    css
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'").replace('"', "&quot;")
}

/// Append `text` to `out` with HTML escaping. Line breaks become `<br/>`.
pub fn escape_html(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("<br/>"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

/// Stateful differ producing nested span markup.
#[derive(Debug, Clone)]
pub struct StyleDiffer {
    /// Formatting of each open scope; the first entry is the base and is never closed
    scopes: Vec<FormattingOptions>,
}

impl Default for StyleDiffer {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleDiffer {
    /// Create a differ whose base scope has default formatting.
    pub fn new() -> Self {
        Self::with_base(FormattingOptions::default())
    }

    /// Create a differ relative to the given base formatting.
    pub fn with_base(base: FormattingOptions) -> Self {
        Self { scopes: vec![base] }
    }

    /// Number of open `<span>` scopes.
    #[inline]
    pub fn open_scopes(&self) -> usize {
        self.scopes.len() - 1
    }

    fn current(&self) -> &FormattingOptions {
        &self.scopes[self.scopes.len() - 1]
    }

    /// Emit the markup that moves from the current formatting to `next`.
    pub fn transition(&mut self, next: &FormattingOptions, out: &mut String) {
        if self.current().same_character(next) {
            return;
        }

        // Returning to a formatting that is already open only needs closes.
        if let Some(index) = self.scopes.iter().rposition(|s| s.same_character(next)) {
            self.close_to(index + 1, out);
            return;
        }

        // Sub/superscript also scales the font size, so leaving or switching
        // it unwinds to the innermost baseline scope.
        if self.current().vertical_align != next.vertical_align {
            let keep = self
                .scopes
                .iter()
                .rposition(|s| s.vertical_align == VerticalAlign::Normal)
                .map_or(1, |index| index + 1);
            self.close_to(keep, out);
        }

        let css = css_declarations(self.current(), next);
        if css.is_empty() {
            return;
        }
        out.push_str("<span style=\"");
        out.push_str(&css);
        out.push_str("\">");
        self.scopes.push(next.clone());
    }

    /// Close every open scope.
    pub fn close_all(&mut self, out: &mut String) {
        self.close_to(1, out);
    }

    fn close_to(&mut self, len: usize, out: &mut String) {
        while self.scopes.len() > len.max(1) {
            self.scopes.pop();
            out.push_str("</span>");
        }
    }

    /// Render a sequence of runs, closing all scopes at the end.
    pub fn render_runs(&mut self, runs: &[Run], out: &mut String) {
        for run in runs {
            if run.text.is_empty() {
                continue;
            }
            self.transition(&run.formatting, out);
            escape_html(&run.text, out);
        }
        self.close_all(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rtf::types::{Font, FontFamily};

    fn bold() -> FormattingOptions {
        FormattingOptions {
            bold: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_only_changed_properties_are_declared() {
        let from = bold();
        let to = FormattingOptions {
            bold: true,
            italic: true,
            ..Default::default()
        };
        assert_eq!(css_declarations(&from, &to), "font-style:italic;");
    }

    #[test]
    fn test_nested_scope_and_return() {
        let mut differ = StyleDiffer::new();
        let mut out = String::new();
        let bold_italic = FormattingOptions {
            italic: true,
            ..bold()
        };

        differ.transition(&bold(), &mut out);
        differ.transition(&bold_italic, &mut out);
        assert_eq!(differ.open_scopes(), 2);
        differ.transition(&bold(), &mut out);
        assert_eq!(differ.open_scopes(), 1);
        differ.transition(&FormattingOptions::default(), &mut out);

        assert_eq!(
            out,
            "<span style=\"font-weight:bold;\"><span style=\"font-style:italic;\"></span></span>"
        );
    }

    #[test]
    fn test_superscript_unwinds_to_baseline() {
        let mut differ = StyleDiffer::new();
        let mut out = String::new();
        let sized = FormattingOptions {
            font_size: 20,
            ..Default::default()
        };
        let sup = FormattingOptions {
            vertical_align: VerticalAlign::Super,
            ..sized.clone()
        };
        let sup_bold = FormattingOptions {
            bold: true,
            ..sup.clone()
        };
        let sub = FormattingOptions {
            vertical_align: VerticalAlign::Sub,
            ..sized.clone()
        };

        differ.transition(&sized, &mut out);
        differ.transition(&sup, &mut out);
        assert!(out.ends_with("<span style=\"vertical-align:super;font-size:7pt;\">"));
        differ.transition(&sup_bold, &mut out);
        assert_eq!(differ.open_scopes(), 3);

        out.clear();
        differ.transition(&sub, &mut out);
        // Both superscript scopes close before the subscript scope opens.
        assert_eq!(
            out,
            "</span></span><span style=\"vertical-align:sub;font-size:7pt;\">"
        );
        assert_eq!(differ.open_scopes(), 2);
    }

    #[test]
    fn test_structurally_equal_fonts_are_unchanged() {
        let font = || Font {
            family: FontFamily::SansSerif,
            name: "Arial".to_string(),
            pitch: 2,
            charset: 0,
        };
        let a = FormattingOptions {
            font: Some(font()),
            ..Default::default()
        };
        let b = FormattingOptions {
            font: Some(font()),
            ..Default::default()
        };
        let mut differ = StyleDiffer::new();
        let mut out = String::new();
        differ.transition(&a, &mut out);
        assert_eq!(out, "<span style=\"font-family:'Arial',sans-serif;\">");
        out.clear();
        differ.transition(&b, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_highlight_overrides_background() {
        let from = FormattingOptions {
            background: Some(Color::new(1, 1, 1)),
            ..Default::default()
        };
        let to = FormattingOptions {
            highlight: 7,
            ..from.clone()
        };
        assert_eq!(css_declarations(&from, &to), "background-color:#ffff00;");
        assert_eq!(highlight_color(8), None);
        assert_eq!(highlight_color(17), None);
    }

    #[test]
    fn test_render_runs_escapes_text() {
        let runs = vec![
            Run::new("a<b ", FormattingOptions::default()),
            Run::new("&c", bold()),
        ];
        let mut out = String::new();
        StyleDiffer::new().render_runs(&runs, &mut out);
        assert_eq!(
            out,
            "a&lt;b <span style=\"font-weight:bold;\">&amp;c</span>"
        );
    }
}
