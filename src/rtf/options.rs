/// Configuration for RTF conversion and HTML rendering.
///
/// # Examples
///
/// ```rust
/// use rtfdoc::rtf::ConvertOptions;
///
/// // Create with defaults
/// let options = ConvertOptions::default();
/// assert!(!options.strict);
///
/// // Or customize
/// let options = ConvertOptions::new()
///     .with_strict(true)
///     .with_twips_per_pixel(20)
///     .with_html_indent(4);
/// assert_eq!(options.twips_per_pixel, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Fail on unbalanced braces instead of recovering.
    ///
    /// In lenient mode an unmatched `}` is ignored and unclosed groups are
    /// closed at end of input; both are reported through
    /// [`Diagnostics`](super::Diagnostics).
    pub strict: bool,
    /// Divisor turning twips into pixel widths in HTML tables
    pub twips_per_pixel: i32,
    /// Indentation of nested HTML table markup (spaces)
    pub html_indent: usize,
    /// Whether a `\par` with no text produces an empty paragraph
    pub emit_empty_paragraphs: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            strict: false,
            twips_per_pixel: 15,
            html_indent: 2,
            emit_empty_paragraphs: true,
        }
    }
}

impl ConvertOptions {
    /// Create options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict brace checking.
    #[inline]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the twips-to-pixel divisor used for table widths. Values below 1
    /// are treated as 1.
    #[inline]
    pub fn with_twips_per_pixel(mut self, twips: i32) -> Self {
        self.twips_per_pixel = twips.max(1);
        self
    }

    /// Set the HTML indentation width.
    #[inline]
    pub fn with_html_indent(mut self, spaces: usize) -> Self {
        self.html_indent = spaces;
        self
    }

    /// Set whether empty paragraphs are kept.
    #[inline]
    pub fn with_empty_paragraphs(mut self, emit: bool) -> Self {
        self.emit_empty_paragraphs = emit;
        self
    }

    /// Convert a length in twips to pixels.
    #[inline]
    pub(crate) fn twips_to_pixels(&self, twips: i32) -> i32 {
        twips / self.twips_per_pixel.max(1)
    }
}
