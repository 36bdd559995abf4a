//! Fixed RTF keyword table.
//!
//! Only the subset of control words the converter consumes is listed here.
//! Anything else lexes as [`Token::Unknown`](super::lexer::Token::Unknown)
//! and is ignored by the parser.

use phf::phf_map;

/// Recognized RTF control words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Document
    Rtf,
    Ansi,
    DefaultFont,
    PaperWidth,
    MarginLeft,
    MarginRight,

    // Character formatting
    Bold,
    Italic,
    Underline,
    UnderlineNone,
    Superscript,
    Subscript,
    NoSuperSub,
    FontSize,
    Foreground,
    Background,
    Highlight,
    Font,
    Plain,

    // Paragraph formatting
    Pard,
    Par,
    Sect,
    LeftAlign,
    RightAlign,
    Center,
    Justify,
    FirstIndent,
    LeftIndent,
    RightIndent,
    SpaceBefore,
    SpaceAfter,

    // Tables
    RowDefaults,
    Row,
    Cell,
    CellX,
    InTable,
    RowLeft,
    RowHeight,
    CellMergeFirst,
    CellMerge,
    CellVMergeFirst,
    CellVMerge,
    CellBorderTop,
    CellBorderBottom,
    CellBorderLeft,
    CellBorderRight,
    BorderNone,
    BorderSingle,
    BorderThick,
    BorderDouble,
    BorderDotted,
    BorderDashed,
    CellVAlignTop,
    CellVAlignCenter,
    CellVAlignBottom,

    // Color and font tables
    ColorTable,
    Red,
    Green,
    Blue,
    FontTable,
    FontNil,
    FontRoman,
    FontSwiss,
    FontModern,
    FontScript,
    FontDecor,
    FontTech,
    FontPitch,
    FontCharset,

    // Document information
    Info,
    Title,
    Subject,
    Author,
    Keywords,
    Comment,
    Operator,
    Company,

    // Special characters
    Tab,
    Line,
    Bullet,
    EmDash,
    EnDash,
    EmSpace,
    EnSpace,
    LeftQuote,
    RightQuote,
    LeftDoubleQuote,
    RightDoubleQuote,
    Unicode,
    UnicodeSkip,

    // Binary data
    Bin,

    // Destinations skipped as opaque groups
    SkipDestination,
}

impl Keyword {
    /// Look up a control word name.
    #[inline]
    pub fn lookup(name: &str) -> Option<Keyword> {
        KEYWORDS.get(name).copied()
    }

    /// Whether this keyword opens a destination whose content is discarded.
    #[inline]
    pub fn is_skipped_destination(self) -> bool {
        matches!(self, Keyword::SkipDestination)
    }

    /// Whether this keyword is a boolean toggle where an absent parameter
    /// means "on" and `0` means "off".
    #[inline]
    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            Keyword::Bold
                | Keyword::Italic
                | Keyword::Underline
                | Keyword::Superscript
                | Keyword::Subscript
        )
    }
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "rtf" => Keyword::Rtf,
    "ansi" => Keyword::Ansi,
    "deff" => Keyword::DefaultFont,
    "paperw" => Keyword::PaperWidth,
    "margl" => Keyword::MarginLeft,
    "margr" => Keyword::MarginRight,

    "b" => Keyword::Bold,
    "i" => Keyword::Italic,
    "ul" => Keyword::Underline,
    "ulnone" => Keyword::UnderlineNone,
    "super" => Keyword::Superscript,
    "sub" => Keyword::Subscript,
    "nosupersub" => Keyword::NoSuperSub,
    "fs" => Keyword::FontSize,
    "cf" => Keyword::Foreground,
    "cb" => Keyword::Background,
    "highlight" => Keyword::Highlight,
    "f" => Keyword::Font,
    "plain" => Keyword::Plain,

    "pard" => Keyword::Pard,
    "par" => Keyword::Par,
    "sect" => Keyword::Sect,
    "ql" => Keyword::LeftAlign,
    "qr" => Keyword::RightAlign,
    "qc" => Keyword::Center,
    "qj" => Keyword::Justify,
    "fi" => Keyword::FirstIndent,
    "li" => Keyword::LeftIndent,
    "ri" => Keyword::RightIndent,
    "sb" => Keyword::SpaceBefore,
    "sa" => Keyword::SpaceAfter,

    "trowd" => Keyword::RowDefaults,
    "row" => Keyword::Row,
    "cell" => Keyword::Cell,
    "cellx" => Keyword::CellX,
    "intbl" => Keyword::InTable,
    "trleft" => Keyword::RowLeft,
    "trrh" => Keyword::RowHeight,
    "clmgf" => Keyword::CellMergeFirst,
    "clmrg" => Keyword::CellMerge,
    "clvmgf" => Keyword::CellVMergeFirst,
    "clvmrg" => Keyword::CellVMerge,
    "clbrdrt" => Keyword::CellBorderTop,
    "clbrdrb" => Keyword::CellBorderBottom,
    "clbrdrl" => Keyword::CellBorderLeft,
    "clbrdrr" => Keyword::CellBorderRight,
    "brdrnone" => Keyword::BorderNone,
    "brdrs" => Keyword::BorderSingle,
    "brdrth" => Keyword::BorderThick,
    "brdrdb" => Keyword::BorderDouble,
    "brdrdot" => Keyword::BorderDotted,
    "brdrdash" => Keyword::BorderDashed,
    "clvertalt" => Keyword::CellVAlignTop,
    "clvertalc" => Keyword::CellVAlignCenter,
    "clvertalb" => Keyword::CellVAlignBottom,

    "colortbl" => Keyword::ColorTable,
    "red" => Keyword::Red,
    "green" => Keyword::Green,
    "blue" => Keyword::Blue,
    "fonttbl" => Keyword::FontTable,
    "fnil" => Keyword::FontNil,
    "froman" => Keyword::FontRoman,
    "fswiss" => Keyword::FontSwiss,
    "fmodern" => Keyword::FontModern,
    "fscript" => Keyword::FontScript,
    "fdecor" => Keyword::FontDecor,
    "ftech" => Keyword::FontTech,
    "fprq" => Keyword::FontPitch,
    "fcharset" => Keyword::FontCharset,

    "info" => Keyword::Info,
    "title" => Keyword::Title,
    "subject" => Keyword::Subject,
    "author" => Keyword::Author,
    "keywords" => Keyword::Keywords,
    "doccomm" => Keyword::Comment,
    "operator" => Keyword::Operator,
    "company" => Keyword::Company,

    "tab" => Keyword::Tab,
    "line" => Keyword::Line,
    "bullet" => Keyword::Bullet,
    "emdash" => Keyword::EmDash,
    "endash" => Keyword::EnDash,
    "emspace" => Keyword::EmSpace,
    "enspace" => Keyword::EnSpace,
    "lquote" => Keyword::LeftQuote,
    "rquote" => Keyword::RightQuote,
    "ldblquote" => Keyword::LeftDoubleQuote,
    "rdblquote" => Keyword::RightDoubleQuote,
    "u" => Keyword::Unicode,
    "uc" => Keyword::UnicodeSkip,

    "bin" => Keyword::Bin,

    "stylesheet" => Keyword::SkipDestination,
    "header" => Keyword::SkipDestination,
    "headerl" => Keyword::SkipDestination,
    "headerr" => Keyword::SkipDestination,
    "headerf" => Keyword::SkipDestination,
    "footer" => Keyword::SkipDestination,
    "footerl" => Keyword::SkipDestination,
    "footerr" => Keyword::SkipDestination,
    "footerf" => Keyword::SkipDestination,
    "pict" => Keyword::SkipDestination,
    "object" => Keyword::SkipDestination,
    "footnote" => Keyword::SkipDestination,
    "annotation" => Keyword::SkipDestination,
    "fldinst" => Keyword::SkipDestination,
    "listtable" => Keyword::SkipDestination,
    "listoverridetable" => Keyword::SkipDestination,
    "revtbl" => Keyword::SkipDestination,
    "rsidtbl" => Keyword::SkipDestination,
    "generator" => Keyword::SkipDestination,
    "xmlnstbl" => Keyword::SkipDestination,
    "themedata" => Keyword::SkipDestination,
    "colorschememapping" => Keyword::SkipDestination,
    "latentstyles" => Keyword::SkipDestination,
    "datastore" => Keyword::SkipDestination,
};
