//! Table cell borders.

use serde::Serialize;
use std::fmt::Write as FmtWrite;

/// Border style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum BorderStyle {
    /// No border
    #[default]
    None,
    /// Single line border (`\brdrs`)
    Single,
    /// Thick border (`\brdrth`)
    Thick,
    /// Double line border (`\brdrdb`)
    Double,
    /// Dotted border (`\brdrdot`)
    Dotted,
    /// Dashed border (`\brdrdash`)
    Dashed,
}

impl BorderStyle {
    /// Check if border is visible
    #[inline]
    pub fn is_visible(self) -> bool {
        self != BorderStyle::None
    }

    /// CSS `border-*` shorthand value.
    pub fn as_css(self) -> Option<&'static str> {
        match self {
            BorderStyle::None => None,
            BorderStyle::Single => Some("1px solid black"),
            BorderStyle::Thick => Some("2px solid black"),
            BorderStyle::Double => Some("3px double black"),
            BorderStyle::Dotted => Some("1px dotted black"),
            BorderStyle::Dashed => Some("1px dashed black"),
        }
    }
}

/// One edge of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BorderSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl BorderSide {
    const ALL: [BorderSide; 4] = [
        BorderSide::Top,
        BorderSide::Bottom,
        BorderSide::Left,
        BorderSide::Right,
    ];

    fn css_property(self) -> &'static str {
        match self {
            BorderSide::Top => "border-top",
            BorderSide::Bottom => "border-bottom",
            BorderSide::Left => "border-left",
            BorderSide::Right => "border-right",
        }
    }
}

/// Borders for a table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct CellBorders {
    /// Top border
    pub top: BorderStyle,
    /// Bottom border
    pub bottom: BorderStyle,
    /// Left border
    pub left: BorderStyle,
    /// Right border
    pub right: BorderStyle,
}

impl CellBorders {
    /// Set all borders to the same style
    #[inline]
    pub fn all(style: BorderStyle) -> Self {
        Self {
            top: style,
            bottom: style,
            left: style,
            right: style,
        }
    }

    #[inline]
    pub fn get(&self, side: BorderSide) -> BorderStyle {
        match side {
            BorderSide::Top => self.top,
            BorderSide::Bottom => self.bottom,
            BorderSide::Left => self.left,
            BorderSide::Right => self.right,
        }
    }

    #[inline]
    pub fn set(&mut self, side: BorderSide, style: BorderStyle) {
        match side {
            BorderSide::Top => self.top = style,
            BorderSide::Bottom => self.bottom = style,
            BorderSide::Left => self.left = style,
            BorderSide::Right => self.right = style,
        }
    }

    /// Whether the given edge is drawn.
    #[inline]
    pub fn is_active(&self, side: BorderSide) -> bool {
        self.get(side).is_visible()
    }

    /// Check if any border is visible
    pub fn has_any_border(&self) -> bool {
        BorderSide::ALL.iter().any(|side| self.is_active(*side))
    }

    /// Keep an edge only where `other` draws it too. Styles come from `self`.
    pub fn intersect(&self, other: &CellBorders) -> CellBorders {
        let mut result = *self;
        for side in BorderSide::ALL {
            if !other.is_active(side) {
                result.set(side, BorderStyle::None);
            }
        }
        result
    }

    /// Append `border-*` declarations for the visible edges.
    pub(crate) fn write_css(&self, out: &mut String) {
        for side in BorderSide::ALL {
            if let Some(value) = self.get(side).as_css() {
                // Writing into a String cannot fail.
                let _ = write!(out, "{}:{};", side.css_property(), value);
            }
        }
    }
}
