//! ANSI escape emission in the colordiffrc naming scheme.
//!
//! `dark`-prefixed color names select normal intensity, bare names
//! bold/bright.

use std::io::IsTerminal;

/// The eight base terminal colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl BaseColor {
    fn digit(self) -> char {
        match self {
            Self::Black => '0',
            Self::Red => '1',
            Self::Green => '2',
            Self::Yellow => '3',
            Self::Blue => '4',
            Self::Magenta => '5',
            Self::Cyan => '6',
            Self::White => '7',
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "black" => Self::Black,
            "red" => Self::Red,
            "green" => Self::Green,
            "yellow" => Self::Yellow,
            "blue" => Self::Blue,
            "magenta" => Self::Magenta,
            "cyan" => Self::Cyan,
            "white" => Self::White,
            _ => return None,
        })
    }
}

/// A foreground style: base color plus intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub color: BaseColor,
    pub bright: bool,
}

/// Parse a colordiffrc color value. `darkred` is normal-intensity red,
/// `red` is bright red. Unknown names yield `None`.
pub fn parse_style(name: &str) -> Option<Style> {
    let (bright, base) = match name.strip_prefix("dark") {
        Some(rest) => (false, rest),
        None => (true, name),
    };
    BaseColor::from_name(base).map(|color| Style { color, bright })
}

/// Wrap `text` in an ANSI escape for the given foreground style and
/// optional background color, ending with a reset.
pub fn colorstring(text: &[u8], fg: Style, bg: Option<BaseColor>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() + 16);
    out.extend_from_slice(b"\x1b[");
    out.push(if fg.bright { b'1' } else { b'0' });
    out.extend_from_slice(b";3");
    out.push(fg.color.digit() as u8);
    if let Some(bg) = bg {
        out.extend_from_slice(b";4");
        out.push(bg.digit() as u8);
    }
    out.push(b'm');
    out.extend_from_slice(text);
    out.extend_from_slice(b"\x1b[0m");
    out
}

/// Whether stdout looks like a color-capable terminal.
pub fn has_ansi_colors() -> bool {
    if !std::io::stdout().is_terminal() {
        return false;
    }
    match std::env::var("TERM") {
        Ok(term) => term != "dumb",
        Err(_) => false,
    }
}
