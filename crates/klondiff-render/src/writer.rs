//! The colorizing diff writer.
//!
//! Classifies rendered diff lines by their marker, colors them, and
//! pairs each held `-` line with a following `+` line for intra-line
//! highlighting.

use std::io::{self, Write};

use regex::bytes::Regex;

use crate::config::{StyleKey, Styles};
use crate::intraline;
use crate::term;

/// Classify a rendered diff line by its first byte.
fn classify(line: &[u8]) -> StyleKey {
    match line.first() {
        Some(b'@') => StyleKey::Diffstuff,
        Some(b'+') => StyleKey::Newtext,
        Some(b'-') => StyleKey::Oldtext,
        _ => StyleKey::Plain,
    }
}

/// Applies styles to lines and fragments.
///
/// Two special cases: added lines have any trailing-whitespace tail
/// rendered on the `trailingspace` background, and hunk headers color
/// only the `@@ ... @@` part, leaving a function suffix unstyled.
pub struct Painter {
    styles: Styles,
    trailing_ws: Regex,
    hunk_header: Regex,
}

impl Painter {
    pub fn new(styles: Styles) -> Self {
        Self {
            styles,
            trailing_ws: Regex::new(r"^(.*?)([\t ]*)(\r?\n)$").unwrap(),
            hunk_header: Regex::new(r"^(@@[^@]*@@)(.*\r?\n)$").unwrap(),
        }
    }

    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    /// Style a line or fragment for its category. Disabled categories
    /// pass through unchanged.
    pub fn colorstring(&self, key: StyleKey, text: &[u8]) -> Vec<u8> {
        let Some(style) = self.styles.get(key) else {
            return text.to_vec();
        };
        match key {
            StyleKey::Newtext => {
                if let Some(caps) = self.trailing_ws.captures(text) {
                    let tail = caps.get(2).map_or(&b""[..], |m| m.as_bytes());
                    if !tail.is_empty() {
                        let bg = self.styles.get(StyleKey::Trailingspace).map(|s| s.color);
                        let mut out = term::colorstring(&caps[1], style, None);
                        out.extend(term::colorstring(tail, style, bg));
                        out.extend_from_slice(&caps[3]);
                        return out;
                    }
                }
            }
            StyleKey::Diffstuff => {
                if let Some(caps) = self.hunk_header.captures(text) {
                    let mut out = term::colorstring(&caps[1], style, None);
                    out.extend_from_slice(&caps[2]);
                    return out;
                }
            }
            _ => {}
        }
        term::colorstring(text, style, None)
    }
}

/// Writes a colored diff transcript.
///
/// `write` accepts arbitrary text and assembles complete lines;
/// `writeline` takes one complete line. A `-` line (other than the `---`
/// header) is held until the next line arrives: a `+` successor makes a
/// changed pair and goes through the intra-line highlighter, anything
/// else releases the held line with plain old-text coloring.
pub struct DiffWriter<W: Write> {
    target: W,
    painter: Painter,
    color: bool,
    hold: Option<Vec<u8>>,
    partial: Vec<u8>,
}

impl<W: Write> DiffWriter<W> {
    pub fn new(target: W, styles: Styles, color: bool) -> Self {
        Self {
            target,
            painter: Painter::new(styles),
            color,
            hold: None,
            partial: Vec::new(),
        }
    }

    /// Color on when stdout is a terminal, off otherwise.
    pub fn auto(target: W) -> Self {
        let color = term::has_ansi_colors();
        let styles = if color { Styles::load() } else { Styles::plain() };
        Self::new(target, styles, color)
    }

    /// Write a metadata line (git headers); a newline is appended.
    pub fn write_meta(&mut self, line: &[u8]) -> io::Result<()> {
        let mut out = if self.color {
            self.painter.colorstring(StyleKey::Metaline, line)
        } else {
            line.to_vec()
        };
        out.push(b'\n');
        self.target.write_all(&out)
    }

    /// Write raw text; complete lines are colored as they form.
    pub fn write(&mut self, text: &[u8]) -> io::Result<()> {
        if !self.color {
            return self.target.write_all(text);
        }
        let mut rest = text;
        while let Some(pos) = rest.iter().position(|&b| b == b'\n') {
            let mut line = std::mem::take(&mut self.partial);
            line.extend_from_slice(&rest[..=pos]);
            self.writeline(&line)?;
            rest = &rest[pos + 1..];
        }
        self.partial.extend_from_slice(rest);
        Ok(())
    }

    /// Write one complete diff line.
    pub fn writeline(&mut self, line: &[u8]) -> io::Result<()> {
        if !self.color {
            return self.target.write_all(line);
        }
        let kind = classify(line);
        if let Some(held) = self.hold.take() {
            if kind == StyleKey::Newtext {
                match intraline::highlight_pair(&held, line, &self.painter) {
                    Some((old, new)) => {
                        self.target.write_all(&old)?;
                        self.target.write_all(&new)?;
                    }
                    None => {
                        let old = self.painter.colorstring(StyleKey::Oldtext, &held);
                        self.target.write_all(&old)?;
                        let new = self.painter.colorstring(StyleKey::Newtext, line);
                        self.target.write_all(&new)?;
                    }
                }
                return Ok(());
            }
            let old = self.painter.colorstring(StyleKey::Oldtext, &held);
            self.target.write_all(&old)?;
        }
        if kind == StyleKey::Oldtext && !line.starts_with(b"---") {
            self.hold = Some(line.to_vec());
            return Ok(());
        }
        let colored = self.painter.colorstring(kind, line);
        self.target.write_all(&colored)
    }

    /// Recover the underlying writer.
    pub fn into_target(self) -> W {
        self.target
    }

    /// Release any held or partial line and flush the target.
    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(held) = self.hold.take() {
            let old = self.painter.colorstring(StyleKey::Oldtext, &held);
            self.target.write_all(&old)?;
        }
        if !self.partial.is_empty() {
            let partial = std::mem::take(&mut self.partial);
            let colored = self.painter.colorstring(classify(&partial), &partial);
            self.target.write_all(&colored)?;
        }
        self.target.flush()
    }
}
