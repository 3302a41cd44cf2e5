//! colordiffrc-style color configuration.
//!
//! Styles are read as `key = value` lines from `/etc/colordiffrc` and
//! `~/.colordiffrc`, later files winning. The values `none`, `normal`,
//! and `off` disable a category; unknown color names leave the previous
//! value in place.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::term::{parse_style, Style};

/// The style categories a diff line (or line fragment) can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKey {
    /// diff --git headers and other metadata lines.
    Metaline,
    /// Context lines.
    Plain,
    /// Added lines and added fragments.
    Newtext,
    /// Removed lines and removed fragments.
    Oldtext,
    /// Unchanged fragments inside an added line.
    Newsame,
    /// Unchanged fragments inside a removed line.
    Oldsame,
    /// Hunk headers.
    Diffstuff,
    /// Trailing whitespace on added lines (used as a background).
    Trailingspace,
    /// Leading tabs on added lines.
    Leadingtabs,
    /// Lines exceeding the configured width.
    Longline,
}

impl StyleKey {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "metaline" => Self::Metaline,
            "plain" => Self::Plain,
            "newtext" => Self::Newtext,
            "oldtext" => Self::Oldtext,
            "newsame" => Self::Newsame,
            "oldsame" => Self::Oldsame,
            "diffstuff" => Self::Diffstuff,
            "trailingspace" => Self::Trailingspace,
            "leadingtabs" => Self::Leadingtabs,
            "longline" => Self::Longline,
            _ => return None,
        })
    }

    const ALL: [(StyleKey, &'static str); 10] = [
        (Self::Metaline, "darkyellow"),
        (Self::Plain, "darkwhite"),
        (Self::Newtext, "darkgreen"),
        (Self::Oldtext, "darkred"),
        (Self::Newsame, "darkyellow"),
        (Self::Oldsame, "darkyellow"),
        (Self::Diffstuff, "darkcyan"),
        (Self::Trailingspace, "red"),
        (Self::Leadingtabs, "magenta"),
        (Self::Longline, "white"),
    ];
}

/// The resolved style table. A `None` slot means the category is
/// disabled and its text passes through unstyled.
#[derive(Debug, Clone)]
pub struct Styles {
    slots: HashMap<StyleKey, Option<Style>>,
}

impl Styles {
    /// The built-in defaults.
    pub fn color_defaults() -> Self {
        let slots = StyleKey::ALL
            .iter()
            .map(|&(key, name)| (key, parse_style(name)))
            .collect();
        Self { slots }
    }

    /// Every category disabled, for uncolored output.
    pub fn plain() -> Self {
        let slots = StyleKey::ALL.iter().map(|&(key, _)| (key, None)).collect();
        Self { slots }
    }

    /// Defaults overridden by `/etc/colordiffrc` and `~/.colordiffrc`.
    pub fn load() -> Self {
        let mut styles = Self::color_defaults();
        styles.read_rc_file(Path::new("/etc/colordiffrc"));
        if let Some(home) = std::env::var_os("HOME") {
            styles.read_rc_file(&PathBuf::from(home).join(".colordiffrc"));
        }
        styles
    }

    /// Apply one rc file; a missing or unreadable file is ignored.
    pub fn read_rc_file(&mut self, path: &Path) {
        let Ok(contents) = std::fs::read_to_string(path) else {
            return;
        };
        self.read_rc(&contents);
    }

    fn read_rc(&mut self, contents: &str) {
        for line in contents.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let Some(key) = StyleKey::from_name(key.trim()) else {
                continue;
            };
            let value = value.trim();
            if matches!(value, "none" | "normal" | "off") {
                self.slots.insert(key, None);
                continue;
            }
            let Some(style) = parse_style(value) else {
                // unknown color names are ignored
                continue;
            };
            self.slots.insert(key, Some(style));
        }
    }

    pub fn get(&self, key: StyleKey) -> Option<Style> {
        self.slots.get(&key).copied().flatten()
    }
}
