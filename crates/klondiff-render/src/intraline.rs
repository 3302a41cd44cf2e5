//! Intra-line highlighting for a deleted/inserted line pair.
//!
//! When a `-` line is followed by a `+` line and the two share enough
//! text, the pair is re-rendered with unchanged fragments in the
//! `oldsame`/`newsame` styles and changed fragments in the plain
//! old/new styles.

use klondiff_matcher::{ratcliff, Block};

use crate::config::StyleKey;
use crate::writer::Painter;

/// Highlight only when the longest shared substring is at least this long.
const HIGHLIGHT_THRESHOLD: usize = 5;
/// Shared substrings shorter than this are treated as changed text.
const KEEP_THRESHOLD: usize = 3;

/// Sub-diff a `-`/`+` line pair (each including its leading marker).
///
/// Returns the two rendered lines, or `None` when the lines do not share
/// a substring of at least [`HIGHLIGHT_THRESHOLD`] bytes, in which case
/// the caller falls back to whole-line coloring.
pub fn highlight_pair(oldline: &[u8], newline: &[u8], painter: &Painter) -> Option<(Vec<u8>, Vec<u8>)> {
    if oldline.is_empty() || newline.is_empty() {
        return None;
    }
    let old = &oldline[1..];
    let new = &newline[1..];

    let blocks = ratcliff::matching_blocks(old, new);
    if !blocks.iter().any(|m| m.len >= HIGHLIGHT_THRESHOLD) {
        return None;
    }
    // the zero-length sentinel stays so the gap after the last match is
    // rendered like any other gap
    let kept: Vec<Block> = blocks
        .into_iter()
        .filter(|m| m.len == 0 || m.len >= KEEP_THRESHOLD)
        .collect();

    let mut out_old = painter.colorstring(StyleKey::Oldtext, &oldline[..1]);
    let mut out_new = painter.colorstring(StyleKey::Newtext, &newline[..1]);
    out_old.extend(painter.colorstring(StyleKey::Oldtext, &old[..kept[0].a]));
    out_new.extend(painter.colorstring(StyleKey::Newtext, &new[..kept[0].b]));
    for (n, m) in kept[..kept.len() - 1].iter().enumerate() {
        out_old.extend(painter.colorstring(StyleKey::Oldsame, &old[m.a..m.a + m.len]));
        out_new.extend(painter.colorstring(StyleKey::Newsame, &new[m.b..m.b + m.len]));
        out_old.extend(painter.colorstring(StyleKey::Oldtext, &old[m.a + m.len..kept[n + 1].a]));
        out_new.extend(painter.colorstring(StyleKey::Newtext, &new[m.b + m.len..kept[n + 1].b]));
    }
    Some((out_old, out_new))
}
