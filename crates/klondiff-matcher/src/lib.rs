//! Line matchers for diff generation.
//!
//! Three interchangeable strategies: the classical Ratcliff/Obershelp
//! matcher (difflib-like), a patience matcher anchoring on lines unique
//! to both inputs, and a klondike matcher that additionally normalizes
//! junk (whitespace, long repeated runs) so cosmetically different lines
//! still anchor. All three share the block/opcode pipeline: a monotone,
//! sentinel-terminated matching-block list is turned into a covering
//! opcode stream, which can then be grouped into context hunks.

pub mod blocks;
pub mod error;
pub mod klondike;
pub mod opcodes;
pub mod patience;
pub mod ratcliff;
pub mod recurse;
pub mod unique_lcs;

use bstr::BString;

pub use blocks::Block;
pub use error::MatcherError;
pub use klondike::KlondikeMatcher;
pub use opcodes::{group_opcodes, OpTag, Opcode};
pub use patience::PatienceMatcher;
pub use ratcliff::RatcliffMatcher;

/// The available line-matching strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Classical Ratcliff/Obershelp (python difflib behavior).
    Ratcliff,
    /// Patience: anchor on lines unique to both sides.
    Patience,
    /// Klondike: patience relaxed by junk normalization.
    Klondike,
}

/// A matcher of any strategy over two line arrays.
pub enum LineMatcher<'a> {
    Ratcliff(RatcliffMatcher<'a, BString>),
    Patience(PatienceMatcher<'a>),
    Klondike(KlondikeMatcher<'a>),
}

impl<'a> LineMatcher<'a> {
    pub fn new(algorithm: Algorithm, a: &'a [BString], b: &'a [BString]) -> Self {
        match algorithm {
            Algorithm::Ratcliff => Self::Ratcliff(RatcliffMatcher::new(a, b)),
            Algorithm::Patience => Self::Patience(PatienceMatcher::new(a, b)),
            Algorithm::Klondike => Self::Klondike(KlondikeMatcher::new(a, b)),
        }
    }

    /// The monotone matching-block list, ending with the sentinel.
    pub fn matching_blocks(&mut self) -> &[Block] {
        match self {
            Self::Ratcliff(m) => m.matching_blocks(),
            Self::Patience(m) => m.matching_blocks(),
            Self::Klondike(m) => m.matching_blocks(),
        }
    }

    /// The covering opcode list.
    pub fn opcodes(&mut self) -> &[Opcode] {
        match self {
            Self::Ratcliff(m) => m.opcodes(),
            Self::Patience(m) => m.opcodes(),
            Self::Klondike(m) => m.opcodes(),
        }
    }

    /// Opcodes grouped into hunks with `context` equal lines around each.
    pub fn grouped_opcodes(&mut self, context: usize) -> Vec<Vec<Opcode>> {
        match self {
            Self::Ratcliff(m) => m.grouped_opcodes(context),
            Self::Patience(m) => m.grouped_opcodes(context),
            Self::Klondike(m) => m.grouped_opcodes(context),
        }
    }
}

/// Split a byte buffer into lines, preserving terminators. Content after
/// the last newline is kept as a final, unterminated line.
pub fn split_lines(data: &[u8]) -> Vec<BString> {
    if data.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, &byte) in data.iter().enumerate() {
        if byte == b'\n' {
            lines.push(BString::from(&data[start..=i]));
            start = i + 1;
        }
    }
    if start < data.len() {
        lines.push(BString::from(&data[start..]));
    }
    lines
}
