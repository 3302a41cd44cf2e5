//! Patience line matcher.
//!
//! Anchors on lines that are unique in both inputs after whitespace
//! stripping, refines the gaps recursively, then keeps only anchors whose
//! raw lines are byte-equal. Stripping is for anchoring only: an `Equal`
//! opcode always asserts raw equality.

use bstr::{BString, ByteSlice};

use crate::blocks::{self, Block};
use crate::error::MatcherError;
use crate::opcodes::{self, Opcode};
use crate::recurse::recurse_matches;

/// Recursion depth for anchor refinement, a guard against pathological
/// inputs rather than a tuning knob.
pub(crate) const MAX_RECURSION: i32 = 10;

/// Patience sequence matcher over lines.
pub struct PatienceMatcher<'a> {
    a: &'a [BString],
    b: &'a [BString],
    matching_blocks: Option<Vec<Block>>,
    opcodes: Option<Vec<Opcode>>,
}

impl<'a> PatienceMatcher<'a> {
    pub fn new(a: &'a [BString], b: &'a [BString]) -> Self {
        Self {
            a,
            b,
            matching_blocks: None,
            opcodes: None,
        }
    }

    /// difflib-compatible constructor shape. Junk predicates are not
    /// supported: anchoring already runs on whitespace-stripped lines.
    pub fn with_junk(
        isjunk: Option<fn(&BString) -> bool>,
        a: &'a [BString],
        b: &'a [BString],
    ) -> Result<Self, MatcherError> {
        if isjunk.is_some() {
            return Err(MatcherError::JunkUnsupported);
        }
        Ok(Self::new(a, b))
    }

    /// The monotone matching-block list, ending with the sentinel.
    pub fn matching_blocks(&mut self) -> &[Block] {
        if self.matching_blocks.is_none() {
            self.matching_blocks = Some(self.compute_blocks());
        }
        self.matching_blocks.as_deref().unwrap()
    }

    /// The covering opcode list.
    pub fn opcodes(&mut self) -> &[Opcode] {
        if self.opcodes.is_none() {
            let blocks = self.matching_blocks().to_vec();
            self.opcodes = Some(opcodes::build_opcodes(
                self.a,
                self.b,
                &blocks,
                opcodes::plain_replace,
            ));
        }
        self.opcodes.as_deref().unwrap()
    }

    /// Opcodes grouped into hunks with `context` equal lines around each.
    pub fn grouped_opcodes(&mut self, context: usize) -> Vec<Vec<Opcode>> {
        let ops = self.opcodes().to_vec();
        opcodes::group_opcodes(&ops, context)
    }

    fn compute_blocks(&self) -> Vec<Block> {
        let a_stripped: Vec<&[u8]> = self.a.iter().map(|line| line.trim()).collect();
        let b_stripped: Vec<&[u8]> = self.b.iter().map(|line| line.trim()).collect();

        let mut matches = Vec::new();
        recurse_matches(
            &a_stripped,
            &b_stripped,
            0,
            0,
            a_stripped.len(),
            b_stripped.len(),
            &mut matches,
            MAX_RECURSION,
        );
        // stripping was only for anchoring
        matches.retain(|&(ai, bi)| self.a[ai] == self.b[bi]);

        let mut result = blocks::collapse_matches(&matches);
        result.push(Block::new(self.a.len(), self.b.len(), 0));
        blocks::check_monotone(&result);
        result
    }
}
