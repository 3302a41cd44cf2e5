//! Klondike line matcher.
//!
//! A relaxation of patience: lines are junk-cleared before anchoring
//! (whitespace removed, long runs of a repeated byte collapsed), so
//! cosmetically different but structurally equal lines can anchor
//! together. Each unique-line anchor is grown over its neighbors, the
//! classical matcher fills gaps the anchors missed, and block boundaries
//! are nudged toward blank lines for more readable hunks.

use bstr::{BStr, BString};

use crate::blocks::{self, Block};
use crate::error::MatcherError;
use crate::opcodes::{self, Opcode};
use crate::ratcliff;
use crate::unique_lcs::unique_lcs;

/// Runs of this many identical bytes or more collapse down to two bytes,
/// so any separator of length >= 2 normalizes the same way.
const RUN_COLLAPSE: usize = 3;

/// Junk-clear a line: drop every whitespace byte, then collapse each
/// maximal run of `RUN_COLLAPSE` or more identical bytes to two bytes.
///
/// Whitespace goes first, so runs broken only by spacing still collapse
/// and inserting whitespace anywhere leaves the cleared form unchanged.
pub fn clear_junk(line: &BStr) -> BString {
    let mut cleared: Vec<u8> = Vec::with_capacity(line.len());
    for &byte in line.iter() {
        if matches!(byte, b' ' | b'\t' | b'\r' | b'\n' | 0x0c) {
            continue;
        }
        cleared.push(byte);
    }
    let mut out: Vec<u8> = Vec::with_capacity(cleared.len());
    let mut pos = 0;
    while pos < cleared.len() {
        let byte = cleared[pos];
        let mut run = 1;
        while pos + run < cleared.len() && cleared[pos + run] == byte {
            run += 1;
        }
        let keep = if run >= RUN_COLLAPSE { RUN_COLLAPSE - 1 } else { run };
        out.extend(std::iter::repeat(byte).take(keep));
        pos += run;
    }
    BString::from(out)
}

/// Klondike sequence matcher over lines.
pub struct KlondikeMatcher<'a> {
    a: &'a [BString],
    b: &'a [BString],
    extra_effort: bool,
    a_cleared: Option<Vec<BString>>,
    b_cleared: Option<Vec<BString>>,
    matching_blocks: Option<Vec<Block>>,
    opcodes: Option<Vec<Opcode>>,
}

impl<'a> KlondikeMatcher<'a> {
    pub fn new(a: &'a [BString], b: &'a [BString]) -> Self {
        Self {
            a,
            b,
            extra_effort: true,
            a_cleared: None,
            b_cleared: None,
            matching_blocks: None,
            opcodes: None,
        }
    }

    /// Disable the sub-line splitting of replaced regions.
    pub fn without_extra_effort(mut self) -> Self {
        self.extra_effort = false;
        self
    }

    /// difflib-compatible constructor shape. Junk predicates are not
    /// supported: junk clearing is built into the anchoring.
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

    /// The monotone matching-block list over junk-cleared lines, ending
    /// with the sentinel. Blocks assert equality of the cleared views;
    /// raw differences inside a block surface as singleton replaces in
    /// [`Self::opcodes`].
    pub fn matching_blocks(&mut self) -> &[Block] {
        if self.matching_blocks.is_none() {
            self.compute_blocks();
        }
        self.matching_blocks.as_deref().unwrap()
    }

    /// The covering opcode list, with extra-effort sub-line splitting of
    /// replaced regions when enabled.
    pub fn opcodes(&mut self) -> &[Opcode] {
        if self.opcodes.is_none() {
            let blocks = self.matching_blocks().to_vec();
            let a_cleared = self.a_cleared.as_deref().unwrap();
            let b_cleared = self.b_cleared.as_deref().unwrap();
            let ops = if self.extra_effort {
                opcodes::build_opcodes(self.a, self.b, &blocks, |i1, i2, j1, j2, out| {
                    opcodes::split_replace(
                        self.a, self.b, a_cleared, b_cleared, i1, i2, j1, j2, out,
                    )
                })
            } else {
                opcodes::build_opcodes(self.a, self.b, &blocks, opcodes::plain_replace)
            };
            self.opcodes = Some(ops);
        }
        self.opcodes.as_deref().unwrap()
    }

    /// Opcodes grouped into hunks with `context` equal lines around each.
    pub fn grouped_opcodes(&mut self, context: usize) -> Vec<Vec<Opcode>> {
        let ops = self.opcodes().to_vec();
        opcodes::group_opcodes(&ops, context)
    }

    fn compute_blocks(&mut self) {
        let a_ws: Vec<BString> = self.a.iter().map(|l| clear_junk(l.as_ref())).collect();
        let b_ws: Vec<BString> = self.b.iter().map(|l| clear_junk(l.as_ref())).collect();
        let m = a_ws.len();
        let n = b_ws.len();
        let limit = m.min(n);

        // match the unchanged head and tail of the file first
        let mut start = 0;
        while start < limit && a_ws[start] == b_ws[start] {
            start += 1;
        }
        if start == limit {
            // one input is a cleared prefix of the other
            let mut result = Vec::new();
            if start > 0 {
                result.push(Block::new(0, 0, start));
            }
            result.push(Block::new(m, n, 0));
            self.finish_blocks(a_ws, b_ws, result);
            return;
        }
        let mut suffix = 0;
        while suffix < limit - start && a_ws[m - 1 - suffix] == b_ws[n - 1 - suffix] {
            suffix += 1;
        }

        // anchor on lines unique to both sides of the middle
        let anchors = unique_lcs(&a_ws[start..m - suffix], &b_ws[start..n - suffix]);

        let mut matches: Vec<(i64, i64, i64)> = Vec::new();
        if start > 0 {
            matches.push((0, 0, start as i64));
        }
        let mut last_a = start;
        let mut last_b = start;
        for (apos, bpos) in anchors {
            let apos = apos + start;
            let bpos = bpos + start;
            // an anchor swallowed by the previous growth is skipped;
            // checking a alone suffices since anchor lines are unique
            if apos <= last_a {
                continue;
            }
            // grow the anchor over equal cleared neighbors
            let mut back = 0;
            while apos - back > 0
                && bpos - back > 0
                && a_ws[apos - back - 1] == b_ws[bpos - back - 1]
            {
                back += 1;
            }
            let mut end = 1;
            while apos + end < m && bpos + end < n && a_ws[apos + end] == b_ws[bpos + end] {
                end += 1;
            }

            // anchoring missed whatever is not unique; give the remaining
            // gap to the classical matcher when it spans enough lines
            let grown_a = apos - back;
            let grown_b = bpos - back;
            if grown_a > last_a
                && grown_b > last_b
                && (grown_a - last_a) + (grown_b - last_b) > 2
            {
                let gap = ratcliff::matching_blocks(
                    &a_ws[last_a..grown_a],
                    &b_ws[last_b..grown_b],
                );
                for blk in gap {
                    if blk.len > 0 {
                        matches.push((
                            (blk.a + last_a) as i64,
                            (blk.b + last_b) as i64,
                            blk.len as i64,
                        ));
                    }
                }
            }
            matches.push((grown_a as i64, grown_b as i64, (back + end) as i64));
            last_a = apos + end;
            last_b = bpos + end;
        }

        if suffix > 0 {
            matches.push(((m - suffix) as i64, (n - suffix) as i64, suffix as i64));
        }
        matches.push((m as i64, n as i64, 0));

        reconcile_overlaps(&mut matches, &a_ws);

        let last = matches.len() - 1;
        let mut result: Vec<Block> = Vec::with_capacity(matches.len());
        for (idx, &(a, b, len)) in matches.iter().enumerate() {
            if a < 0 || b < 0 || len < 0 {
                panic!("overlap reconciliation produced block ({a}, {b}, {len})");
            }
            // reconciliation can consume a block entirely; only the
            // sentinel may stay at length zero
            if len == 0 && idx != last {
                continue;
            }
            result.push(Block::new(a as usize, b as usize, len as usize));
        }
        self.finish_blocks(a_ws, b_ws, result);
    }

    fn finish_blocks(&mut self, a_ws: Vec<BString>, b_ws: Vec<BString>, result: Vec<Block>) {
        blocks::check_monotone(&result);
        self.a_cleared = Some(a_ws);
        self.b_cleared = Some(b_ws);
        self.matching_blocks = Some(result);
    }
}

/// Anchor growth may run two neighboring blocks into each other. Take the
/// overlap out of the earlier block when that lands the cut just after a
/// blank line, otherwise out of the later block's head.
fn reconcile_overlaps(matches: &mut [(i64, i64, i64)], a_ws: &[BString]) {
    for idx in 0..matches.len().saturating_sub(1) {
        let (apos, bpos, size) = matches[idx];
        let next = matches[idx + 1];
        let mut d = (apos + size - next.0).max(bpos + size - next.1);
        if d <= 0 {
            continue;
        }
        for k in 0..d {
            let probe = next.0 + d - k - 1;
            if probe >= 0 && (probe as usize) < a_ws.len() && a_ws[probe as usize].is_empty() {
                matches[idx].2 -= k;
                d -= k;
                break;
            }
        }
        matches[idx + 1].0 += d;
        matches[idx + 1].1 += d;
        matches[idx + 1].2 -= d;
    }
}
