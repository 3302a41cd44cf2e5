//! Classical Ratcliff/Obershelp sequence matching.
//!
//! The difflib-style algorithm: repeatedly find the longest matching
//! run between the unmatched regions, working from a position index of
//! the second sequence. Used directly for `--difflib` diffs and as the
//! fallback matcher inside klondike gaps, the joined-string sub-line
//! splitter, and the intra-line highlighter.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use crate::blocks::Block;
use crate::opcodes::{self, Opcode};

/// Elements occurring more than `len / POPULARITY_DIVISOR + 1` times in a
/// long second sequence are dropped from the index, mirroring difflib's
/// autojunk heuristic.
const POPULARITY_THRESHOLD: usize = 200;
const POPULARITY_DIVISOR: usize = 100;

/// Ratcliff/Obershelp matcher over any hashable element type.
pub struct RatcliffMatcher<'a, T: Eq + Hash> {
    a: &'a [T],
    b: &'a [T],
    b2j: HashMap<&'a T, Vec<usize>>,
    matching_blocks: Option<Vec<Block>>,
    opcodes: Option<Vec<Opcode>>,
}

impl<'a, T: Eq + Hash> RatcliffMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&T, Vec<usize>> = HashMap::new();
        for (i, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(i);
        }
        // popularity pruning: very frequent elements anchor poorly and
        // blow up find_longest_match on large inputs
        let n = b.len();
        if n >= POPULARITY_THRESHOLD {
            let ntest = n / POPULARITY_DIVISOR + 1;
            b2j.retain(|_, indices| indices.len() <= ntest);
        }
        Self {
            a,
            b,
            b2j,
            matching_blocks: None,
            opcodes: None,
        }
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
        let mut found: Vec<Block> = Vec::new();
        let mut queue: VecDeque<(usize, usize, usize, usize)> = VecDeque::new();
        queue.push_back((0, self.a.len(), 0, self.b.len()));
        while let Some((alo, ahi, blo, bhi)) = queue.pop_front() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.len > 0 {
                if alo < block.a && blo < block.b {
                    queue.push_back((alo, block.a, blo, block.b));
                }
                if block.a + block.len < ahi && block.b + block.len < bhi {
                    queue.push_back((block.a + block.len, ahi, block.b + block.len, bhi));
                }
                found.push(block);
            }
        }
        found.sort_by_key(|blk| (blk.a, blk.b));

        // merge runs that ended up adjacent
        let mut collapsed: Vec<Block> = Vec::new();
        for block in found {
            match collapsed.last_mut() {
                Some(last) if last.a + last.len == block.a && last.b + last.len == block.b => {
                    last.len += block.len;
                }
                _ => collapsed.push(block),
            }
        }
        collapsed.push(Block::new(self.a.len(), self.b.len(), 0));
        collapsed
    }

    /// Longest run with `a[i..i+len] == b[j..j+len]`, `alo <= i < ahi`,
    /// `blo <= j < bhi`; earliest in `a` (then `b`) among ties.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let mut best = Block::new(alo, blo, 0);
        // j2len[j] = length of the longest run ending at (i, j)
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        let mut newj2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            newj2len.clear();
            if let Some(indices) = self.b2j.get(&self.a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = if j > 0 {
                        j2len.get(&(j - 1)).copied().unwrap_or(0)
                    } else {
                        0
                    };
                    let newk = k + 1;
                    newj2len.insert(j, newk);
                    if newk > best.len {
                        best = Block::new(i + 1 - newk, j + 1 - newk, newk);
                    }
                }
            }
            std::mem::swap(&mut j2len, &mut newj2len);
        }

        // grow over elements the popularity pruning hid from the index
        while best.a > alo && best.b > blo && self.a[best.a - 1] == self.b[best.b - 1] {
            best.a -= 1;
            best.b -= 1;
            best.len += 1;
        }
        while best.a + best.len < ahi
            && best.b + best.len < bhi
            && self.a[best.a + best.len] == self.b[best.b + best.len]
        {
            best.len += 1;
        }
        best
    }
}

/// One-shot block computation, for callers that do not need caching.
pub fn matching_blocks<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<Block> {
    RatcliffMatcher::new(a, b).matching_blocks().to_vec()
}
