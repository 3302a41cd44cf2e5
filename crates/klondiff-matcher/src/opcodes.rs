//! Opcode construction: turning a matching-block list into a covering
//! edit script, plus the hunk grouping used by unified output.

use bstr::BString;

use crate::blocks::Block;
use crate::ratcliff;

/// Edit operation tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    /// `a[i1..i2] == b[j1..j2]` byte for byte.
    Equal,
    /// `a[i1..i2]` is replaced by `b[j1..j2]`.
    Replace,
    /// `a[i1..i2]` is deleted (`j1 == j2`).
    Delete,
    /// `b[j1..j2]` is inserted at `i1` (`i1 == i2`).
    Insert,
}

/// A single edit instruction. Consecutive opcodes are edge-adjacent and
/// the full list covers both sequences exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub tag: OpTag,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

impl Opcode {
    pub fn new(tag: OpTag, i1: usize, i2: usize, j1: usize, j2: usize) -> Self {
        Self { tag, i1, i2, j1, j2 }
    }
}

/// Pick the tag implied by the range shapes: an empty `a` range is an
/// insert, an empty `b` range a delete, anything else a replace.
fn tagged(i1: usize, i2: usize, j1: usize, j2: usize) -> Opcode {
    let tag = if i1 == i2 {
        OpTag::Insert
    } else if j1 == j2 {
        OpTag::Delete
    } else {
        OpTag::Replace
    };
    Opcode::new(tag, i1, i2, j1, j2)
}

/// Emit a replaced region as a single opcode.
pub(crate) fn plain_replace(i1: usize, i2: usize, j1: usize, j2: usize, out: &mut Vec<Opcode>) {
    out.push(Opcode::new(OpTag::Replace, i1, i2, j1, j2));
}

/// Build the covering opcode list for a block list.
///
/// `replace` is called for each region that changed on both sides; the
/// patience and classical matchers pass [`plain_replace`], klondike passes
/// the sub-line splitter below. Inside each block, elements whose raw
/// lines differ (they matched only under normalization) are emitted as
/// singleton replaces between equal runs.
///
/// Panics if the resulting list does not tile `[0, a.len()] x [0, b.len()]`
/// with edge-adjacent opcodes; that means the block list was broken.
pub(crate) fn build_opcodes<T, F>(a: &[T], b: &[T], blocks: &[Block], mut replace: F) -> Vec<Opcode>
where
    T: Eq,
    F: FnMut(usize, usize, usize, usize, &mut Vec<Opcode>),
{
    let mut answer: Vec<Opcode> = Vec::new();
    let mut i = 0;
    let mut j = 0;
    for block in blocks {
        let (ai, bj, size) = (block.a, block.b, block.len);
        // a[..i] and b[..j] are already covered; bridge the gap up to the
        // start of this block, then step over the block itself
        if i < ai && j < bj {
            replace(i, ai, j, bj, &mut answer);
        } else if i < ai {
            answer.push(Opcode::new(OpTag::Delete, i, ai, j, j));
        } else if j < bj {
            answer.push(Opcode::new(OpTag::Insert, i, i, j, bj));
        }
        i = ai + size;
        j = bj + size;

        // split the block wherever the raw lines differ: those pairs were
        // equal only under normalization
        let mut n1 = 0;
        for n in 0..size {
            if a[ai + n] != b[bj + n] {
                if n1 < n {
                    answer.push(Opcode::new(OpTag::Equal, ai + n1, ai + n, bj + n1, bj + n));
                }
                n1 = n + 1;
                answer.push(Opcode::new(
                    OpTag::Replace,
                    ai + n,
                    ai + n + 1,
                    bj + n,
                    bj + n + 1,
                ));
            }
        }
        if n1 < size {
            answer.push(Opcode::new(
                OpTag::Equal,
                ai + n1,
                ai + size,
                bj + n1,
                bj + size,
            ));
        }
    }
    check_coverage(a.len(), b.len(), &answer);
    answer
}

/// Split a multi-line replaced region by re-matching the normalized lines
/// as one joined string.
///
/// The per-line separators are `a\n` and `b\n`. Normalized lines contain
/// no whitespace bytes, so neither separator can occur inside the joined
/// content and every character match maps back to unambiguous line
/// offsets. Character matches shorter than 5 bytes are ignored. A pair
/// whose raw lines turn out byte-equal is emitted as `Equal`.
pub(crate) fn split_replace(
    a: &[BString],
    b: &[BString],
    a_norm: &[BString],
    b_norm: &[BString],
    i1: usize,
    i2: usize,
    j1: usize,
    j2: usize,
    out: &mut Vec<Opcode>,
) {
    if i1 + 1 >= i2 && j1 + 1 >= j2 {
        // single line on both sides, nothing to split
        plain_replace(i1, i2, j1, j2, out);
        return;
    }

    let joined_a = bstr::join(&b"a\n"[..], &a_norm[i1..i2]);
    let joined_b = bstr::join(&b"b\n"[..], &b_norm[j1..j2]);
    let char_matches = ratcliff::matching_blocks(&joined_a, &joined_b);

    // walk the joined offsets back to line numbers within the region
    let mut cur_a = 0;
    let mut cur_b = 0;
    let mut cur_an = 0;
    let mut cur_bn = 0;
    let mut prev_an = 0;
    let mut prev_bn = 0;
    for m in &char_matches {
        if m.len < 5 {
            continue;
        }
        while cur_a <= m.a {
            cur_a += a_norm[i1 + cur_an].len() + 2;
            cur_an += 1;
        }
        while cur_b <= m.b {
            cur_b += b_norm[j1 + cur_bn].len() + 2;
            cur_bn += 1;
        }
        if prev_an < cur_an && prev_bn < cur_bn {
            if prev_an < cur_an - 1 || prev_bn < cur_bn - 1 {
                out.push(tagged(
                    i1 + prev_an,
                    i1 + cur_an - 1,
                    j1 + prev_bn,
                    j1 + cur_bn - 1,
                ));
            }
            let tag = if a[i1 + cur_an - 1] == b[j1 + cur_bn - 1] {
                OpTag::Equal
            } else {
                OpTag::Replace
            };
            out.push(Opcode::new(
                tag,
                i1 + cur_an - 1,
                i1 + cur_an,
                j1 + cur_bn - 1,
                j1 + cur_bn,
            ));
            prev_an = cur_an;
            prev_bn = cur_bn;
        }
    }
    if i1 + prev_an < i2 || j1 + prev_bn < j2 {
        out.push(tagged(i1 + prev_an, i2, j1 + prev_bn, j2));
    }
}

/// Assert the opcode list is edge-adjacent and ends at `(m, n)`.
fn check_coverage(m: usize, n: usize, opcodes: &[Opcode]) {
    let mut i = 0;
    let mut j = 0;
    for op in opcodes {
        if op.i1 != i || op.j1 != j {
            panic!(
                "opcode ({:?}, {}, {}, {}, {}) does not start at cursor ({}, {})",
                op.tag, op.i1, op.i2, op.j1, op.j2, i, j
            );
        }
        i = op.i2;
        j = op.j2;
    }
    if i != m || j != n {
        panic!("opcode list ends at ({i}, {j}) instead of ({m}, {n})");
    }
}

/// Split an opcode list into hunk groups with `context` lines of equal
/// padding on each side.
///
/// Interior equal opcodes longer than `2 * context` are split and their
/// middle discarded; leading and trailing equal opcodes are trimmed to
/// `context`. A group that is a lone equal opcode (no changes at all) is
/// suppressed.
pub fn group_opcodes(opcodes: &[Opcode], context: usize) -> Vec<Vec<Opcode>> {
    let mut codes: Vec<Opcode> = opcodes.to_vec();
    if codes.is_empty() {
        codes.push(Opcode::new(OpTag::Equal, 0, 1, 0, 1));
    }
    if codes[0].tag == OpTag::Equal {
        let first = &mut codes[0];
        first.i1 = first.i1.max(first.i2.saturating_sub(context));
        first.j1 = first.j1.max(first.j2.saturating_sub(context));
    }
    if codes.last().unwrap().tag == OpTag::Equal {
        let last = codes.last_mut().unwrap();
        last.i2 = last.i2.min(last.i1 + context);
        last.j2 = last.j2.min(last.j1 + context);
    }

    let nn = 2 * context;
    let mut groups: Vec<Vec<Opcode>> = Vec::new();
    let mut group: Vec<Opcode> = Vec::new();
    for code in codes {
        if code.tag == OpTag::Equal && code.i2 - code.i1 > nn {
            group.push(Opcode::new(
                OpTag::Equal,
                code.i1,
                code.i2.min(code.i1 + context),
                code.j1,
                code.j2.min(code.j1 + context),
            ));
            groups.push(std::mem::take(&mut group));
            group.push(Opcode::new(
                OpTag::Equal,
                code.i1.max(code.i2.saturating_sub(context)),
                code.i2,
                code.j1.max(code.j2.saturating_sub(context)),
                code.j2,
            ));
            continue;
        }
        group.push(code);
    }
    if !group.is_empty() && !(group.len() == 1 && group[0].tag == OpTag::Equal) {
        groups.push(group);
    }
    groups
}
