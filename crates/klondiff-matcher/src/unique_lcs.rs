//! Longest common subsequence over elements unique to both sides.
//!
//! Uses patience sorting: candidate pairs are dealt onto piles keyed by
//! their position in `a`, and the chain is reconstructed from backpointers.
//! Restricting the match to unique elements keeps common boilerplate lines
//! from dominating the result. See Bentley/Cohen on patience diff.

use std::collections::HashMap;
use std::hash::Hash;

/// Find the longest common subsequence restricted to elements that occur
/// exactly once in `a` and exactly once in `b`.
///
/// Returns `(a_index, b_index)` pairs, strictly increasing in both
/// coordinates. Empty when the two sides share no uniquely-occurring
/// element.
pub fn unique_lcs<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<(usize, usize)> {
    // index[element] = position in a, or None once seen twice
    let mut index: HashMap<&T, Option<usize>> = HashMap::with_capacity(a.len());
    for (i, line) in a.iter().enumerate() {
        index
            .entry(line)
            .and_modify(|slot| *slot = None)
            .or_insert(Some(i));
    }

    // btoa[i] = position in a of b[i], for elements occurring exactly once
    // in both sequences
    let mut btoa: Vec<Option<usize>> = vec![None; b.len()];
    let mut seen_in_b: HashMap<&T, usize> = HashMap::new();
    for (pos, line) in b.iter().enumerate() {
        let Some(&Some(apos)) = index.get(line) else {
            continue;
        };
        if let Some(&prev) = seen_in_b.get(line) {
            // the element repeats in b, so the earlier candidate is invalid
            btoa[prev] = None;
            index.remove(line);
        } else {
            seen_in_b.insert(line, pos);
            btoa[pos] = Some(apos);
        }
    }

    // Patience sorting over the surviving candidates. `stacks` holds the
    // a-position at the tail of each pile, `lasts` the b-position of that
    // tail; both stay sorted so the pile can be found by binary search.
    let mut backpointers: Vec<Option<usize>> = vec![None; b.len()];
    let mut stacks: Vec<usize> = Vec::new();
    let mut lasts: Vec<usize> = Vec::new();
    let mut k = 0;
    for (bpos, apos) in btoa.iter().enumerate() {
        let Some(apos) = *apos else { continue };
        if !stacks.is_empty() && stacks[stacks.len() - 1] < apos {
            // fast path: the candidate goes past every pile
            k = stacks.len();
        } else if !stacks.is_empty()
            && stacks[k] < apos
            && (k == stacks.len() - 1 || stacks[k + 1] > apos)
        {
            // fast path: the candidate lands right after the previous pile
            k += 1;
        } else {
            k = stacks.partition_point(|&tail| tail < apos);
        }
        if k > 0 {
            backpointers[bpos] = Some(lasts[k - 1]);
        }
        if k < stacks.len() {
            stacks[k] = apos;
            lasts[k] = bpos;
        } else {
            stacks.push(apos);
            lasts.push(bpos);
        }
    }

    let Some(&last) = lasts.last() else {
        return Vec::new();
    };
    let mut result = Vec::new();
    let mut cursor = Some(last);
    while let Some(bpos) = cursor {
        result.push((btoa[bpos].expect("pile tails map to valid candidates"), bpos));
        cursor = backpointers[bpos];
    }
    result.reverse();
    result
}
