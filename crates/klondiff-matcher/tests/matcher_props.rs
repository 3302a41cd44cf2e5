//! Universal matcher properties, checked across all three strategies
//! with randomized line arrays.

use bstr::BString;
use klondiff_matcher::unique_lcs::unique_lcs;
use klondiff_matcher::{Algorithm, Block, LineMatcher, OpTag};
use proptest::prelude::*;

const ALGORITHMS: [Algorithm; 3] = [
    Algorithm::Ratcliff,
    Algorithm::Patience,
    Algorithm::Klondike,
];

/// A small pool with deliberate collisions: duplicate lines, lines that
/// differ only in whitespace, and separator runs.
fn line() -> impl Strategy<Value = BString> {
    prop_oneof![
        Just(BString::from("alpha\n")),
        Just(BString::from("beta\n")),
        Just(BString::from("gamma\n")),
        Just(BString::from("  alpha\n")),
        Just(BString::from("alpha  \n")),
        Just(BString::from("----\n")),
        Just(BString::from("---\n")),
        Just(BString::from("\n")),
        Just(BString::from("{\n")),
        Just(BString::from("}\n")),
    ]
}

fn lines() -> impl Strategy<Value = Vec<BString>> {
    proptest::collection::vec(line(), 0..12)
}

/// Coverage, tag shapes, equal-honesty, block monotonicity, and
/// idempotence for one matcher on one input pair.
fn check_universal(algorithm: Algorithm, a: &[BString], b: &[BString]) {
    let mut matcher = LineMatcher::new(algorithm, a, b);

    let blocks = matcher.matching_blocks().to_vec();
    assert_eq!(blocks.last(), Some(&Block::new(a.len(), b.len(), 0)));
    let mut next_a = 0;
    let mut next_b = 0;
    for block in &blocks[..blocks.len() - 1] {
        assert!(block.len >= 1, "interior block with zero length");
        assert!(block.a >= next_a && block.b >= next_b, "blocks not monotone");
        next_a = block.a + block.len;
        next_b = block.b + block.len;
    }

    let opcodes = matcher.opcodes().to_vec();
    let mut i = 0;
    let mut j = 0;
    for op in &opcodes {
        assert_eq!((op.i1, op.j1), (i, j), "opcodes not edge-adjacent");
        assert!(op.i1 <= op.i2 && op.j1 <= op.j2);
        match op.tag {
            OpTag::Delete => assert_eq!(op.j1, op.j2),
            OpTag::Insert => assert_eq!(op.i1, op.i2),
            OpTag::Equal => {
                assert_eq!(op.i2 - op.i1, op.j2 - op.j1);
                assert_eq!(
                    &a[op.i1..op.i2],
                    &b[op.j1..op.j2],
                    "equal opcode over unequal raw lines"
                );
            }
            OpTag::Replace => {}
        }
        i = op.i2;
        j = op.j2;
    }
    assert_eq!((i, j), (a.len(), b.len()), "opcodes do not cover the inputs");

    // repeated calls return the same lists
    assert_eq!(matcher.matching_blocks(), blocks.as_slice());
    assert_eq!(matcher.opcodes(), opcodes.as_slice());
}

proptest! {
    #[test]
    fn universal_properties(a in lines(), b in lines()) {
        for algorithm in ALGORITHMS {
            check_universal(algorithm, &a, &b);
        }
    }

    #[test]
    fn identity_yields_single_equal(a in lines()) {
        prop_assume!(!a.is_empty());
        let m = a.len();
        for algorithm in ALGORITHMS {
            let mut matcher = LineMatcher::new(algorithm, &a, &a);
            prop_assert_eq!(
                matcher.matching_blocks(),
                &[Block::new(0, 0, m), Block::new(m, m, 0)]
            );
            let ops = matcher.opcodes();
            prop_assert_eq!(ops.len(), 1);
            prop_assert_eq!(ops[0].tag, OpTag::Equal);
            prop_assert_eq!((ops[0].i1, ops[0].i2, ops[0].j1, ops[0].j2), (0, m, 0, m));
        }
    }

    #[test]
    fn one_sided_inputs(a in lines()) {
        prop_assume!(!a.is_empty());
        let empty: Vec<BString> = Vec::new();
        for algorithm in ALGORITHMS {
            let mut matcher = LineMatcher::new(algorithm, &empty, &a);
            let ops = matcher.opcodes();
            prop_assert_eq!(ops.len(), 1);
            prop_assert_eq!(ops[0].tag, OpTag::Insert);

            let mut matcher = LineMatcher::new(algorithm, &a, &empty);
            let ops = matcher.opcodes();
            prop_assert_eq!(ops.len(), 1);
            prop_assert_eq!(ops[0].tag, OpTag::Delete);

            let mut matcher = LineMatcher::new(algorithm, &empty, &empty);
            prop_assert!(matcher.opcodes().is_empty());
        }
    }

    #[test]
    fn grouped_opcodes_keep_changes_and_bound_context(
        a in lines(),
        b in lines(),
        context in 1usize..=4,
    ) {
        for algorithm in ALGORITHMS {
            let mut matcher = LineMatcher::new(algorithm, &a, &b);
            let changes: Vec<_> = matcher
                .opcodes()
                .iter()
                .filter(|op| op.tag != OpTag::Equal)
                .copied()
                .collect();
            let groups = matcher.grouped_opcodes(context);
            let grouped_changes: Vec<_> = groups
                .iter()
                .flatten()
                .filter(|op| op.tag != OpTag::Equal)
                .copied()
                .collect();
            prop_assert_eq!(&changes, &grouped_changes);
            for group in &groups {
                for (pos, op) in group.iter().enumerate() {
                    if op.tag == OpTag::Equal {
                        let len = op.i2 - op.i1;
                        if pos == 0 || pos == group.len() - 1 {
                            prop_assert!(len <= context);
                        } else {
                            prop_assert!(len <= 2 * context);
                        }
                    }
                }
            }
        }
    }
}

/// Longest common subsequence length over the elements that occur exactly
/// once in both sequences, by dynamic programming. The oracle for
/// unique_lcs maximality.
fn unique_lcs_oracle(a: &[u32], b: &[u32]) -> usize {
    let count = |seq: &[u32], x: u32| seq.iter().filter(|&&y| y == x).count();
    let fa: Vec<u32> = a
        .iter()
        .copied()
        .filter(|&x| count(a, x) == 1 && count(b, x) == 1)
        .collect();
    let fb: Vec<u32> = b
        .iter()
        .copied()
        .filter(|&x| count(a, x) == 1 && count(b, x) == 1)
        .collect();
    let mut dp = vec![vec![0usize; fb.len() + 1]; fa.len() + 1];
    for i in (0..fa.len()).rev() {
        for j in (0..fb.len()).rev() {
            dp[i][j] = if fa[i] == fb[j] {
                dp[i + 1][j + 1] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }
    dp[0][0]
}

proptest! {
    #[test]
    fn unique_lcs_is_maximal(
        (a, b) in (1usize..10).prop_flat_map(|n| {
            let base: Vec<u32> = (0..n as u32).collect();
            (Just(base.clone()).prop_shuffle(), Just(base).prop_shuffle())
        })
    ) {
        let chain = unique_lcs(&a, &b);
        for w in chain.windows(2) {
            prop_assert!(w[0].0 < w[1].0 && w[0].1 < w[1].1);
        }
        for &(ai, bi) in &chain {
            prop_assert_eq!(a[ai], b[bi]);
        }
        prop_assert_eq!(chain.len(), unique_lcs_oracle(&a, &b));
    }

    #[test]
    fn unique_lcs_maximal_with_duplicates(
        a in proptest::collection::vec(0u32..6, 0..14),
        b in proptest::collection::vec(0u32..6, 0..14),
    ) {
        let chain = unique_lcs(&a, &b);
        for w in chain.windows(2) {
            prop_assert!(w[0].0 < w[1].0 && w[0].1 < w[1].1);
        }
        prop_assert_eq!(chain.len(), unique_lcs_oracle(&a, &b));
    }
}

/// Whitespace-only reformatting and separator-run changes normalize away:
/// klondike sees one equal block where patience sees edits.
fn cosmetic_pair() -> impl Strategy<Value = (BString, BString)> {
    prop_oneof![
        Just(("alpha beta\n", "alpha   beta\n")),
        Just(("alpha beta\n", "alphabeta\n")),
        Just(("----\n", "---------\n")),
        Just(("===\n", "==\n")),
        Just(("foo(x,y)\n", "foo( x , y )\n")),
        Just(("body\n", "body\n")),
        Just(("\n", "  \n")),
    ]
    .prop_map(|(x, y)| (BString::from(x), BString::from(y)))
}

proptest! {
    #[test]
    fn klondike_is_invariant_under_junk_rewrites(
        pairs in proptest::collection::vec(cosmetic_pair(), 1..10)
    ) {
        let a: Vec<BString> = pairs.iter().map(|p| p.0.clone()).collect();
        let b: Vec<BString> = pairs.iter().map(|p| p.1.clone()).collect();
        let m = a.len();
        let mut matcher = LineMatcher::new(Algorithm::Klondike, &a, &b);
        prop_assert_eq!(
            matcher.matching_blocks(),
            &[Block::new(0, 0, m), Block::new(m, m, 0)]
        );
    }
}
