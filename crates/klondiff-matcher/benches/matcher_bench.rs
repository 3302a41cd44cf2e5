//! Benchmarks comparing the three matching strategies on synthetic input.

use bstr::BString;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use klondiff_matcher::{Algorithm, LineMatcher};

/// A few hundred lines of plausible source text with a scattering of
/// edits: changed lines, inserted blocks, and whitespace-only rewrites.
fn synthetic_pair() -> (Vec<BString>, Vec<BString>) {
    let mut a = Vec::new();
    let mut b = Vec::new();
    for i in 0..400 {
        let line = match i % 10 {
            0 => format!("fn item_{i}() {{\n"),
            1 => format!("    let value = {i};\n"),
            2 => "    // shared comment\n".to_string(),
            3 => format!("    process(value, {i});\n"),
            4 => "}\n".to_string(),
            _ => format!("line {i}\n"),
        };
        a.push(BString::from(line.clone()));
        match i % 37 {
            5 => b.push(BString::from(format!("changed {i}\n"))),
            11 => {
                b.push(BString::from(line.replace(' ', "  ")));
            }
            17 => {
                b.push(BString::from(line));
                b.push(BString::from(format!("inserted {i}\n")));
            }
            _ => b.push(BString::from(line)),
        }
    }
    (a, b)
}

fn bench_matchers(c: &mut Criterion) {
    let (a, b) = synthetic_pair();
    let mut group = c.benchmark_group("opcodes");
    for (name, algorithm) in [
        ("ratcliff", Algorithm::Ratcliff),
        ("patience", Algorithm::Patience),
        ("klondike", Algorithm::Klondike),
    ] {
        group.bench_function(name, |bencher| {
            bencher.iter(|| {
                let mut matcher = LineMatcher::new(algorithm, black_box(&a), black_box(&b));
                black_box(matcher.opcodes().len())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_matchers);
criterion_main!(benches);
