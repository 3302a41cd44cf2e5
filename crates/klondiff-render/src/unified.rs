//! Unified-diff output from grouped opcodes.

use bstr::{BString, ByteSlice};
use klondiff_matcher::{OpTag, Opcode};
use regex::bytes::Regex;

/// Parameters for [`unified_diff`].
///
/// `lineterm` terminates the control lines (`---`, `+++`, `@@`); content
/// lines carry whatever terminator they already have. Set it to `""`
/// when the input lines have no trailing newlines.
pub struct UnifiedOptions<'o> {
    pub fromfile: &'o str,
    pub tofile: &'o str,
    pub fromfiledate: &'o str,
    pub tofiledate: &'o str,
    pub context: usize,
    pub lineterm: &'o str,
    /// When set, each hunk header is suffixed with the most recent line
    /// of `a` before the hunk (plus context) matching this pattern. The
    /// pattern should be anchored, e.g. `^\w`.
    pub function_regex: Option<&'o Regex>,
}

impl Default for UnifiedOptions<'_> {
    fn default() -> Self {
        Self {
            fromfile: "",
            tofile: "",
            fromfiledate: "",
            tofiledate: "",
            context: 3,
            lineterm: "\n",
            function_regex: None,
        }
    }
}

/// Convert a line range to the unified "ed" format (1-based; a count of
/// one is written bare, an empty range starts just before itself).
fn format_range_unified(start: usize, stop: usize) -> String {
    let beginning = start + 1;
    let length = stop - start;
    if length == 1 {
        return beginning.to_string();
    }
    if length == 0 {
        return format!("{},0", start);
    }
    format!("{},{}", beginning, length)
}

/// Render grouped opcodes as unified-diff lines.
///
/// The `---`/`+++` header pair is emitted before the first hunk only; no
/// groups means no output at all.
pub fn unified_diff(
    a: &[BString],
    b: &[BString],
    groups: &[Vec<Opcode>],
    opts: &UnifiedOptions<'_>,
) -> Vec<BString> {
    let mut out: Vec<BString> = Vec::new();

    let function_lines: Vec<usize> = match opts.function_regex {
        Some(re) => (0..a.len()).filter(|&k| re.is_match(&a[k])).collect(),
        None => Vec::new(),
    };
    let mut current_function = 0;

    let mut started = false;
    for group in groups {
        if group.is_empty() {
            continue;
        }
        if !started {
            started = true;
            let fromdate = if opts.fromfiledate.is_empty() {
                String::new()
            } else {
                format!("\t{}", opts.fromfiledate)
            };
            let todate = if opts.tofiledate.is_empty() {
                String::new()
            } else {
                format!("\t{}", opts.tofiledate)
            };
            out.push(BString::from(format!(
                "--- {}{}{}",
                opts.fromfile, fromdate, opts.lineterm
            )));
            out.push(BString::from(format!(
                "+++ {}{}{}",
                opts.tofile, todate, opts.lineterm
            )));
        }

        let first = &group[0];
        let last = &group[group.len() - 1];
        let file1_range = format_range_unified(first.i1, last.i2);
        let file2_range = format_range_unified(first.j1, last.j2);

        let mut function: Vec<u8> = Vec::new();
        if !function_lines.is_empty() {
            while current_function < function_lines.len()
                && function_lines[current_function] < first.i1 + opts.context
            {
                current_function += 1;
            }
            if current_function > 0 {
                function.push(b' ');
                function.extend_from_slice(a[function_lines[current_function - 1]].trim_end());
            }
        }

        let mut header: Vec<u8> =
            format!("@@ -{} +{} @@", file1_range, file2_range).into_bytes();
        header.extend_from_slice(&function);
        header.extend_from_slice(opts.lineterm.as_bytes());
        out.push(BString::from(header));

        for op in group {
            match op.tag {
                OpTag::Equal => {
                    for line in &a[op.i1..op.i2] {
                        out.push(prefixed(b' ', line));
                    }
                }
                OpTag::Replace => {
                    for line in &a[op.i1..op.i2] {
                        out.push(prefixed(b'-', line));
                    }
                    for line in &b[op.j1..op.j2] {
                        out.push(prefixed(b'+', line));
                    }
                }
                OpTag::Delete => {
                    for line in &a[op.i1..op.i2] {
                        out.push(prefixed(b'-', line));
                    }
                }
                OpTag::Insert => {
                    for line in &b[op.j1..op.j2] {
                        out.push(prefixed(b'+', line));
                    }
                }
            }
        }
    }
    out
}

fn prefixed(marker: u8, line: &BString) -> BString {
    let mut out = Vec::with_capacity(line.len() + 1);
    out.push(marker);
    out.extend_from_slice(line);
    BString::from(out)
}
