//! Git external-diff argument handling.
//!
//! `git` invokes an external diff program with 7 positional arguments
//! (`path old-file old-hex old-mode new-file new-hex new-mode`), or 9
//! when a rename was detected (`... new-path metadata`). In both cases a
//! git-style header is synthesized and the two blob files are diffed
//! under `a/`-`b/` display names.

use std::io::{self, Write};

use klondiff_render::DiffWriter;

/// The resolved inputs: filesystem paths to read plus the names shown in
/// the `---`/`+++` headers.
pub struct FilePair {
    pub path_a: String,
    pub path_b: String,
    pub display_a: String,
    pub display_b: String,
}

impl FilePair {
    fn plain(path_a: &str, path_b: &str) -> Self {
        Self {
            path_a: path_a.to_string(),
            path_b: path_b.to_string(),
            display_a: path_a.to_string(),
            display_b: path_b.to_string(),
        }
    }
}

fn short_hex(hex: &str) -> &str {
    &hex[..hex.len().min(7)]
}

/// Interpret the positional arguments, writing any synthesized git
/// header lines through `writer`. Returns `None` for an unsupported
/// argument count.
pub fn interpret<W: Write>(
    args: &[String],
    writer: &mut DiffWriter<W>,
) -> io::Result<Option<FilePair>> {
    match args.len() {
        2 => Ok(Some(FilePair::plain(&args[0], &args[1]))),
        7 => {
            let mut display_a = format!("a/{}", args[0]);
            let mut display_b = format!("b/{}", args[0]);
            writer.write_meta(format!("diff --git {} {}", display_a, display_b).as_bytes())?;

            let mut a_hex = args[2].as_str();
            let mut b_hex = args[5].as_str();
            let mut mode = args[3].as_str();
            if args[1] == "/dev/null" {
                writer.write_meta(format!("new file mode {}", args[6]).as_bytes())?;
                a_hex = "0000000";
                mode = "";
                display_a = "/dev/null".to_string();
            }
            if args[4] == "/dev/null" {
                writer.write_meta(format!("deleted file mode {}", args[3]).as_bytes())?;
                b_hex = "0000000";
                mode = "";
                display_b = "/dev/null".to_string();
            }
            let index = if mode.is_empty() {
                format!("index {}..{}", short_hex(a_hex), short_hex(b_hex))
            } else {
                format!("index {}..{} {}", short_hex(a_hex), short_hex(b_hex), mode)
            };
            writer.write_meta(index.as_bytes())?;

            Ok(Some(FilePair {
                path_a: args[1].clone(),
                path_b: args[4].clone(),
                display_a,
                display_b,
            }))
        }
        9 => {
            // rename form (git diff -M): old path, blobs, new path, and a
            // trailing metadata line to pass through
            let display_a = format!("a/{}", args[0]);
            let display_b = format!("b/{}", args[7]);
            writer.write_meta(format!("diff --git {} {}", display_a, display_b).as_bytes())?;
            writer.write_meta(args[8].trim().as_bytes())?;
            Ok(Some(FilePair {
                path_a: args[1].clone(),
                path_b: args[4].clone(),
                display_a,
                display_b,
            }))
        }
        _ => Ok(None),
    }
}
