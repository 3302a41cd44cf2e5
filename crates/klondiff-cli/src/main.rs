mod binary;
mod gitargs;

use std::io::{self, Read};
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use klondiff_matcher::{split_lines, Algorithm, LineMatcher};
use klondiff_render::{unified_diff, DiffWriter, Styles, UnifiedOptions};

#[derive(Parser)]
#[command(
    name = "klondiff",
    about = "Line diffs with patience and junk-tolerant klondike matching",
    override_usage = "klondiff [--patience | --difflib | --klondike] <file_a> <file_b>\n       Files can be \"-\" to read from stdin"
)]
struct Cli {
    /// Use the patience difference algorithm
    #[arg(long, group = "matcher")]
    patience: bool,

    /// Use the classical difflib algorithm
    #[arg(long, group = "matcher")]
    difflib: bool,

    /// Use the klondike diff algorithm
    #[arg(long, group = "matcher")]
    klondike: bool,

    /// Two files to compare, or the 7 or 9 arguments git passes to an
    /// external diff program
    #[arg(required = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("klondiff: {e:#}");
            process::exit(2);
        }
    }
}

/// Without an explicit flag the matcher follows the program name, so a
/// `klondiff` (or any `klondi*`) invocation defaults to klondike while
/// other names default to patience.
fn default_algorithm() -> Algorithm {
    let klondike_name = std::env::args()
        .next()
        .map(|argv0| {
            Path::new(&argv0)
                .file_name()
                .map(|name| name.to_string_lossy().starts_with("klondi"))
                .unwrap_or(false)
        })
        .unwrap_or(false);
    if klondike_name {
        Algorithm::Klondike
    } else {
        Algorithm::Patience
    }
}

fn read_input(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("cannot read standard input")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("cannot read '{path}'"))
}

fn run(cli: Cli) -> Result<i32> {
    let algorithm = if cli.klondike {
        Algorithm::Klondike
    } else if cli.difflib {
        Algorithm::Ratcliff
    } else if cli.patience {
        Algorithm::Patience
    } else {
        default_algorithm()
    };

    let color = std::env::var_os("NO_COLOR").is_none();
    let styles = if color { Styles::load() } else { Styles::plain() };
    let stdout = io::stdout().lock();
    let mut writer = DiffWriter::new(stdout, styles, color);

    let Some(pair) = gitargs::interpret(&cli.args, &mut writer)? else {
        eprintln!("You must supply 2 filenames");
        return Ok(2);
    };

    // diffing a path against itself produces nothing
    if pair.path_a == pair.path_b {
        writer.flush()?;
        return Ok(0);
    }

    let data_a = read_input(&pair.path_a)?;
    let data_b = read_input(&pair.path_b)?;

    match binary::classify_pair(&data_a, &data_b) {
        binary::PairKind::BinarySame => {
            writer.flush()?;
            return Ok(0);
        }
        binary::PairKind::BinaryDifferent => {
            writer.flush()?;
            println!("Binary files {} and {} differ", pair.path_a, pair.path_b);
            return Ok(2);
        }
        binary::PairKind::Text => {}
    }

    let a_lines = split_lines(&data_a);
    let b_lines = split_lines(&data_b);
    let mut matcher = LineMatcher::new(algorithm, &a_lines, &b_lines);
    let groups = matcher.grouped_opcodes(3);
    let opts = UnifiedOptions {
        fromfile: &pair.display_a,
        tofile: &pair.display_b,
        ..UnifiedOptions::default()
    };
    for line in unified_diff(&a_lines, &b_lines, &groups, &opts) {
        if line.last() == Some(&b'\n') {
            writer.writeline(&line)?;
        } else {
            // a missing terminator is reported on the following line but
            // colored as part of the same logical line
            let mut full = line.to_vec();
            full.extend_from_slice(b"\n\\ No newline at end of file\n");
            writer.writeline(&full)?;
        }
    }
    writer.flush()?;
    Ok(0)
}
