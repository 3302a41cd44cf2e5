//! Rendering for klondiff: unified-diff output, colordiffrc-driven ANSI
//! styling, and intra-line change highlighting.
//!
//! The matcher crate produces opcode groups; this crate turns them into
//! unified-diff lines ([`unified::unified_diff`]) and streams them
//! through a colorizing [`writer::DiffWriter`] that pairs deleted and
//! inserted lines for sub-line highlighting.

pub mod config;
pub mod intraline;
pub mod term;
pub mod unified;
pub mod writer;

pub use config::{StyleKey, Styles};
pub use unified::{unified_diff, UnifiedOptions};
pub use writer::{DiffWriter, Painter};
