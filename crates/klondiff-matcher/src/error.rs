//! Matcher error types.

/// Errors reportable by matcher constructors.
///
/// Internal invariant violations (non-monotone blocks, non-covering opcode
/// lists) are not represented here: they indicate bugs in the matchers and
/// panic with a diagnostic instead.
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    /// The patience and klondike matchers anchor on normalized lines and
    /// have no junk concept of their own.
    #[error("junk predicates are not supported by this matcher")]
    JunkUnsupported,
}
