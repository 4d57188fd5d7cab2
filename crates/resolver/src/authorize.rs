//! Execution group authorization.

use covenant_types::ExecPattern;

/// Check a requested org sequence against a contract's registered execution
/// patterns.
///
/// The first pattern with equal length and element-wise equality authorizes
/// the request; when no pattern matches, the request is unauthorized. The
/// outcome is a boolean, not an error: callers surface a `false` as an
/// authorization failure, distinct from not-found conditions.
pub fn authorize(patterns: &[ExecPattern], requested: &[String]) -> bool {
    patterns.iter().any(|pattern| pattern.matches(requested))
}
