//! URL pattern matching rules for web resource collections.
//!
//! Patterns come in four shapes: exact (`/a/b`), path prefix (`/a/b/*`),
//! extension (`*.jsp`) and the default pattern (`/`).

/// Returns `true` if `path` is exactly `pattern`.
pub fn is_exact_match(path: &str, pattern: &str) -> bool {
    path == pattern
}

/// Returns `true` if `pattern` is a path-prefix pattern covering `path`.
///
/// For `/a/b/*` the request paths `/a/b/`, `/a/b` (both compared ignoring
/// ASCII case) and anything starting with `/a/b/` match. The deeper-path case
/// is compared case-sensitively.
pub fn is_path_match(path: &str, pattern: &str) -> bool {
    if !(pattern.starts_with('/') && pattern.ends_with("/*")) {
        return false;
    }

    let directory = &pattern[..pattern.len() - 1];
    let bare_directory = &directory[..directory.len() - 1];

    path.eq_ignore_ascii_case(directory)
        || path.eq_ignore_ascii_case(bare_directory)
        || path.starts_with(directory)
}

/// Returns `true` if `pattern` is an extension pattern (`*.ext`) matching `path`.
pub fn is_extension_match(path: &str, pattern: &str) -> bool {
    pattern.starts_with("*.") && path.ends_with(&pattern[1..])
}

/// Picks the longer of two URL patterns. Ties keep `current`.
pub fn longest_url_pattern<'a>(current: &'a str, candidate: &'a str) -> &'a str {
    if candidate.len() > current.len() {
        candidate
    } else {
        current
    }
}
