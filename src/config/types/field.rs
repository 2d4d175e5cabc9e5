//! Type-safe config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config field, e.g. `watch.root`.
///
/// Sections declare their paths as constants so diagnostics name the same
/// key the user wrote:
///
/// ```ignore
/// const ROOT: FieldPath = FieldPath::new("watch.root");
/// diag.error(ROOT, "directory not found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}
