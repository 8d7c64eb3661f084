//! Directive rules flagging lines that need manual review.

/// A line-level check for a directive that does not carry over cleanly
/// from per-directory to server configuration context.
///
/// Matching is a case-insensitive substring search, the same way Apache
/// treats directive names as case-insensitive.
///
/// # Example
///
/// ```ignore
/// use htconf_core::DirectiveRule;
///
/// pub struct AllowOverride;
///
/// impl DirectiveRule for AllowOverride {
///     fn directive(&self) -> &str { "AllowOverride" }
///     fn code(&self) -> &'static str { "HT100" }
/// }
/// ```
pub trait DirectiveRule: Send + Sync {
    /// Returns the directive name, as it appears in warning comments.
    fn directive(&self) -> &str;

    /// Returns the rule code (e.g., "HT001").
    fn code(&self) -> &'static str;

    /// Returns `true` if the raw line mentions the directive.
    fn matches(&self, line: &[u8]) -> bool {
        contains_token(line, self.directive())
    }
}

/// Type alias for boxed `DirectiveRule` trait objects.
pub type RuleBox = Box<dyn DirectiveRule>;

/// Flags `RedirectBase`, which has no one-to-one `httpd.conf` equivalent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedirectBase;

impl RedirectBase {
    /// Rule code for redirect-base.
    pub const CODE: &'static str = "HT001";

    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DirectiveRule for RedirectBase {
    fn directive(&self) -> &str {
        "RedirectBase"
    }

    fn code(&self) -> &'static str {
        Self::CODE
    }
}

/// Flags a user-supplied directive name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedDirective {
    name: String,
}

impl FlaggedDirective {
    /// Rule code for user-flagged directives.
    pub const CODE: &'static str = "HT002";

    /// Creates a rule for the given directive name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl DirectiveRule for FlaggedDirective {
    fn directive(&self) -> &str {
        &self.name
    }

    fn code(&self) -> &'static str {
        Self::CODE
    }
}

/// Case-insensitive (ASCII) substring search over raw bytes.
///
/// An empty token never matches.
#[must_use]
pub fn contains_token(haystack: &[u8], token: &str) -> bool {
    let needle = token.as_bytes();
    if needle.is_empty() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle))
}
