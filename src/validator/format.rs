use std::sync::LazyLock;

use regex::Regex;

// local@label.label, no whitespace and no second '@' anywhere
static FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("format pattern compiles")
});

/// Permissive structural gate: `x@y.z` with no whitespace and exactly one `@`.
///
/// Not an RFC 5322 parser; `a@b..c` passes.
pub fn is_valid_format(address: &str) -> bool {
    FORMAT.is_match(address)
}

/// Splits on the first `@`. Addresses without one come back whole, with an
/// empty domain.
pub fn split_address(address: &str) -> (&str, &str) {
    address.split_once('@').unwrap_or((address, ""))
}
