//! Lexical extraction of candidate addresses from free-form text.

/// Splits `raw` into one candidate per non-blank line, preserving order.
///
/// A line written as `Display Name <addr>` yields the trimmed text between the
/// brackets; anything else yields the trimmed line. No validation happens
/// here, so `"< >"` produces an empty candidate that later fails the format
/// check.
pub fn extract(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| bracketed(line).unwrap_or(line).trim().to_string())
        .collect()
}

/// Returns the first non-empty `<...>` span of `line`, brackets excluded.
///
/// Scans left to right: each `<` is paired with the first `>` that follows
/// it. An empty pair (`<>`) is skipped and the scan resumes at the next `<`.
fn bracketed(line: &str) -> Option<&str> {
    let mut offset = 0;
    while let Some(open) = line[offset..].find('<').map(|i| offset + i) {
        let start = open + 1;
        let close = start + line[start..].find('>')?;
        if close > start {
            return Some(&line[start..close]);
        }
        offset = start;
    }
    None
}
