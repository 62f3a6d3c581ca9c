//! Shared helpers for the black-box test suites. Included via `#[path]` in
//! each suite rather than discovered as its own test binary.

/// Parses a whitespace-separated hex byte dump, as used throughout
/// `SPEC_FULL.md` §8's scenario tables.
#[allow(dead_code)]
pub fn hex(s: &str) -> Vec<u8> {
    s.split_whitespace()
        .map(|b| u8::from_str_radix(b, 16).expect("valid hex byte"))
        .collect()
}
