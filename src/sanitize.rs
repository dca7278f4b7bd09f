//! Whitelist check for user-supplied commands and prompts

use regex::Regex;
use std::sync::OnceLock;

/// Longest command or prompt accepted from a user.
pub const MAX_INPUT_LEN: usize = 80;

fn safe_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9 ,._\-]{1,80}$").expect("static input pattern is valid")
    })
}

/// True when the trimmed input is 1-80 characters of letters, digits,
/// spaces and `,._-`.
///
/// # Examples
///
/// ```
/// use text2shape::sanitize::is_safe_input;
///
/// assert!(is_safe_input("draw a house, with sun"));
/// assert!(!is_safe_input("circle; rm -rf /"));
/// assert!(!is_safe_input("   "));
/// ```
pub fn is_safe_input(input: &str) -> bool {
    safe_pattern().is_match(input.trim())
}
