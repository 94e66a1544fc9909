//! UTF-8-safe string truncation
//!
//! Page titles feed directly into output filenames, and titles routinely
//! contain multi-byte characters (typographic dashes, CJK text, emoji).
//! Truncating those by byte index can split a character and panic, so all
//! title capping goes through the character-aware helper here.

/// Safely truncate a string to a maximum number of CHARACTERS (not bytes).
///
/// Respects UTF-8 character boundaries and never panics, even with
/// multi-byte characters.
///
/// # Arguments
/// * `s` - String slice to truncate
/// * `max_chars` - Maximum number of Unicode characters (not bytes)
///
/// # Returns
/// * String slice containing at most `max_chars` characters, or the full
///   string if it's shorter than `max_chars`
///
/// # Examples
/// ```
/// # use sitescribe::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
///
/// // Multi-byte characters count as one character each
/// assert_eq!(safe_truncate_chars("très élégant", 4), "très");
///
/// // String shorter than max_chars
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s, // String has fewer than max_chars characters
        Some((byte_idx, _)) => &s[..byte_idx], // Slice at char boundary
    }
}
