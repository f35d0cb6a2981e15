// Licensed under the Apache-2.0 license

//! Text cleanup and numeric conversion for SVD element contents.

use xmltree::Element;

/// Joins multi-line text into a single line, trimming each line.
///
/// ```
/// use registers_svd::text::collapse_whitespace;
/// assert_eq!(collapse_whitespace("  Control\n     register  "), "Control register");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the collapsed text of the child element `name`, if present and non-empty.
pub fn child_text(element: &Element, name: &str) -> Option<String> {
    let text = element.get_child(name)?.get_text()?;
    let text = collapse_whitespace(&text);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Like [`child_text`] but defaults to an empty string.
pub fn child_text_or_empty(element: &Element, name: &str) -> String {
    child_text(element, name).unwrap_or_default()
}

/// Parses a hexadecimal value, with or without a `0x` prefix.
///
/// Register sizes, address offsets and reset values are always hex in the
/// documents this tool consumes, so `"20"` is 0x20.
pub fn parse_hex(text: &str) -> Option<u64> {
    let text = text.trim();
    let digits = strip_hex_prefix(text).unwrap_or(text);
    u64::from_str_radix(&digits.replace('_', ""), 16).ok()
}

/// Parses a decimal value, or a hex one when prefixed with `0x`.
pub fn parse_dec(text: &str) -> Option<u64> {
    let text = text.trim();
    match strip_hex_prefix(text) {
        Some(digits) => u64::from_str_radix(digits, 16).ok(),
        None => text.parse().ok(),
    }
}

fn strip_hex_prefix(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}
