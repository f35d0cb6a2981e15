// Licensed under the Apache-2.0 license

//! Name canonicalization and formatting helpers.

/// Returns the canonical name of a peripheral instance.
///
/// A trailing maximal run of ASCII digits is stripped, but only if at least
/// one character remains before it. Applying the function to its own output
/// returns it unchanged.
///
/// # Examples
/// ```
/// use registers_generator_c::util::canonical_name;
/// assert_eq!(canonical_name("TIMER0"), "TIMER");
/// assert_eq!(canonical_name("UART12"), "UART");
/// assert_eq!(canonical_name("I2C"), "I2C");
/// assert_eq!(canonical_name("1234"), "1234");
/// ```
pub fn canonical_name(realname: &str) -> &str {
    let stem = realname.trim_end_matches(|c: char| c.is_ascii_digit());
    if stem.is_empty() {
        realname
    } else {
        stem
    }
}

/// Formats a value as an uppercase C hex literal without padding.
///
/// # Examples
/// ```
/// use registers_generator_c::util::c_hex;
/// assert_eq!(c_hex(0), "0x0");
/// assert_eq!(c_hex(0xf0), "0xF0");
/// ```
pub fn c_hex(val: u64) -> String {
    format!("0x{val:X}")
}
