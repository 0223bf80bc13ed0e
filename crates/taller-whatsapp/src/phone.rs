// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recipient number normalization.

/// Strips every non-digit and prefixes `country_code` unless the digits
/// already start with it.
///
/// `normalize_phone("11 2345 6789", "54")` is `"541123456789"`: the digits are
/// kept as written, no mobile `9` or extra area digit is inserted.
pub fn normalize_phone(raw: &str, country_code: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.starts_with(country_code) {
        digits
    } else {
        format!("{country_code}{digits}")
    }
}
