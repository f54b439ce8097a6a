//! Input parsing shared by the JSON API and the HTML forms.

use std::fmt;

use serde::{
    de::{self, Visitor},
    Deserializer,
};

/// True when `s` is non-empty and made only of ASCII digits.
pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// True when `s` has at least one letter and nothing but letters once
/// whitespace is ignored.
pub fn is_alphabetic_name(s: &str) -> bool {
    let mut letters = s.chars().filter(|c| !c.is_whitespace()).peekable();
    letters.peek().is_some() && letters.all(char::is_alphabetic)
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a non-negative whole number written as plain digits.
pub fn parse_digits(s: &str) -> Option<i64> {
    let s = s.trim();
    if is_digits(s) {
        s.parse().ok()
    } else {
        None
    }
}

/// Parse a signed whole amount such as `200`, `+200` or `-50`.
pub fn parse_signed(s: &str) -> Option<i64> {
    let s = s.trim();
    let digits = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    if is_digits(digits) {
        s.parse().ok()
    } else {
        None
    }
}

/// `None` for blank input, the trimmed text otherwise.
pub fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Deserialize a field that may arrive as a JSON string or number into its
/// raw text, so validation sees exactly what the caller sent.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct RawField;

    impl Visitor<'_> for RawField {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(RawField)
}
