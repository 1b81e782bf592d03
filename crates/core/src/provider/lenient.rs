//! Forgiving field decoders for upstream JSON.
//!
//! Upstreams disagree on whether numbers are numbers or strings, and sometimes
//! send `null`. These decoders never fail: anything unusable becomes the default.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

impl Loose {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Loose::Int(n) => Some(*n),
            Loose::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Loose::Text(s) => parse_int_prefix(s),
            _ => None,
        }
    }
}

/// Parse the leading integer of a string, like `"42 peers"` -> 42.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

fn loose_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<Loose>::deserialize(deserializer)?.and_then(|v| v.as_i64()))
}

/// Non-negative integer, 0 when missing or unparseable.
pub fn u64_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(loose_i64(deserializer)?.unwrap_or(0).max(0) as u64)
}

/// Non-negative peer count, 0 when missing or unparseable.
pub fn u32_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = loose_i64(deserializer)?.unwrap_or(0);
    Ok(value.clamp(0, u32::MAX as i64) as u32)
}

/// Signed integer, `None` when missing or unparseable.
pub fn optional_i64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    loose_i64(deserializer)
}

/// String from either a string or a number; empty otherwise.
pub fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) => s,
        Some(Loose::Int(n)) => n.to_string(),
        Some(Loose::Float(f)) => f.to_string(),
        _ => String::new(),
    })
}

/// String, empty when missing or not a string.
pub fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(optional_string(deserializer)?.unwrap_or_default())
}

/// String, `None` when missing or not a string.
pub fn optional_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(s)) => Some(s),
        _ => None,
    })
}

/// Boolean, false when missing or not a boolean.
pub fn bool_or_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaybeBool {
        Bool(bool),
        #[allow(dead_code)]
        Other(IgnoredAny),
    }

    Ok(matches!(
        Option::<MaybeBool>::deserialize(deserializer)?,
        Some(MaybeBool::Bool(true))
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "u64_or_zero")]
        size: u64,
        #[serde(default, deserialize_with = "u32_or_zero")]
        seeders: u32,
        #[serde(default, deserialize_with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "optional_i64")]
        episode: Option<i64>,
        #[serde(default, deserialize_with = "bool_or_false")]
        flag: bool,
        #[serde(default, deserialize_with = "string_or_empty")]
        name: String,
        #[serde(default, deserialize_with = "optional_string")]
        group: Option<String>,
    }

    fn sample(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_numbers_as_numbers() {
        let s = sample(r#"{"size": 1024, "seeders": 5, "id": 77, "episode": 3, "flag": true}"#);
        assert_eq!(s.size, 1024);
        assert_eq!(s.seeders, 5);
        assert_eq!(s.id, "77");
        assert_eq!(s.episode, Some(3));
        assert!(s.flag);
    }

    #[test]
    fn test_numbers_as_strings() {
        let s = sample(r#"{"size": "1073741824", "seeders": "12", "id": "9001"}"#);
        assert_eq!(s.size, 1_073_741_824);
        assert_eq!(s.seeders, 12);
        assert_eq!(s.id, "9001");
    }

    #[test]
    fn test_missing_and_null_default() {
        let s = sample(r#"{"size": null, "episode": null, "flag": null}"#);
        assert_eq!(s.size, 0);
        assert_eq!(s.seeders, 0);
        assert!(s.id.is_empty());
        assert_eq!(s.episode, None);
        assert!(!s.flag);
    }

    #[test]
    fn test_garbage_degrades_to_default() {
        let s =
            sample(r#"{"size": "n/a", "seeders": -4, "id": [1], "episode": {}, "flag": "yes"}"#);
        assert_eq!(s.size, 0);
        assert_eq!(s.seeders, 0);
        assert!(s.id.is_empty());
        assert_eq!(s.episode, None);
        assert!(!s.flag);
    }

    #[test]
    fn test_strings_only_accept_strings() {
        let s = sample(r#"{"name": "Show", "group": "Subs"}"#);
        assert_eq!(s.name, "Show");
        assert_eq!(s.group.as_deref(), Some("Subs"));

        let s = sample(r#"{"name": null, "group": 7}"#);
        assert!(s.name.is_empty());
        assert_eq!(s.group, None);

        let s = sample(r#"{"name": {"nested": true}, "group": [1]}"#);
        assert!(s.name.is_empty());
        assert_eq!(s.group, None);
    }

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  7 peers"), Some(7));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("1.9"), Some(1));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
    }
}
