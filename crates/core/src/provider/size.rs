//! Human-readable size conversion.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static BINARY_SIZE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\d.]+)\s*([KMGT]iB)$").expect("valid size regex"));

/// Convert a binary-prefixed size string like `"1.5 GiB"` to bytes.
///
/// Only KiB, MiB, GiB and TiB are recognized. Decimal units ("MB", "GB")
/// and anything else yield 0.
pub fn parse_binary_size(size: &str) -> u64 {
    let Some(caps) = BINARY_SIZE.captures(size) else {
        return 0;
    };

    let Ok(number) = caps[1].parse::<f64>() else {
        return 0;
    };

    let multiplier: u64 = match &caps[2] {
        "KiB" => 1 << 10,
        "MiB" => 1 << 20,
        "GiB" => 1 << 30,
        "TiB" => 1 << 40,
        _ => return 0,
    };

    (number * multiplier as f64).round() as u64
}

/// Format a byte count as mebibytes with two decimals, e.g. `"1.50 MB"`.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binary_units() {
        assert_eq!(parse_binary_size("1 KiB"), 1024);
        assert_eq!(parse_binary_size("350.2 MiB"), 367_211_315);
        assert_eq!(parse_binary_size("1.5 GiB"), 1_610_612_736);
        assert_eq!(parse_binary_size("2 TiB"), 2_199_023_255_552);
    }

    #[test]
    fn test_parse_without_space() {
        assert_eq!(parse_binary_size("512MiB"), 536_870_912);
    }

    #[test]
    fn test_decimal_units_yield_zero() {
        assert_eq!(parse_binary_size("10 MB"), 0);
        assert_eq!(parse_binary_size("1.2 GB"), 0);
    }

    #[test]
    fn test_malformed_yields_zero() {
        assert_eq!(parse_binary_size(""), 0);
        assert_eq!(parse_binary_size("GiB"), 0);
        assert_eq!(parse_binary_size("1.2.3 GiB"), 0);
        assert_eq!(parse_binary_size(" 1 GiB"), 0);
        assert_eq!(parse_binary_size("1 gib"), 0);
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(0), "0.00 MB");
        assert_eq!(format_megabytes(1_572_864), "1.50 MB");
        assert_eq!(format_megabytes(1_073_741_824), "1024.00 MB");
    }
}
