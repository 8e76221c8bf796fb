//! Engineering value parsing and formatting.
//!
//! The editor stores component values either as plain numbers or as strings
//! with an SI suffix ("4.7k", "100n"). Suffixes follow the usual electronics
//! convention: `m` is milli and `MEG` is mega.

/// Multipliers, longest suffix first so "MEG" wins over "M".
const SUFFIXES: &[(&str, f64)] = &[
    ("MEG", 1e6),
    ("T", 1e12),
    ("G", 1e9),
    ("K", 1e3),
    ("M", 1e-3),
    ("U", 1e-6),
    ("N", 1e-9),
    ("P", 1e-12),
    ("F", 1e-15),
];

/// Parse a value with an optional SI suffix.
pub fn parse_value(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if let Ok(v) = trimmed.parse::<f64>() {
        return Some(v);
    }

    let upper = trimmed.to_ascii_uppercase();
    for &(suffix, multiplier) in SUFFIXES {
        if let Some(number) = upper.strip_suffix(suffix) {
            return number.trim_end().parse::<f64>().ok().map(|v| v * multiplier);
        }
    }
    None
}

/// Format a value with an SI prefix, for diagnostics.
pub fn format_value(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    const STEPS: &[(f64, &str)] = &[
        (1e12, "T"),
        (1e9, "G"),
        (1e6, "M"),
        (1e3, "k"),
        (1.0, ""),
        (1e-3, "m"),
        (1e-6, "u"),
        (1e-9, "n"),
        (1e-12, "p"),
    ];

    let magnitude = value.abs();
    for &(scale, prefix) in STEPS {
        if magnitude >= scale {
            return format!("{:.3}{}", value / scale, prefix);
        }
    }
    format!("{value:.3e}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|v| (v - b).abs() <= b.abs() * 1e-12)
    }

    #[test]
    fn test_parse_plain() {
        assert_eq!(parse_value("1.5"), Some(1.5));
        assert_eq!(parse_value("-2.5"), Some(-2.5));
        assert_eq!(parse_value(" 1e-3 "), Some(1e-3));
    }

    #[test]
    fn test_parse_suffixed() {
        assert!(close(parse_value("1k"), 1e3));
        assert!(close(parse_value("4.7K"), 4.7e3));
        assert!(close(parse_value("10MEG"), 10e6));
        assert!(close(parse_value("10m"), 10e-3));
        assert!(close(parse_value("100n"), 100e-9));
        assert!(close(parse_value("2.2u"), 2.2e-6));
        assert!(close(parse_value("10p"), 10e-12));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_value("ohms"), None);
        assert_eq!(parse_value(""), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_value(1000.0), "1.000k");
        assert_eq!(format_value(0.02), "20.000m");
        assert_eq!(format_value(1e-9), "1.000n");
        assert_eq!(format_value(0.0), "0");
    }
}
