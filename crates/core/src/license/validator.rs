use regex::Regex;
use std::sync::OnceLock;

/// Grouped hexadecimal token: 8-4-4-4-12 hex digits, case-insensitive.
pub fn is_valid_license_key(key: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
            .expect("license key pattern compiles")
    });
    re.is_match(key)
}
