//! Tests for the feature gate and the text features behind it

use textpro_core::features::{
    self, feature_tier, FeatureError, FeatureTier, StringBuffer, TextBuffer, FREE_FEATURES,
    LICENSE_REQUIRED, PREMIUM_FEATURES, UNKNOWN_FEATURE,
};

/// Buffer whose writes always fail
struct ReadOnlyBuffer(String);

impl TextBuffer for ReadOnlyBuffer {
    fn text(&self) -> String {
        self.0.clone()
    }

    fn replace_all(&mut self, _text: String) -> Result<(), FeatureError> {
        Err(FeatureError::Write("document is read-only".into()))
    }
}

#[test]
fn test_free_features_run_without_license() {
    let mut buffer = StringBuffer::new("héllo  big\nworld");

    let chars = features::execute("characterCount", false, &mut buffer);
    assert!(chars.success);
    assert_eq!(chars.message, "Character count: 16");

    let words = features::execute("wordCount", false, &mut buffer);
    assert!(words.success);
    assert_eq!(words.message, "Word count: 3");

    assert_eq!(buffer.0, "héllo  big\nworld");
}

#[test]
fn test_premium_features_denied_without_license() {
    for feature in PREMIUM_FEATURES {
        let mut buffer = StringBuffer::new("Some Text");
        let result = features::execute(feature, false, &mut buffer);

        assert!(!result.success, "{feature}");
        assert_eq!(result.message, LICENSE_REQUIRED);
        assert_eq!(buffer.0, "Some Text", "{feature} must not touch the buffer");
    }
}

#[test]
fn test_case_conversion() {
    let mut buffer = StringBuffer::new("Mixed Case");

    let upper = features::execute("toUpperCase", true, &mut buffer);
    assert!(upper.success);
    assert_eq!(upper.message, "Text converted to uppercase");
    assert_eq!(buffer.0, "MIXED CASE");

    let lower = features::execute("toLowerCase", true, &mut buffer);
    assert_eq!(lower.message, "Text converted to lowercase");
    assert_eq!(buffer.into_inner(), "mixed case");
}

#[test]
fn test_base64_encode_then_decode() {
    let mut buffer = StringBuffer::new("hello world");

    let encoded = features::execute("base64Encode", true, &mut buffer);
    assert!(encoded.success);
    assert_eq!(encoded.message, "Text encoded to base64");
    assert_eq!(buffer.0, "aGVsbG8gd29ybGQ=");

    let decoded = features::execute("base64Decode", true, &mut buffer);
    assert!(decoded.success);
    assert_eq!(decoded.message, "Text decoded from base64");
    assert_eq!(buffer.0, "hello world");
}

#[test]
fn test_base64_decode_tolerates_surrounding_whitespace() {
    let mut buffer = StringBuffer::new("  aGk=\n");
    assert!(features::execute("base64Decode", true, &mut buffer).success);
    assert_eq!(buffer.0, "hi");
}

#[test]
fn test_invalid_base64_leaves_buffer_untouched() {
    let mut buffer = StringBuffer::new("not base64 !!");
    let result = features::execute("base64Decode", true, &mut buffer);

    assert!(!result.success);
    assert_eq!(result.message, "Invalid base64 string");
    assert_eq!(buffer.0, "not base64 !!");
}

#[test]
fn test_write_failure_is_reported() {
    let mut buffer = ReadOnlyBuffer("abc".into());
    let result = features::execute("toUpperCase", true, &mut buffer);

    assert!(!result.success);
    assert!(result.message.contains("read-only"));
}

#[test]
fn test_unknown_feature() {
    let mut buffer = StringBuffer::default();
    for premium in [false, true] {
        let result = features::execute("reverse", premium, &mut buffer);
        assert!(!result.success);
        assert_eq!(result.message, UNKNOWN_FEATURE);
    }
}

#[test]
fn test_feature_tiers() {
    for feature in FREE_FEATURES {
        assert_eq!(feature_tier(feature), Some(FeatureTier::Free));
    }
    for feature in PREMIUM_FEATURES {
        assert_eq!(feature_tier(feature), Some(FeatureTier::Premium));
    }
    assert_eq!(feature_tier("reverse"), None);
    assert_eq!(FeatureTier::Premium.to_string(), "Premium");
}
