//! Premium features: whole-document transforms

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::{FeatureError, TextBuffer};

fn apply(
    buffer: &mut dyn TextBuffer,
    transform: impl FnOnce(&str) -> Result<String, FeatureError>,
) -> Result<(), FeatureError> {
    let text = buffer.text();
    let next = transform(&text)?;
    buffer.replace_all(next)
}

pub fn to_upper_case(buffer: &mut dyn TextBuffer) -> Result<(), FeatureError> {
    apply(buffer, |t| Ok(t.to_uppercase()))
}

pub fn to_lower_case(buffer: &mut dyn TextBuffer) -> Result<(), FeatureError> {
    apply(buffer, |t| Ok(t.to_lowercase()))
}

pub fn base64_encode(buffer: &mut dyn TextBuffer) -> Result<(), FeatureError> {
    apply(buffer, |t| Ok(STANDARD.encode(t.as_bytes())))
}

/// Decodes the document; leaves it untouched when it is not valid base64 text.
pub fn base64_decode(buffer: &mut dyn TextBuffer) -> Result<(), FeatureError> {
    apply(buffer, |t| {
        let bytes = STANDARD
            .decode(t.trim())
            .map_err(|_| FeatureError::InvalidBase64)?;
        String::from_utf8(bytes).map_err(|_| FeatureError::InvalidBase64)
    })
}
