//! Base64URL codec used for every byte sequence on the wire
//!
//! Output is always unpadded. Input may be padded or unpadded; anything else
//! (foreign alphabet, impossible length, stray `=`) is rejected.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use crate::webauthn::errors::DecodeError;

/// URL-safe engine that writes no padding and reads only unpadded text
const URL_SAFE_UNPADDED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::RequireNone),
);

/// Reads padded text; the padding must be exactly what the length calls for
const URL_SAFE_PADDED: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::RequireCanonical),
);

/// Encode bytes as unpadded base64url
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_UNPADDED.encode(bytes)
}

/// Decode padded or unpadded base64url text
///
/// # Errors
///
/// Returns `DecodeError::InvalidBase64` if the text contains characters outside
/// the URL-safe alphabet, has an impossible length, or is badly padded.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    let decoded = if text.contains('=') {
        URL_SAFE_PADDED.decode(text)
    } else {
        URL_SAFE_UNPADDED.decode(text)
    };
    decoded.map_err(|e| DecodeError::InvalidBase64 {
        field: String::new(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_length_classes() {
        // 0..=8 covers every raw length mod 3, so every padding shape
        let source: Vec<u8> = (0u8..=255).collect();
        for len in 0..=8 {
            let bytes = &source[250 - len..250];
            let text = encode(bytes);
            assert!(!text.contains('='), "unexpected padding in {text}");
            assert_eq!(decode(&text).unwrap(), bytes);
        }
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_url_safe_alphabet() {
        // 0xfb 0xff maps onto '-' and '_' in the URL-safe alphabet
        assert_eq!(encode(&[0xfb, 0xff]), "-_8");
        assert_eq!(decode("-_8").unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_accepts_padded_input() {
        assert_eq!(decode("YQ==").unwrap(), b"a");
        assert_eq!(decode("YWI=").unwrap(), b"ab");
        assert_eq!(decode("YQ").unwrap(), b"a");
    }

    #[test]
    fn test_rejects_standard_alphabet() {
        assert!(matches!(
            decode("+/8"),
            Err(DecodeError::InvalidBase64 { .. })
        ));
    }

    #[test]
    fn test_rejects_impossible_length_and_padding() {
        assert!(decode("A").is_err());
        assert!(decode("Y===").is_err());
        assert!(decode("Y=Q=").is_err());
        // Padding present but short of a full quantum
        assert!(decode("YQ=").is_err());
        assert!(decode("YWI==").is_err());
    }
}
