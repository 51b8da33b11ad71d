use crate::utils::error::{HimayaError, Result};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::Serialize;

// Encoding always pads; decoding tolerates payloads whose `=` were stripped from a query string.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn base64_encode(data: &str) -> String {
    URL_SAFE_LENIENT.encode(data.as_bytes())
}

pub fn base64_decode(encoded: &str) -> Result<String> {
    let bytes = URL_SAFE_LENIENT
        .decode(encoded.trim())
        .map_err(|e| HimayaError::decode(format!("Payload is not valid base64: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| HimayaError::decode(format!("Payload is not valid UTF-8: {}", e)))
}

/// Decodes a request body flagged `isBase64Encoded` by API Gateway, which
/// uses the standard alphabet.
pub fn base64_decode_standard(encoded: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| HimayaError::decode(format!("Body is not valid base64: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| HimayaError::decode(format!("Body is not valid UTF-8: {}", e)))
}

/// Pretty JSON with sorted keys and 4-space indentation.
///
/// Used for log lines, the order text embedded in notifications, and the
/// generated breach table file.
pub fn serialize_pretty<T: Serialize>(data: &T) -> Result<String> {
    let value = sort_keys(serde_json::to_value(data)?);

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    String::from_utf8(buffer).map_err(|e| HimayaError::ConfigError {
        message: format!("Serializer produced invalid UTF-8: {}", e),
    })
}

fn sort_keys(value: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;

    match value {
        Value::Object(map) => {
            let sorted: std::collections::BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_base64_round_trip() {
        for text in ["", "hello", "{\"email_addresses\":[\"a@b.co\"]}", "héllo wörld ✉️"] {
            assert_eq!(base64_decode(&base64_encode(text)).unwrap(), text);
        }
    }

    #[test]
    fn test_base64_uses_url_safe_alphabet() {
        // 標準字母表下此輸入會產生 '/'
        let encoded = base64_encode("\u{7ff}\u{fff}?");
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
    }

    #[test]
    fn test_base64_decode_accepts_missing_padding() {
        assert_eq!(base64_encode("ab"), "YWI=");
        assert_eq!(base64_decode("YWI").unwrap(), "ab");
    }

    #[test]
    fn test_standard_decode_accepts_plus_and_slash() {
        let body = "{\"note\":\"??>>~~\"}";
        let encoded = STANDARD.encode(body);
        assert!(encoded.contains('/') || encoded.contains('+'));

        assert_eq!(base64_decode_standard(&encoded).unwrap(), body);
        assert!(base64_decode(&encoded).is_err());
    }

    #[test]
    fn test_base64_decode_rejects_garbage() {
        let err = base64_decode("not base64!!").unwrap_err();
        assert!(matches!(err, HimayaError::DecodeError { .. }));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_base64_decode_rejects_invalid_utf8() {
        let encoded = URL_SAFE_LENIENT.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(
            base64_decode(&encoded),
            Err(HimayaError::DecodeError { .. })
        ));
    }

    #[test]
    fn test_serialize_pretty_sorts_keys_and_indents() {
        let text = serialize_pretty(&json!({"b": 1, "a": {"d": true, "c": null}})).unwrap();
        assert_eq!(
            text,
            "{\n    \"a\": {\n        \"c\": null,\n        \"d\": true\n    },\n    \"b\": 1\n}"
        );
    }
}
