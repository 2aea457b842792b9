//! Strict `application/x-www-form-urlencoded` decoding.
//!
//! Values that do not decode to UTF-8 are refused instead of being replaced
//! with U+FFFD. Repeated keys keep their first value, except the honeypot
//! field, which keeps the first non-empty one so a trailing `password=`
//! cannot blank out a filled trap.

use formgate_core::FieldValues;
use percent_encoding::percent_decode;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormBodyError {
    #[error("expected a {FORM_CONTENT_TYPE} body")]
    UnsupportedContentType,
    #[error("form pair {index} is not valid UTF-8 once decoded")]
    InvalidUtf8 { index: usize },
}

/// True when the media type (parameters ignored) is the urlencoded form type.
pub fn is_form_content_type(value: &str) -> bool {
    value
        .split(';')
        .next()
        .is_some_and(|media| media.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Decode every `name=value` pair in body order.
pub fn decode_pairs(body: &[u8]) -> Result<Vec<(String, String)>, FormBodyError> {
    body.split(|&b| b == b'&')
        .filter(|pair| !pair.is_empty())
        .enumerate()
        .map(|(index, pair)| {
            let (name, value) = match pair.iter().position(|&b| b == b'=') {
                Some(at) => (&pair[..at], &pair[at + 1..]),
                None => (pair, &[][..]),
            };
            let name = decode_component(name).ok_or(FormBodyError::InvalidUtf8 { index })?;
            let value = decode_component(value).ok_or(FormBodyError::InvalidUtf8 { index })?;
            Ok((name, value))
        })
        .collect()
}

/// Fold pairs into field values: first value per key, first non-empty for `trap`.
pub fn collect_fields(pairs: Vec<(String, String)>, trap: Option<&str>) -> FieldValues {
    let mut fields = FieldValues::new();
    for (name, value) in pairs {
        if trap == Some(name.as_str()) {
            let slot = fields.entry(name).or_default();
            if slot.is_empty() {
                *slot = value;
            }
        } else {
            fields.entry(name).or_insert(value);
        }
    }
    fields
}

fn decode_component(raw: &[u8]) -> Option<String> {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    percent_decode(&spaced)
        .decode_utf8()
        .ok()
        .map(|s| s.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plus_and_percent_escapes() {
        let pairs = decode_pairs(b"message=hello+there%21&name=Ad%C3%A1&flag").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("message".to_string(), "hello there!".to_string()),
                ("name".to_string(), "Adá".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn invalid_utf8_is_refused() {
        assert_eq!(
            decode_pairs(b"password=&message=%FF%FE"),
            Err(FormBodyError::InvalidUtf8 { index: 1 })
        );
    }

    #[test]
    fn first_value_wins_for_ordinary_fields() {
        let pairs = decode_pairs(b"message=first&message=second").unwrap();
        let fields = collect_fields(pairs, Some("password"));
        assert_eq!(fields["message"], "first");
    }

    #[test]
    fn filled_trap_survives_later_blank_duplicate() {
        for body in [
            &b"message=hello&password=spamtext&password="[..],
            &b"message=hello&password=&password=spamtext"[..],
        ] {
            let fields = collect_fields(decode_pairs(body).unwrap(), Some("password"));
            assert_eq!(fields["password"], "spamtext", "body {body:?}");
        }
    }

    #[test]
    fn content_type_ignores_parameters() {
        assert!(is_form_content_type("application/x-www-form-urlencoded"));
        assert!(is_form_content_type("Application/X-WWW-Form-Urlencoded; charset=UTF-8"));
        assert!(!is_form_content_type("application/json"));
        assert!(!is_form_content_type("multipart/form-data; boundary=x"));
    }
}
