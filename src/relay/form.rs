//! Form encoding of caller payloads.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// An open, order-preserving payload supplied by the caller.
pub type Payload = Map<String, Value>;

/// Render one payload value the way it is sent in a form field.
///
/// Strings go out as-is, `null` as an empty field, booleans as `True` /
/// `False` (what the upstream's own front end sends), everything else as its
/// JSON text.
pub fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

/// Encode key/value pairs as `application/x-www-form-urlencoded`.
pub fn encode_pairs<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a Value)>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, &form_value(value));
    }
    serializer.finish()
}

/// Encode a whole payload, keeping the caller's key order.
pub fn encode_payload(payload: &Payload) -> String {
    encode_pairs(payload.iter().map(|(k, v)| (k.as_str(), v)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_encode_keeps_order_and_escapes() {
        let p = payload(json!({"kcxx": "高等 数学", "page": 1, "rows": 20}));
        assert_eq!(
            encode_payload(&p),
            "kcxx=%E9%AB%98%E7%AD%89+%E6%95%B0%E5%AD%A6&page=1&rows=20"
        );
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(form_value(&json!(null)), "");
        assert_eq!(form_value(&json!(true)), "True");
        assert_eq!(form_value(&json!(false)), "False");
        assert_eq!(form_value(&json!(2.5)), "2.5");
        assert_eq!(form_value(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn test_boolean_fields_are_capitalized() {
        let p = payload(json!({"sfxsbk": true, "sfct": false}));
        assert_eq!(encode_payload(&p), "sfxsbk=True&sfct=False");
    }

    #[test]
    fn test_empty_payload_is_empty_body() {
        assert_eq!(encode_payload(&Payload::new()), "");
    }
}
