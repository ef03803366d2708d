//! Conversion between generic header mappings and transport headers

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::error::{HttpError, Result};

/// Generic header mapping; keys are kept exactly as the caller wrote them
pub type GenericHeaders = BTreeMap<String, HeaderField>;

/// Value of a single entry in a [`GenericHeaders`] mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderField {
    /// One value, overwriting anything already set under the name
    Value(String),
    /// Several values, all appended under the name
    Values(Vec<String>),
    /// Declared but undefined; never emitted
    Absent,
}

impl From<&str> for HeaderField {
    fn from(value: &str) -> Self {
        HeaderField::Value(value.to_string())
    }
}

impl From<String> for HeaderField {
    fn from(value: String) -> Self {
        HeaderField::Value(value)
    }
}

impl From<Vec<String>> for HeaderField {
    fn from(values: Vec<String>) -> Self {
        HeaderField::Values(values)
    }
}

impl From<Option<String>> for HeaderField {
    fn from(value: Option<String>) -> Self {
        value.map_or(HeaderField::Absent, HeaderField::Value)
    }
}

/// Build transport headers from a generic mapping.
///
/// Every call starts from a fresh, empty [`HeaderMap`]. Array values are
/// appended one by one, scalar values overwrite, and [`HeaderField::Absent`]
/// entries are skipped.
pub fn to_transport_headers(headers: Option<&GenericHeaders>) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    let Some(headers) = headers else {
        return Ok(map);
    };

    for (name, field) in headers {
        match field {
            HeaderField::Absent => continue,
            HeaderField::Value(value) => {
                map.insert(header_name(name)?, header_value(name, value)?);
            }
            HeaderField::Values(values) => {
                let header = header_name(name)?;
                for value in values {
                    map.append(header.clone(), header_value(name, value)?);
                }
            }
        }
    }

    Ok(map)
}

/// Rebuild a generic mapping from transport headers.
///
/// One entry per header name, holding the first value. Names come back
/// lowercased whatever casing the server sent, so look up `custom-header`
/// rather than `Custom-Header`. Values that are not visible ASCII come back
/// as an empty string.
pub fn from_transport_headers(headers: &HeaderMap) -> GenericHeaders {
    headers
        .keys()
        .map(|name| {
            let value = headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .unwrap_or_default();
            (name.as_str().to_string(), HeaderField::Value(value.to_string()))
        })
        .collect()
}

fn header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| HttpError::InvalidHeader(format!("{name}: {e}")))
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| HttpError::InvalidHeader(format!("{name}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic(entries: &[(&str, HeaderField)]) -> GenericHeaders {
        entries
            .iter()
            .map(|(name, field)| (name.to_string(), field.clone()))
            .collect()
    }

    #[test]
    fn test_absent_input_gives_empty_map() {
        let map = to_transport_headers(None).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_scalar_value_is_set() {
        let headers = generic(&[("X-Test", "test-value".into())]);
        let map = to_transport_headers(Some(&headers)).unwrap();
        assert_eq!(map.get("x-test").unwrap(), "test-value");
    }

    #[test]
    fn test_array_values_are_appended() {
        let headers = generic(&[(
            "Accept",
            vec!["application/json".to_string(), "text/plain".to_string()].into(),
        )]);
        let map = to_transport_headers(Some(&headers)).unwrap();

        let values: Vec<_> = map.get_all("accept").iter().collect();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], "application/json");
        assert_eq!(values[1], "text/plain");
    }

    #[test]
    fn test_absent_value_is_skipped() {
        let headers = generic(&[("X-Skip", HeaderField::Absent), ("X-Keep", "1".into())]);
        let map = to_transport_headers(Some(&headers)).unwrap();

        assert!(!map.contains_key("x-skip"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_invalid_header_name() {
        let headers = generic(&[("bad header", "x".into())]);
        let result = to_transport_headers(Some(&headers));
        assert!(matches!(result, Err(HttpError::InvalidHeader(_))));
    }

    #[test]
    fn test_invalid_header_value() {
        let headers = generic(&[("X-Bad", "line\nbreak".into())]);
        let result = to_transport_headers(Some(&headers));
        assert!(matches!(result, Err(HttpError::InvalidHeader(_))));
    }

    #[test]
    fn test_from_transport_headers_reads_first_value() {
        let mut map = HeaderMap::new();
        map.insert("custom-header", HeaderValue::from_static("test"));
        map.append("set-cookie", HeaderValue::from_static("a=1"));
        map.append("set-cookie", HeaderValue::from_static("b=2"));

        let headers = from_transport_headers(&map);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["custom-header"], HeaderField::Value("test".to_string()));
        assert_eq!(headers["set-cookie"], HeaderField::Value("a=1".to_string()));
    }

    #[test]
    fn test_from_transport_headers_names_are_lowercase() {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("custom-header"),
            HeaderValue::from_static("test"),
        );
        let name = HeaderName::from_bytes(b"Custom-Header").unwrap();
        map.append(name, HeaderValue::from_static("again"));

        let headers = from_transport_headers(&map);
        assert_eq!(headers.len(), 1);
        assert!(headers.contains_key("custom-header"));
        assert!(!headers.contains_key("Custom-Header"));
    }

    #[test]
    fn test_from_transport_headers_opaque_value_defaults_to_empty() {
        let mut map = HeaderMap::new();
        map.insert("x-binary", HeaderValue::from_bytes(&[0xfa, 0xfb]).unwrap());

        let headers = from_transport_headers(&map);
        assert_eq!(headers["x-binary"], HeaderField::Value(String::new()));
    }

    #[test]
    fn test_header_field_serde_shapes() {
        let headers: GenericHeaders = serde_json::from_str(
            r#"{"A": "one", "B": ["two", "three"], "C": null}"#,
        )
        .unwrap();

        assert_eq!(headers["A"], HeaderField::Value("one".to_string()));
        assert_eq!(
            headers["B"],
            HeaderField::Values(vec!["two".to_string(), "three".to_string()])
        );
        assert_eq!(headers["C"], HeaderField::Absent);
    }
}
