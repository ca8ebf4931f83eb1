//! Typed field access on a `CommandMap`.

use crate::codec::CommandMap;
use serde_json::Value;

/// Why a field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("missing field `{0}`")]
    Missing(&'static str),
    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },
    #[error("`{field}[{index}]` is invalid: {cause}")]
    Element {
        field: &'static str,
        index: usize,
        cause: Box<FieldError>,
    },
}

impl FieldError {
    /// Wrap an error raised inside element `index` of array `field`.
    pub(crate) fn in_element(self, field: &'static str, index: usize) -> Self {
        FieldError::Element {
            field,
            index,
            cause: Box::new(self),
        }
    }
}

pub(crate) fn require_str<'a>(map: &'a CommandMap, field: &'static str) -> Result<&'a str, FieldError> {
    match map.get(field) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(FieldError::WrongType {
            field,
            expected: "a string",
        }),
        None => Err(FieldError::Missing(field)),
    }
}

/// String value of `field`, `None` when absent or not a string.
pub(crate) fn optional_str<'a>(map: &'a CommandMap, field: &'static str) -> Option<&'a str> {
    map.get(field).and_then(Value::as_str)
}

pub(crate) fn require_array<'a>(
    map: &'a CommandMap,
    field: &'static str,
) -> Result<&'a [Value], FieldError> {
    match map.get(field) {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(FieldError::WrongType {
            field,
            expected: "an array",
        }),
        None => Err(FieldError::Missing(field)),
    }
}

pub(crate) fn as_object<'a>(
    value: &'a Value,
    field: &'static str,
) -> Result<&'a CommandMap, FieldError> {
    value.as_object().ok_or(FieldError::WrongType {
        field,
        expected: "an object",
    })
}

/// Every element of array `field` as a string; any non-string fails.
pub(crate) fn require_string_array(
    map: &CommandMap,
    field: &'static str,
) -> Result<Vec<String>, FieldError> {
    require_array(map, field)?
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::String(s) => Ok(s.clone()),
            _ => Err(FieldError::WrongType {
                field,
                expected: "a string",
            }
            .in_element(field, index)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> CommandMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_require_str() {
        let m = map(json!({"Name": "ls", "Count": 3}));
        assert_eq!(require_str(&m, "Name"), Ok("ls"));
        assert_eq!(
            require_str(&m, "Count"),
            Err(FieldError::WrongType {
                field: "Count",
                expected: "a string"
            })
        );
        assert_eq!(require_str(&m, "Other"), Err(FieldError::Missing("Other")));
    }

    #[test]
    fn test_optional_str_ignores_wrong_type() {
        let m = map(json!({"Flag": true, "Name": "x"}));
        assert_eq!(optional_str(&m, "Flag"), None);
        assert_eq!(optional_str(&m, "Name"), Some("x"));
        assert_eq!(optional_str(&m, "Missing"), None);
    }

    #[test]
    fn test_string_array() {
        let m = map(json!({"Cmd": ["ls", "-al"], "Mixed": ["ls", 1], "Flat": "ls"}));
        assert_eq!(
            require_string_array(&m, "Cmd"),
            Ok(vec!["ls".to_string(), "-al".to_string()])
        );

        let err = require_string_array(&m, "Mixed").unwrap_err();
        assert!(matches!(err, FieldError::Element { field: "Mixed", index: 1, .. }));
        assert_eq!(err.to_string(), "`Mixed[1]` is invalid: field `Mixed` must be a string");

        assert!(matches!(
            require_string_array(&m, "Flat"),
            Err(FieldError::WrongType { .. })
        ));
    }
}
