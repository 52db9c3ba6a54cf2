//! Input validation helpers shared across GraphQL resolvers.

use async_graphql::ID;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// Parse a string made only of ASCII digits.
///
/// Signs, whitespace, decimal points or any other character reject the whole
/// input; a numeric prefix is never accepted. Values beyond `i64` are rejected.
pub fn parse_strict_integer(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse an absolute URL and return its normalized form
pub fn validate_url(s: &str) -> Option<String> {
    Url::parse(s).ok().map(String::from)
}

/// Check that `value` lies in `[min, max]`, or is at least `min` when `max` is absent
pub fn clamp_range(value: i64, min: i64, max: Option<i64>, name: &str) -> ApiResult<i64> {
    match max {
        None if value < min => Err(ApiError::BelowMinimum {
            name: name.to_string(),
            value,
            min,
        }),
        Some(max) if value < min || value > max => Err(ApiError::OutOfRange {
            name: name.to_string(),
            value,
            min,
            max,
        }),
        _ => Ok(value),
    }
}

/// Parse a GraphQL `ID` argument as a store key, failing with a validation error
pub(crate) fn parse_id_arg(field: &str, id: &ID) -> ApiResult<i64> {
    parse_strict_integer(id.as_str()).ok_or_else(|| ApiError::InvalidId {
        field: field.to_string(),
        value: id.as_str().to_string(),
    })
}

/// Render a store key as a GraphQL `ID`
pub(crate) fn to_id(id: i64) -> ID {
    ID(id.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_parse_strict_integer_digits() {
        assert_eq!(parse_strict_integer("0"), Some(0));
        assert_eq!(parse_strict_integer("42"), Some(42));
        assert_eq!(parse_strict_integer("007"), Some(7));
    }

    #[test]
    fn test_parse_strict_integer_rejects_everything_else() {
        for input in ["", "-1", "+1", " 1", "1 ", "1.5", "12abc", "abc", "1e3", "٣"] {
            assert_eq!(parse_strict_integer(input), None, "input {:?}", input);
        }
    }

    #[test]
    fn test_parse_strict_integer_overflow() {
        assert_eq!(parse_strict_integer("99999999999999999999999"), None);
    }

    #[test]
    fn test_validate_url() {
        assert_eq!(validate_url("not a url"), None);
        assert_eq!(validate_url("/relative/path"), None);
        assert_eq!(validate_url(""), None);
        assert_eq!(
            validate_url("https://example.com").as_deref(),
            Some("https://example.com/")
        );
        assert_eq!(
            validate_url("HTTPS://Example.COM/a/../b").as_deref(),
            Some("https://example.com/b")
        );
    }

    #[test]
    fn test_clamp_range() {
        assert_eq!(clamp_range(10, 1, Some(50), "take").unwrap(), 10);
        assert_eq!(clamp_range(1, 1, Some(50), "take").unwrap(), 1);
        assert_eq!(clamp_range(50, 1, Some(50), "take").unwrap(), 50);
        assert_matches!(
            clamp_range(999, 1, Some(50), "take"),
            Err(ApiError::OutOfRange { value: 999, .. })
        );
        assert_matches!(
            clamp_range(0, 1, Some(50), "take"),
            Err(ApiError::OutOfRange { value: 0, .. })
        );
        assert_matches!(
            clamp_range(-1, 0, None, "skip"),
            Err(ApiError::BelowMinimum { value: -1, .. })
        );
        assert_eq!(clamp_range(1_000_000, 0, None, "skip").unwrap(), 1_000_000);
    }

    #[test]
    fn test_parse_id_arg() {
        assert_eq!(parse_id_arg("linkId", &ID::from("12")).unwrap(), 12);
        assert_matches!(
            parse_id_arg("linkId", &ID::from("abc")),
            Err(ApiError::InvalidId { .. })
        );
    }
}
