//! Offset pagination for list queries
//!
//! `take` defaults to 30 and must lie in `[1, 50]`; `skip` defaults to 0 and
//! must not be negative. Out-of-range values are rejected, never coerced.

use crate::error::ApiResult;

use super::helpers::clamp_range;

pub const DEFAULT_TAKE: i64 = 30;
pub const MIN_TAKE: i64 = 1;
pub const MAX_TAKE: i64 = 50;
pub const DEFAULT_SKIP: i64 = 0;

/// Validated offset window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub skip: i64,
    pub take: i64,
}

/// Apply defaults and bounds to `skip` / `take` arguments
pub fn parse_page_window(skip: Option<i32>, take: Option<i32>) -> ApiResult<PageWindow> {
    let take = clamp_range(
        take.map(i64::from).unwrap_or(DEFAULT_TAKE),
        MIN_TAKE,
        Some(MAX_TAKE),
        "take",
    )?;
    let skip = clamp_range(skip.map(i64::from).unwrap_or(DEFAULT_SKIP), 0, None, "skip")?;

    Ok(PageWindow { skip, take })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_defaults() {
        let window = parse_page_window(None, None).unwrap();
        assert_eq!(window, PageWindow { skip: 0, take: 30 });
    }

    #[test]
    fn test_explicit_values() {
        let window = parse_page_window(Some(10), Some(50)).unwrap();
        assert_eq!(window, PageWindow { skip: 10, take: 50 });
    }

    #[test]
    fn test_take_zero_rejected() {
        assert_matches!(
            parse_page_window(None, Some(0)),
            Err(ApiError::OutOfRange { .. })
        );
    }

    #[test]
    fn test_take_above_max_rejected() {
        assert_matches!(
            parse_page_window(None, Some(51)),
            Err(ApiError::OutOfRange { .. })
        );
    }

    #[test]
    fn test_negative_skip_rejected() {
        assert_matches!(
            parse_page_window(Some(-1), None),
            Err(ApiError::BelowMinimum { .. })
        );
    }
}
