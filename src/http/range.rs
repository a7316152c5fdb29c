//! HTTP Range request resolution module
//!
//! Single byte-range only. Bounds are inclusive offsets, with the twist that
//! open-ended and suffix forms resolve their upper bound to the payload length
//! itself rather than to its last index. A window whose upper bound equals the
//! length is served as a full response.

/// Prefix a `Range` header must carry to be considered at all
pub const RANGE_UNIT_PREFIX: &str = "bytes=";

/// Resolved byte window, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteWindow {
    pub lower: usize,
    pub upper: usize,
}

/// How a request is answered once its range has been resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// 200 with the whole payload
    Full,
    /// 206 with `lower..=upper`
    Partial { lower: usize, upper: usize },
    /// 416, upper bound past the payload length
    NotSatisfiable,
}

impl RangeOutcome {
    /// Classify a resolved window against the payload length
    ///
    /// The `upper > total` check runs first, so an inverted window such as
    /// `20-15` on a 10 byte payload is still unsatisfiable.
    pub const fn classify(window: Option<ByteWindow>, total: usize) -> Self {
        match window {
            None => Self::Full,
            Some(w) if w.upper > total => Self::NotSatisfiable,
            Some(w) if w.upper == total => Self::Full,
            // An inverted window inside the payload has no partial form
            Some(w) if w.lower > w.upper => Self::Full,
            Some(w) => Self::Partial {
                lower: w.lower,
                upper: w.upper,
            },
        }
    }

    /// Bytes transmitted for this outcome
    pub const fn content_length(self, total: usize) -> usize {
        match self {
            Self::Full => total,
            Self::Partial { lower, upper } => upper - lower + 1,
            Self::NotSatisfiable => 0,
        }
    }
}

/// Whether the request carries a byte `Range` header
pub fn is_range_request(range_header: Option<&str>) -> bool {
    range_header.is_some_and(|h| h.starts_with(RANGE_UNIT_PREFIX))
}

/// Resolve a `Range` header against a payload of `total` bytes
///
/// Supported forms after `bytes=`:
/// - `a-b` - explicit window
/// - `a-` or `a` - from `a`, upper bound is `total`
/// - `-b` - last `b` bytes, upper bound is `total`
///
/// Anything else yields `None` and the request is served in full. The window
/// is returned as written, even when `lower > upper`; [`RangeOutcome::classify`]
/// decides what that means.
///
/// # Examples
/// ```
/// use memserve::http::range::{resolve_range, ByteWindow};
///
/// assert_eq!(resolve_range(Some("bytes=0-4"), 10), Some(ByteWindow { lower: 0, upper: 4 }));
/// assert_eq!(resolve_range(Some("bytes=-3"), 10), Some(ByteWindow { lower: 7, upper: 10 }));
/// assert_eq!(resolve_range(Some("items=0-4"), 10), None);
/// ```
pub fn resolve_range(range_header: Option<&str>, total: usize) -> Option<ByteWindow> {
    let spec = range_header?.strip_prefix(RANGE_UNIT_PREFIX)?;

    let parts: Vec<&str> = spec.split('-').map(str::trim).collect();
    let window = match parts.as_slice() {
        [start] => ByteWindow {
            lower: parse_offset(start)?,
            upper: total,
        },
        ["", ""] => return None,
        ["", suffix] => ByteWindow {
            lower: total.saturating_sub(parse_offset(suffix)?),
            upper: total,
        },
        [start, ""] => ByteWindow {
            lower: parse_offset(start)?,
            upper: total,
        },
        [start, end] => ByteWindow {
            lower: parse_offset(start)?,
            upper: parse_offset(end)?,
        },
        _ => return None,
    };

    Some(window)
}

fn parse_offset(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(lower: usize, upper: usize) -> Option<ByteWindow> {
        Some(ByteWindow { lower, upper })
    }

    #[test]
    fn test_no_range() {
        assert_eq!(resolve_range(None, 100), None);
        assert!(!is_range_request(None));
    }

    #[test]
    fn test_other_unit_ignored() {
        assert_eq!(resolve_range(Some("items=0-9"), 100), None);
        assert!(!is_range_request(Some("items=0-9")));
        assert!(is_range_request(Some("bytes=0-9")));
    }

    #[test]
    fn test_explicit_window() {
        assert_eq!(resolve_range(Some("bytes=0-9"), 100), window(0, 9));
        assert_eq!(resolve_range(Some("bytes= 10 - 19 "), 100), window(10, 19));
    }

    #[test]
    fn test_open_and_bare_forms_end_at_length() {
        assert_eq!(resolve_range(Some("bytes=5-"), 10), window(5, 10));
        assert_eq!(resolve_range(Some("bytes=5"), 10), window(5, 10));
    }

    #[test]
    fn test_suffix() {
        assert_eq!(resolve_range(Some("bytes=-3"), 10), window(7, 10));
        assert_eq!(resolve_range(Some("bytes=-50"), 10), window(0, 10));
    }

    #[test]
    fn test_malformed() {
        assert_eq!(resolve_range(Some("bytes=a-b"), 100), None);
        assert_eq!(resolve_range(Some("bytes=-"), 100), None);
        assert_eq!(resolve_range(Some("bytes="), 100), None);
        assert_eq!(resolve_range(Some("bytes=1-2-3"), 100), None);
        assert_eq!(resolve_range(Some("bytes=0-9,20-29"), 100), None);
        assert_eq!(resolve_range(Some("bytes=-5-"), 100), None);
        assert_eq!(resolve_range(Some("bytes=+1-4"), 100), None);
    }

    #[test]
    fn test_inverted_window_kept_raw() {
        assert_eq!(resolve_range(Some("bytes=9-2"), 100), window(9, 2));
        assert_eq!(resolve_range(Some("bytes=20-15"), 10), window(20, 15));
    }

    #[test]
    fn test_classify_inverted_window() {
        assert_eq!(
            RangeOutcome::classify(window(20, 15), 10),
            RangeOutcome::NotSatisfiable
        );
        assert_eq!(RangeOutcome::classify(window(9, 2), 100), RangeOutcome::Full);
    }

    #[test]
    fn test_classify() {
        assert_eq!(RangeOutcome::classify(None, 10), RangeOutcome::Full);
        assert_eq!(
            RangeOutcome::classify(window(0, 9), 10),
            RangeOutcome::Partial { lower: 0, upper: 9 }
        );
        assert_eq!(RangeOutcome::classify(window(5, 10), 10), RangeOutcome::Full);
        assert_eq!(
            RangeOutcome::classify(window(0, 999), 10),
            RangeOutcome::NotSatisfiable
        );
    }

    #[test]
    fn test_content_length() {
        assert_eq!(RangeOutcome::Full.content_length(10), 10);
        assert_eq!(
            RangeOutcome::Partial { lower: 2, upper: 4 }.content_length(10),
            3
        );
        assert_eq!(RangeOutcome::NotSatisfiable.content_length(10), 0);
    }
}
