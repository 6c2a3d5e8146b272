//! HTTP Range request parsing module
//!
//! Only a single closed interval in bytes is understood: `bytes=<start>-<end>`.
//! Suffix ranges, open ranges and multi-range requests are treated as malformed,
//! and the caller serves the whole file for them.

/// Requested byte window
///
/// `length` is signed: `bytes=10-5` yields a negative length, which is kept so
/// that the bound check can reject it with 416.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte to send
    pub offset: u64,
    /// Number of bytes to send, `end - start + 1`
    pub length: i64,
}

impl ByteRange {
    /// Build a range from inclusive bounds
    ///
    /// Returns `None` when a bound does not fit in `i64`.
    pub fn from_bounds(start: u64, end: u64) -> Option<Self> {
        let start_signed = i64::try_from(start).ok()?;
        let end_signed = i64::try_from(end).ok()?;
        Some(Self {
            offset: start,
            length: end_signed - start_signed + 1,
        })
    }

    /// Validate the range against a file size
    ///
    /// Returns `(offset, length)` when `length >= 0` and `offset + length <= file_size`.
    pub fn satisfiable_within(&self, file_size: u64) -> Option<(u64, u64)> {
        let length = u64::try_from(self.length).ok()?;
        let end = self.offset.checked_add(length)?;
        (end <= file_size).then_some((self.offset, length))
    }

    /// `Content-Range` value: `<offset>-<offset + length - 1>`
    pub fn content_range(&self) -> String {
        let first = i128::from(self.offset);
        let last = first + i128::from(self.length) - 1;
        format!("{first}-{last}")
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Well-formed single range (may still be unsatisfiable for the file)
    Valid(ByteRange),
    /// Header present but not understood, serve the full file
    Malformed,
    /// No Range header
    None,
}

/// Parse the value of a `Range` header
///
/// # Examples
/// ```
/// use quittable_httpd::http::range::{parse_range_header, ByteRange, RangeParseResult};
///
/// let result = parse_range_header(Some("bytes=0-99"));
/// assert_eq!(result, RangeParseResult::Valid(ByteRange { offset: 0, length: 100 }));
///
/// assert_eq!(parse_range_header(None), RangeParseResult::None);
/// assert_eq!(parse_range_header(Some("bytes=-20")), RangeParseResult::Malformed);
/// ```
pub fn parse_range_header(range_header: Option<&str>) -> RangeParseResult {
    let Some(header) = range_header else {
        return RangeParseResult::None;
    };

    let Some((unit, spec)) = header.split_once('=') else {
        return RangeParseResult::Malformed;
    };
    if !unit.trim().eq_ignore_ascii_case("bytes") {
        return RangeParseResult::Malformed;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeParseResult::Malformed;
    };

    // Both bounds must be plain decimal numbers; this also rejects "10,20" and "5-6-7"
    let (Some(start), Some(end)) = (parse_bound(start_str), parse_bound(end_str)) else {
        return RangeParseResult::Malformed;
    };

    ByteRange::from_bounds(start, end).map_or(RangeParseResult::Malformed, RangeParseResult::Valid)
}

fn parse_bound(bound: &str) -> Option<u64> {
    let bound = bound.trim();
    if bound.is_empty() || !bound.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    bound.parse::<u64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(header: &str) -> ByteRange {
        match parse_range_header(Some(header)) {
            RangeParseResult::Valid(r) => r,
            other => panic!("Expected Valid for {header:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_no_range() {
        assert_eq!(parse_range_header(None), RangeParseResult::None);
    }

    #[test]
    fn test_closed_range() {
        let r = valid("bytes=0-9");
        assert_eq!(r.offset, 0);
        assert_eq!(r.length, 10);
        assert_eq!(r.content_range(), "0-9");
    }

    #[test]
    fn test_whitespace_around_bounds() {
        let r = valid("bytes= 5 - 6");
        assert_eq!(r, ByteRange { offset: 5, length: 2 });
    }

    #[test]
    fn test_inverted_range_has_negative_length() {
        let r = valid("bytes=10-5");
        assert_eq!(r.length, -4);
        assert_eq!(r.satisfiable_within(100), None);
    }

    #[test]
    fn test_empty_range() {
        let r = valid("bytes=5-4");
        assert_eq!(r.length, 0);
        assert_eq!(r.content_range(), "5-4");
        assert_eq!(r.satisfiable_within(5), Some((5, 0)));
    }

    #[test]
    fn test_satisfiable_within() {
        let r = valid("bytes=90-99");
        assert_eq!(r.satisfiable_within(100), Some((90, 10)));
        assert_eq!(r.satisfiable_within(99), None);

        let past_end = valid("bytes=200-300");
        assert_eq!(past_end.satisfiable_within(100), None);
    }

    #[test]
    fn test_malformed() {
        for header in [
            "bytes",
            "0-9",
            "bytes=",
            "bytes=abc-def",
            "bytes=-20",
            "bytes=50-",
            "bytes=0-9,20-29",
            "bytes=0-9-20",
            "items=0-9",
            "bytes=+1-2",
            "bytes=99999999999999999999-1",
        ] {
            assert_eq!(
                parse_range_header(Some(header)),
                RangeParseResult::Malformed,
                "{header}"
            );
        }
    }

    #[test]
    fn test_bounds_beyond_i64_are_malformed() {
        let huge = format!("bytes=0-{}", u64::MAX);
        assert_eq!(
            parse_range_header(Some(&huge)),
            RangeParseResult::Malformed
        );
    }
}
