//! Page-range expressions such as `"1-3,5,7-9"`.
//!
//! An expression is parsed against the page count of one specific document.
//! Each comma-separated segment becomes one [`PageRange`]; the order of the
//! input is kept and nothing is merged or deduplicated, because every range
//! turns into its own output file downstream.
//!
//! # Examples
//!
//! ```
//! use pdf_toolkit::ranges::{PageRange, parse_page_ranges};
//!
//! let ranges = parse_page_ranges("1-2, 4", 5).unwrap();
//! assert_eq!(ranges.as_slice(), &[PageRange::new(1, 2), PageRange::new(4, 4)]);
//! ```

use serde::Serialize;
use std::fmt;

/// An inclusive, 1-based run of pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Create a range from `start` to `end`, both inclusive.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Check if the range covers exactly one page.
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }

    /// Number of pages covered.
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Always false; a range covers at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// Non-empty, ordered list of ranges produced by [`parse_page_ranges`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageRangeSet(Vec<PageRange>);

impl PageRangeSet {
    /// Ranges in input order.
    pub fn as_slice(&self) -> &[PageRange] {
        &self.0
    }

    /// Number of ranges, which is also the number of output files.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; an empty expression is rejected while parsing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageRange> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a PageRangeSet {
    type Item = &'a PageRange;
    type IntoIter = std::slice::Iter<'a, PageRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PageRangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Why an expression was rejected. Only the first offending segment is reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRangeError {
    #[error("Invalid range format: '{0}'")]
    InvalidFormat(String),

    #[error("Invalid page number: '{0}'")]
    InvalidNumber(String),

    #[error("Start page {start} cannot be greater than end page {end}")]
    Reversed { start: i64, end: i64 },

    #[error("Page range {start}-{end} is out of bounds (1-{total})")]
    OutOfBounds { start: i64, end: i64, total: usize },

    #[error("No valid page ranges provided")]
    Empty,
}

/// Parse `expression` against a document with `total_pages` pages.
///
/// Empty segments are ignored, so trailing or doubled commas are tolerated.
/// Numbers that do not fit in an `i64` count as malformed.
///
/// # Errors
///
/// Returns the first [`PageRangeError`] encountered, or
/// [`PageRangeError::Empty`] when no segment remains.
pub fn parse_page_ranges(
    expression: &str,
    total_pages: usize,
) -> Result<PageRangeSet, PageRangeError> {
    let mut ranges = Vec::new();

    for segment in expression.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }

        let (start, end) = if segment.contains('-') {
            parse_span(segment).ok_or_else(|| PageRangeError::InvalidFormat(segment.to_string()))?
        } else {
            let page = parse_number(segment)
                .ok_or_else(|| PageRangeError::InvalidNumber(segment.to_string()))?;
            (page, page)
        };

        if start > end {
            return Err(PageRangeError::Reversed { start, end });
        }

        // usize -> i64 saturates for absurd page counts
        let total = i64::try_from(total_pages).unwrap_or(i64::MAX);
        if start < 1 || end > total {
            return Err(PageRangeError::OutOfBounds {
                start,
                end,
                total: total_pages,
            });
        }

        // Both bounds now sit in 1..=total_pages; u32 covers any real document.
        let (Ok(start), Ok(end)) = (u32::try_from(start), u32::try_from(end)) else {
            return Err(PageRangeError::OutOfBounds {
                start,
                end,
                total: total_pages,
            });
        };
        ranges.push(PageRange::new(start, end));
    }

    if ranges.is_empty() {
        return Err(PageRangeError::Empty);
    }

    Ok(PageRangeSet(ranges))
}

/// Split `a-b` into exactly two numbers.
fn parse_span(segment: &str) -> Option<(i64, i64)> {
    let mut tokens = segment.split('-');
    let start = parse_number(tokens.next()?)?;
    let end = parse_number(tokens.next()?)?;
    if tokens.next().is_some() {
        return None;
    }
    Some((start, end))
}

fn parse_number(token: &str) -> Option<i64> {
    token.trim().parse::<i64>().ok()
}
