//! Lowercase char filter implementation.
//!
//! # Examples
//!
//! ```
//! use linfer::analysis::char_filter::CharFilter;
//! use linfer::analysis::char_filter::lowercase::LowercaseCharFilter;
//!
//! let filter = LowercaseCharFilter::new();
//! assert_eq!(filter.filter("Great Product"), "great product");
//! ```

use std::borrow::Cow;

use crate::analysis::char_filter::CharFilter;

/// Folds text to lowercase using Unicode case mapping without any locale
/// tailoring.
///
/// Pure-ASCII input that is already lowercase is passed through without
/// allocating.
#[derive(Clone, Debug, Default)]
pub struct LowercaseCharFilter;

impl LowercaseCharFilter {
    /// Create a new lowercase char filter.
    pub fn new() -> Self {
        LowercaseCharFilter
    }
}

impl CharFilter for LowercaseCharFilter {
    fn filter<'a>(&self, input: &'a str) -> Cow<'a, str> {
        if input.is_ascii() {
            if input.bytes().any(|b| b.is_ascii_uppercase()) {
                Cow::Owned(input.to_ascii_lowercase())
            } else {
                Cow::Borrowed(input)
            }
        } else {
            Cow::Owned(input.to_lowercase())
        }
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
