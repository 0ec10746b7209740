//! Option filtering against the search text.

use std::fmt;
use std::sync::Arc;

use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::option::SelectOption;

/// Custom filter predicate: `(search_text, option) -> keep`.
pub type FilterFn = Arc<dyn Fn(&str, &SelectOption) -> bool + Send + Sync>;

/// How options are filtered by the search text.
#[derive(Clone, Default)]
pub enum FilterOption {
    /// Show every option regardless of input.
    Disabled,
    /// Case-insensitive substring match on label or value.
    #[default]
    Default,
    /// Host-supplied predicate.
    Custom(FilterFn),
}

impl FilterOption {
    /// Wrap a predicate.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, &SelectOption) -> bool + Send + Sync + 'static,
    {
        FilterOption::Custom(Arc::new(f))
    }

    /// Discriminant folded into the index cache key.
    pub(crate) fn cache_tag(&self) -> u8 {
        match self {
            FilterOption::Disabled => 0,
            FilterOption::Default => 1,
            FilterOption::Custom(_) => 2,
        }
    }
}

impl From<bool> for FilterOption {
    fn from(enabled: bool) -> Self {
        if enabled {
            FilterOption::Default
        } else {
            FilterOption::Disabled
        }
    }
}

impl fmt::Debug for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOption::Disabled => f.write_str("Disabled"),
            FilterOption::Default => f.write_str("Default"),
            FilterOption::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A filter prepared for one search text.
///
/// The whole query is one substring needle, spaces included, so word order
/// matters. Holds the matcher and needle so a whole option list is checked
/// without re-allocating them per option.
pub struct PreparedFilter<'a> {
    query: &'a str,
    filter: &'a FilterOption,
    matcher: Matcher,
    needle: Option<Atom>,
    buf: Vec<char>,
}

impl<'a> PreparedFilter<'a> {
    pub fn new(query: &'a str, filter: &'a FilterOption) -> Self {
        let needle = match filter {
            FilterOption::Default if !query.is_empty() => Some(Atom::new(
                query,
                CaseMatching::Ignore,
                Normalization::Smart,
                AtomKind::Substring,
                false,
            )),
            _ => None,
        };
        Self {
            query,
            filter,
            matcher: Matcher::new(Config::DEFAULT),
            needle,
            buf: Vec::new(),
        }
    }

    /// Whether `option` passes. Empty search text passes everything.
    pub fn matches(&mut self, option: &SelectOption) -> bool {
        if self.query.is_empty() {
            return true;
        }
        match self.filter {
            FilterOption::Disabled => true,
            FilterOption::Custom(f) => f(self.query, option),
            FilterOption::Default => {
                let Some(needle) = self.needle.as_ref() else {
                    return true;
                };
                let value_text = option.value.as_text();
                [option.label.as_str(), value_text.as_str()]
                    .into_iter()
                    .any(|haystack| {
                        let haystack = Utf32Str::new(haystack, &mut self.buf);
                        needle.score(haystack, &mut self.matcher).is_some()
                    })
            }
        }
    }
}

/// Check a single option against `query`.
pub fn option_matches(query: &str, filter: &FilterOption, option: &SelectOption) -> bool {
    PreparedFilter::new(query, filter).matches(option)
}
