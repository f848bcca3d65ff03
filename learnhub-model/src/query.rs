use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::content::{Category, ContentType};
use crate::error::ModelError;

/// Ordering applied to content searches.
///
/// `Relevance` has no scoring behind it; it orders like `Date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SortBy {
    #[default]
    Relevance,
    Date,
    Rating,
    Title,
}

impl SortBy {
    pub const ALL: [SortBy; 4] =
        [SortBy::Relevance, SortBy::Date, SortBy::Rating, SortBy::Title];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::Date => "date",
            SortBy::Rating => "rating",
            SortBy::Title => "title",
        }
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "sort key",
                value: s.to_string(),
            })
    }
}

/// Filters and paging for a local content search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilters {
    pub category: Option<Category>,
    pub content_type: Option<ContentType>,
    pub sort_by: Option<SortBy>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ContentFilters {
    pub fn with_page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }
}

/// Parse an optional query-string value, treating blank input as absent.
pub fn parse_optional<T: FromStr>(raw: Option<&str>) -> Result<Option<T>, T::Err> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value.parse().map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_absent() {
        assert_eq!(parse_optional::<SortBy>(Some("  ")), Ok(None));
        assert_eq!(parse_optional::<SortBy>(None), Ok(None));
        assert_eq!(
            parse_optional::<SortBy>(Some("rating")),
            Ok(Some(SortBy::Rating))
        );
        assert!(parse_optional::<SortBy>(Some("popularity")).is_err());
        assert_eq!(parse_optional::<u32>(Some("15")), Ok(Some(15)));
    }

    #[test]
    fn filters_with_page_keep_other_fields() {
        let filters = ContentFilters {
            category: Some(Category::Design),
            ..Default::default()
        }
        .with_page(21, 40);
        assert_eq!(filters.category, Some(Category::Design));
        assert_eq!(filters.limit, Some(21));
        assert_eq!(filters.offset, Some(40));
    }
}
