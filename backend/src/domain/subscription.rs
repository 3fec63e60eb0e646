//! Subscription graph projections.
//!
//! Following is a directed edge between two users. Self-edges are never
//! valid. Subscriptions are listed with a bounded preview of each followed
//! author's recipes.

use super::{RecipeSummary, UserProfile};

/// Recipes shown per followed author unless the caller overrides it.
pub const DEFAULT_RECIPE_PREVIEW_LIMIT: u32 = 3;

/// Validation failures for [`RecipePreviewLimit`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipePreviewLimitError {
    #[error("recipes_limit must be a non-negative integer")]
    NotAnInteger { value: String },
    #[error("recipes_limit must be a non-negative integer")]
    Negative { value: i64 },
}

/// Maximum number of recipes previewed per followed author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipePreviewLimit(u32);

impl RecipePreviewLimit {
    pub fn new(limit: u32) -> Self {
        Self(limit)
    }

    /// Parse an optional raw value, defaulting to
    /// [`DEFAULT_RECIPE_PREVIEW_LIMIT`].
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::RecipePreviewLimit;
    ///
    /// assert_eq!(RecipePreviewLimit::parse(None).map(|l| l.get()), Ok(3));
    /// assert_eq!(RecipePreviewLimit::parse(Some("0")).map(|l| l.get()), Ok(0));
    /// assert!(RecipePreviewLimit::parse(Some("-1")).is_err());
    /// assert!(RecipePreviewLimit::parse(Some("two")).is_err());
    /// ```
    pub fn parse(raw: Option<&str>) -> Result<Self, RecipePreviewLimitError> {
        let Some(raw) = raw else {
            return Ok(Self::default());
        };
        let value: i64 = raw
            .trim()
            .parse()
            .map_err(|_| RecipePreviewLimitError::NotAnInteger {
                value: raw.to_owned(),
            })?;
        if value < 0 {
            return Err(RecipePreviewLimitError::Negative { value });
        }
        Ok(Self(u32::try_from(value).unwrap_or(u32::MAX)))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for RecipePreviewLimit {
    fn default() -> Self {
        Self(DEFAULT_RECIPE_PREVIEW_LIMIT)
    }
}

/// A followed author with a preview of their newest recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowedAuthor {
    pub profile: UserProfile,
    /// Newest first, at most the requested preview limit.
    pub recipes: Vec<RecipeSummary>,
    /// Total number of recipes the author has published.
    pub recipes_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 3)]
    #[case(Some("0"), 0)]
    #[case(Some(" 7 "), 7)]
    #[case(Some("99999999999"), u32::MAX)]
    fn parses_valid_limits(#[case] raw: Option<&str>, #[case] expected: u32) {
        assert_eq!(RecipePreviewLimit::parse(raw).map(RecipePreviewLimit::get), Ok(expected));
    }

    #[rstest]
    #[case("-1")]
    #[case("2.5")]
    #[case("")]
    fn rejects_negative_or_non_integer(#[case] raw: &str) {
        assert!(RecipePreviewLimit::parse(Some(raw)).is_err());
    }
}
