//! Page-number pagination primitives shared by backend listing endpoints.
//!
//! Endpoints hand either a full ordered sequence to
//! [`Paginated::from_sequence`] or a store-windowed page plus its total to
//! [`Paginated::from_window`], and receive the envelope clients consume:
//! a total `count`, absolute `next`/`previous` links and the `results` for
//! the requested page.
//!
//! ```
//! use pagination::{PagePolicy, PageRequest, Paginated};
//! use url::Url;
//!
//! let request = PageRequest::new(Some(2), Some(2), PagePolicy::default())?;
//! let base = Url::parse("https://example.test/api/v1/recipes?author=7")?;
//! let page = Paginated::from_sequence(vec![1, 2, 3, 4, 5], request, &base);
//!
//! assert_eq!(page.count, 5);
//! assert_eq!(page.results, vec![3, 4]);
//! assert_eq!(
//!     page.next.as_deref(),
//!     Some("https://example.test/api/v1/recipes?author=7&page=3&limit=2")
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::Serialize;
use url::Url;

/// Upper bound applied to client supplied page sizes unless configured otherwise.
pub const DEFAULT_PAGE_SIZE_CEILING: u32 = 100;

/// Page size used when the client does not request one.
pub const DEFAULT_PAGE_SIZE: u32 = 6;

const PAGE_PARAM: &str = "page";
const LIMIT_PARAM: &str = "limit";

/// Errors raised while validating client pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The requested page number was zero.
    #[error("page must be a positive integer")]
    InvalidPage,
    /// The requested page size was zero.
    #[error("limit must be a positive integer")]
    InvalidLimit,
}

/// Server-side limits applied to every page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    default_limit: u32,
    ceiling: u32,
}

impl PagePolicy {
    /// Build a policy, keeping the default page size within the ceiling.
    ///
    /// A zero ceiling is treated as one so every policy can serve a page.
    #[must_use]
    pub fn new(default_limit: u32, ceiling: u32) -> Self {
        let effective_ceiling = ceiling.max(1);
        Self {
            default_limit: default_limit.clamp(1, effective_ceiling),
            ceiling: effective_ceiling,
        }
    }

    /// Page size used when the client omits `limit`.
    #[must_use]
    pub const fn default_limit(&self) -> u32 {
        self.default_limit
    }

    /// Largest page size a client may request.
    #[must_use]
    pub const fn ceiling(&self) -> u32 {
        self.ceiling
    }
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_PAGE_SIZE_CEILING)
    }
}

/// Validated page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate raw client parameters against a [`PagePolicy`].
    ///
    /// Missing values fall back to page one and the policy default. Limits
    /// above the ceiling are clamped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` or `limit` is zero.
    pub fn new(
        page: Option<u32>,
        limit: Option<u32>,
        policy: PagePolicy,
    ) -> Result<Self, PageRequestError> {
        let page_number = page.unwrap_or(1);
        if page_number == 0 {
            return Err(PageRequestError::InvalidPage);
        }
        let size = match limit {
            Some(0) => return Err(PageRequestError::InvalidLimit),
            Some(requested) => requested.min(policy.ceiling()),
            None => policy.default_limit(),
        };
        Ok(Self {
            page: page_number,
            limit: size,
        })
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Effective page size after clamping.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Effective page size as a length.
    #[must_use]
    pub fn limit_len(self) -> usize {
        usize::try_from(self.limit).unwrap_or(usize::MAX)
    }

    /// Number of items preceding the requested page.
    #[must_use]
    pub fn offset(self) -> usize {
        let preceding = usize::try_from(self.page.saturating_sub(1)).unwrap_or(usize::MAX);
        preceding.saturating_mul(self.limit_len())
    }
}

/// Pagination envelope returned by listing endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    /// Total number of items across all pages.
    pub count: usize,
    /// Absolute link to the next page, if any.
    pub next: Option<String>,
    /// Absolute link to the previous page, if any.
    pub previous: Option<String>,
    /// Items on the requested page.
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Slice an ordered sequence into the requested page.
    ///
    /// `base` is the URL of the current request; navigation links reuse its
    /// query string, replacing only the `page` and `limit` parameters.
    /// Requesting a page past the end yields empty `results` with the
    /// original `count`.
    #[must_use]
    pub fn from_sequence(items: Vec<T>, request: PageRequest, base: &Url) -> Self {
        let count = items.len();
        let results: Vec<T> = items
            .into_iter()
            .skip(request.offset())
            .take(request.limit_len())
            .collect();
        Self::from_window(results, count, request, base)
    }

    /// Wrap a page the store already windowed.
    ///
    /// `results` must hold at most `request.limit()` items taken from
    /// `request.offset()`; `count` is the size of the whole unwindowed set.
    #[must_use]
    pub fn from_window(results: Vec<T>, count: usize, request: PageRequest, base: &Url) -> Self {
        let has_next = request.offset().saturating_add(request.limit_len()) < count;
        let next = has_next.then(|| page_link(base, request.page().saturating_add(1), request));
        let previous =
            (request.page() > 1).then(|| page_link(base, request.page().saturating_sub(1), request));

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Transform every result while preserving the navigation metadata.
    #[must_use]
    pub fn map<U>(self, transform: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(transform).collect(),
        }
    }
}

fn page_link(base: &Url, page: u32, request: PageRequest) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM && key != LIMIT_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut link = base.clone();
    link.set_query(None);
    {
        let mut pairs = link.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        if page > 1 {
            pairs.append_pair(PAGE_PARAM, &page.to_string());
        }
        pairs.append_pair(LIMIT_PARAM, &request.limit().to_string());
    }
    link.into()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for page windowing and link construction.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn base() -> Url {
        Url::parse("https://example.test/api/v1/users/subscriptions?recipes_limit=2")
            .expect("valid base url")
    }

    #[rstest]
    #[case(None, None, 1, DEFAULT_PAGE_SIZE)]
    #[case(Some(3), Some(10), 3, 10)]
    #[case(Some(1), Some(500), 1, DEFAULT_PAGE_SIZE_CEILING)]
    fn request_applies_defaults_and_ceiling(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::new(page, limit, PagePolicy::default()).expect("valid request");
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[rstest]
    #[case(Some(0), None, PageRequestError::InvalidPage)]
    #[case(None, Some(0), PageRequestError::InvalidLimit)]
    fn request_rejects_zero_values(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected: PageRequestError,
    ) {
        let err = PageRequest::new(page, limit, PagePolicy::default()).expect_err("invalid");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn policy_keeps_default_within_ceiling() {
        let policy = PagePolicy::new(50, 10);
        assert_eq!(policy.default_limit(), 10);
        assert_eq!(policy.ceiling(), 10);
    }

    #[rstest]
    fn first_page_links_forward_only(base: Url) {
        let request = PageRequest::new(None, Some(2), PagePolicy::default()).expect("request");
        let page = Paginated::from_sequence(vec!["a", "b", "c"], request, &base);

        assert_eq!(page.count, 3);
        assert_eq!(page.results, vec!["a", "b"]);
        assert!(page.previous.is_none());
        assert_eq!(
            page.next.as_deref(),
            Some("https://example.test/api/v1/users/subscriptions?recipes_limit=2&page=2&limit=2")
        );
    }

    #[rstest]
    fn last_page_links_back_without_page_param_for_first_page(base: Url) {
        let request = PageRequest::new(Some(2), Some(2), PagePolicy::default()).expect("request");
        let page = Paginated::from_sequence(vec!["a", "b", "c"], request, &base);

        assert_eq!(page.results, vec!["c"]);
        assert!(page.next.is_none());
        assert_eq!(
            page.previous.as_deref(),
            Some("https://example.test/api/v1/users/subscriptions?recipes_limit=2&limit=2")
        );
    }

    #[rstest]
    fn page_past_the_end_is_empty(base: Url) {
        let request = PageRequest::new(Some(9), Some(5), PagePolicy::default()).expect("request");
        let page = Paginated::from_sequence(vec![1, 2, 3], request, &base);

        assert_eq!(page.count, 3);
        assert!(page.results.is_empty());
        assert!(page.next.is_none());
        assert!(page.previous.is_some());
    }

    #[rstest]
    #[case(1, 3, 0)]
    #[case(3, 5, 10)]
    fn offset_counts_preceding_items(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: usize,
    ) {
        let request = PageRequest::new(Some(page), Some(limit), PagePolicy::default())
            .expect("request");
        assert_eq!(request.offset(), expected);
    }

    #[rstest]
    fn windowed_page_keeps_store_total(base: Url) {
        let request = PageRequest::new(Some(2), Some(2), PagePolicy::default()).expect("request");
        let page = Paginated::from_window(vec!["c", "d"], 5, request, &base);

        assert_eq!(page.count, 5);
        assert_eq!(page.results, vec!["c", "d"]);
        assert_eq!(
            page.next.as_deref(),
            Some("https://example.test/api/v1/users/subscriptions?recipes_limit=2&page=3&limit=2")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("https://example.test/api/v1/users/subscriptions?recipes_limit=2&limit=2")
        );
    }

    #[rstest]
    fn envelope_serialises_with_expected_keys(base: Url) {
        let request = PageRequest::new(None, None, PagePolicy::default()).expect("request");
        let page = Paginated::from_sequence(vec![1_u8], request, &base).map(u32::from);
        let value = serde_json::to_value(&page).expect("serialise");

        assert_eq!(value["count"], 1);
        assert!(value["next"].is_null());
        assert!(value["previous"].is_null());
        assert_eq!(value["results"], serde_json::json!([1]));
    }
}
