//! Store-windowed slices of ordered listings.

use pagination::PageRequest;

/// One page of an ordered listing together with the size of the whole set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self { items, total }
    }

    /// Window an already ordered in-memory sequence.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PagePolicy, PageRequest};
    /// use recipe_backend::domain::Page;
    ///
    /// let request = PageRequest::new(Some(2), Some(2), PagePolicy::default())?;
    /// let page = Page::from_ordered(vec!['a', 'b', 'c'], request);
    /// assert_eq!((page.items, page.total), (vec!['c'], 3));
    /// # Ok::<(), pagination::PageRequestError>(())
    /// ```
    pub fn from_ordered(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len();
        let items = items
            .into_iter()
            .skip(request.offset())
            .take(request.limit_len())
            .collect();
        Self { items, total }
    }

    pub fn map<U>(self, transform: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(transform).collect(),
            total: self.total,
        }
    }
}
