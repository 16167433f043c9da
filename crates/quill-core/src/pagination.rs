//! Page/size parameters and paged results.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A validated, zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    /// Validate raw page parameters: `page >= 0`, `size > 0`.
    pub fn new(page: i64, size: i64) -> Result<Self, DomainError> {
        let mut errors = Vec::new();
        if page < 0 {
            errors.push("Page index cannot be negative".to_string());
        }
        if size <= 0 {
            errors.push("Page size must be positive".to_string());
        }
        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        Ok(Self {
            page: page as u64,
            size: size as u64,
        })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of rows to skip, never beyond what SQL `OFFSET` accepts.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size).min(i64::MAX as u64)
    }

    /// Whether this page starts at or after the last of `total` rows.
    pub fn is_past(&self, total: u64) -> bool {
        self.offset() >= total
    }
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page(),
            size: request.size(),
            total_items,
        }
    }

    /// `ceil(total_items / size)`.
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_items.div_ceil(self.size)
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
        }
    }

    /// Slice an already ordered, complete result set.
    pub fn from_slice(all: &[T], request: PageRequest) -> Self
    where
        T: Clone,
    {
        let items = all
            .iter()
            .skip(request.offset() as usize)
            .take(request.size() as usize)
            .cloned()
            .collect();
        Self::new(items, request, all.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_page_and_zero_size() {
        let err = PageRequest::new(-1, 0).unwrap_err();
        match err {
            DomainError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(PageRequest::new(0, -5).is_err());
        assert!(PageRequest::new(0, 1).is_ok());
    }

    #[test]
    fn test_huge_page_offset_is_clamped() {
        let request = PageRequest::new(i64::MAX, i64::MAX).unwrap();
        assert_eq!(request.offset(), i64::MAX as u64);
        assert!(request.is_past(10));

        let first = PageRequest::new(0, 6).unwrap();
        assert!(!first.is_past(1));
        assert!(first.is_past(0));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let request = PageRequest::new(0, 6).unwrap();
        let page: Page<u8> = Page::new(vec![], request, 10);
        assert_eq!(page.total_pages(), 2);
        assert!(page.has_next());

        let empty: Page<u8> = Page::new(vec![], request, 0);
        assert_eq!(empty.total_pages(), 0);
    }

    #[test]
    fn test_from_slice_past_the_end_is_empty() {
        let all: Vec<u32> = (0..10).collect();
        let third = Page::from_slice(&all, PageRequest::new(2, 6).unwrap());
        assert!(third.items.is_empty());
        assert_eq!(third.total_items, 10);

        let second = Page::from_slice(&all, PageRequest::new(1, 6).unwrap());
        assert_eq!(second.items, vec![6, 7, 8, 9]);
    }
}
