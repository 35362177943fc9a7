//! Blocking page and item iterators
//!
//! Both are single-pass and non-restartable; dropping one and asking the
//! engine for another continues from the same position rather than
//! restarting. `Iterator::next` maps clean exhaustion to `None`; the
//! explicit `next_page`/`next_item` methods surface it as
//! `NoMorePages`/`NoMoreItems` instead.

use super::PaginatedData;
use crate::error::{Error, Result};
use crate::pagination::PageResult;
use std::collections::VecDeque;

/// Blocking iterator over pages.
#[derive(Debug)]
pub struct Pages<'a, T: Clone> {
    data: &'a mut PaginatedData<T>,
}

impl<'a, T: Clone> Pages<'a, T> {
    pub(super) fn new(data: &'a mut PaginatedData<T>) -> Self {
        Self { data }
    }

    /// Whether another page is obtainable. Never errors; failures are
    /// deferred to the matching `next_page`.
    pub fn has_next(&mut self) -> bool {
        self.data.has_next_page()
    }

    /// Consume the next page; `NoMorePages` past exhaustion
    pub fn next_page(&mut self) -> Result<PageResult<T>> {
        self.data.next_page()
    }
}

impl<T: Clone> Iterator for Pages<'_, T> {
    type Item = Result<PageResult<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.has_next_page() {
            Some(self.data.next_page())
        } else {
            None
        }
    }
}

/// Blocking iterator over items, flattened across pages.
#[derive(Debug)]
pub struct Items<'a, T: Clone> {
    data: &'a mut PaginatedData<T>,
    buffer: VecDeque<T>,
}

impl<'a, T: Clone> Items<'a, T> {
    pub(super) fn new(data: &'a mut PaginatedData<T>) -> Self {
        Self {
            data,
            buffer: VecDeque::new(),
        }
    }

    /// Whether another item is obtainable. Never errors.
    pub fn has_next(&mut self) -> bool {
        !self.buffer.is_empty() || self.data.has_next_page()
    }

    /// Consume the next item; `NoMoreItems` past exhaustion
    pub fn next_item(&mut self) -> Result<T> {
        match self.next() {
            Some(result) => result,
            None => Err(Error::NoMoreItems),
        }
    }
}

impl<T: Clone> Iterator for Items<'_, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(item) = self.buffer.pop_front() {
            return Some(Ok(item));
        }
        if !self.data.has_next_page() {
            return None;
        }
        match self.data.next_page() {
            Ok(page) => {
                // Empty pages end iteration before reaching here, so the
                // buffer always gains at least one item.
                self.buffer.extend(page.items);
                self.buffer.pop_front().map(Ok)
            }
            Err(e) => Some(Err(e)),
        }
    }
}
