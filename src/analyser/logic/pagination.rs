use super::types::{Dataset, TripRecord};
use crate::error::{BikeshareError, Result};
use std::sync::Arc;

/// Rows per raw-data page.
pub const PAGE_SIZE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagerState {
    /// Next page starts at this row.
    Active(usize),
    Exhausted,
}

/// Forward-only cursor handing out the rows of one dataset [`PAGE_SIZE`] at a time.
///
/// Running off the end is reported once, as an empty page. Asking again after
/// that is an error.
#[derive(Debug)]
pub struct RawDataPager<'a> {
    records: &'a [Arc<TripRecord>],
    state: PagerState,
}

impl<'a> RawDataPager<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self {
            records: dataset.records(),
            state: PagerState::Active(0),
        }
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == PagerState::Exhausted
    }

    /// # Errors
    ///
    /// [`BikeshareError::PaginationExhausted`] once the empty end-of-data page
    /// has already been returned.
    pub fn next_page(&mut self) -> Result<&'a [Arc<TripRecord>]> {
        let PagerState::Active(offset) = self.state else {
            return Err(BikeshareError::PaginationExhausted);
        };

        if offset >= self.records.len() {
            self.state = PagerState::Exhausted;
            return Ok(&[]);
        }

        let end = (offset + PAGE_SIZE).min(self.records.len());
        let page = self.records.get(offset..end).unwrap_or_default();
        self.state = PagerState::Active(offset + PAGE_SIZE);
        Ok(page)
    }
}
