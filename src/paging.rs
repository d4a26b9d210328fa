//! Page slicing and the per-session "show more" state machine.
//!
//! The core contract is `Ranking::page`: a zero-based offset and page size
//! select a contiguous slice, and an offset past the end is an empty page,
//! not an error. `Pager` is the session-owned state that drives repeated
//! requests — each client session holds its own, nothing is shared.

use crate::query::Query;
use crate::recommend::{Ranking, Recommendation};

/// Fixed page size presented to the user.
pub const TRACKS_PER_PAGE: usize = 6;

/// One page of a ranking.
#[derive(Debug, PartialEq)]
pub struct Page<'a> {
    pub items: &'a [Recommendation],
    pub has_more: bool,
}

impl Page<'_> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Ranking {
    /// Slice `[offset, offset + page_size)` out of the ranking.
    ///
    /// `has_more` tells the caller whether another page exists after this
    /// one; exhausted offsets yield an empty page with `has_more = false`.
    pub fn page(&self, offset: usize, page_size: usize) -> Page<'_> {
        let entries = self.entries();
        let start = offset.min(entries.len());
        let end = offset.saturating_add(page_size).min(entries.len());
        Page {
            items: &entries[start..end],
            has_more: end < entries.len(),
        }
    }
}

/// Per-session pagination state.
///
/// Two states: fresh (no query seen yet) and paging at some offset into the
/// current query's ranking. `sync` must be called with each incoming query;
/// if it differs from the stored one in any field the offset snaps back to
/// zero. `advance` moves one page forward and never moves back.
#[derive(Debug)]
pub struct Pager {
    page_size: usize,
    previous: Option<Query>,
    offset: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Pager {
        Pager {
            page_size,
            previous: None,
            offset: 0,
        }
    }

    /// Register the incoming query, resetting the offset if it changed.
    pub fn sync(&mut self, query: &Query) {
        if self.previous.as_ref() != Some(query) {
            self.offset = 0;
            self.previous = Some(query.clone());
        }
    }

    /// A "show more" request: step one page forward, unless the current
    /// offset is already past the result list.
    pub fn advance(&mut self, result_len: usize) {
        if self.offset < result_len {
            self.offset += self.page_size;
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The page at the current offset.
    pub fn current<'a>(&self, ranking: &'a Ranking) -> Page<'a> {
        ranking.page(self.offset, self.page_size)
    }
}
