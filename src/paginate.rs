use tracing::warn;

use crate::fetch::{PageCursor, PageFetch, RawResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Done,
}

/// Drives a fetcher across a sequence of pages, yielding one raw
/// response at a time. Ends on an empty page, the record cap, the page
/// cap, or a transport failure (graceful: collected records survive).
pub struct Paginator<F: PageFetch> {
    fetcher: F,
    cursor: PageCursor,
    state: State,
    pages_fetched: usize,
    records_seen: usize,
    max_records: usize,
    max_pages: usize,
}

impl<F: PageFetch> Paginator<F> {
    pub fn new(fetcher: F, max_records: usize, max_pages: usize) -> Self {
        Self {
            fetcher,
            cursor: PageCursor::start(),
            state: State::Running,
            pages_fetched: 0,
            records_seen: 0,
            max_records,
            max_pages,
        }
    }

    /// Next raw page, or `None` once pagination has ended.
    pub async fn next_page(&mut self) -> Option<RawResponse> {
        if self.state == State::Done {
            return None;
        }
        if self.pages_fetched >= self.max_pages {
            warn!("Page cap reached after {} pages", self.pages_fetched);
            self.state = State::Done;
            return None;
        }
        match self.fetcher.fetch(&self.cursor).await {
            Ok(raw) => {
                self.pages_fetched += 1;
                self.cursor = self.cursor.advance();
                Some(raw)
            }
            Err(e) => {
                warn!("Fetch failed, ending pagination: {}", e);
                self.state = State::Done;
                None
            }
        }
    }

    /// Report how many records the last page yielded. An empty page or
    /// reaching the record cap ends pagination. The cap takes
    /// precedence even mid-page.
    pub fn note_items(&mut self, count: usize) {
        if count == 0 {
            self.state = State::Done;
            return;
        }
        self.records_seen += count;
        if self.records_seen >= self.max_records {
            self.state = State::Done;
        }
    }

    /// Records still allowed under the cap.
    pub fn remaining(&self) -> usize {
        self.max_records.saturating_sub(self.records_seen)
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

// ── Tests ──
