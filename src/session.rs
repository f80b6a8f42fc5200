use crate::formats::{BookSummary, SearchResultPage};

/// Remote results arrive in fixed pages of this size.
pub const PAGE_SIZE: u32 = 10;

/// Query state for one remote search session. `start_index` is the pagination
/// cursor; it tracks how many results have been accumulated so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub category: String,
    pub language: String,
    pub sort: String,
    pub print_type: String,
    pub start_index: u32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: String::new(),
            language: String::new(),
            sort: "relevance".to_owned(),
            print_type: "all".to_owned(),
            start_index: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    Query,
    Category,
    Language,
    Sort,
    PrintType,
}

/// Where the session currently stands, as seen by a presenter.
///
/// `NoResults` is an empty first page, distinct from `Loading`. `Failed`
/// keeps whatever earlier pages already delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Results,
    NoResults,
    Failed { message: String },
}

/// Handle for one in-flight request. Responses are only applied when their
/// ticket is still the latest one issued, so a slow early request can never
/// overwrite the outcome of a later one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    seq: u64,
    pub query: SearchQuery,
}

/// Incremental search session: drives a paginated remote search and owns the
/// monotonically growing result list for one logical query.
///
/// The session is transport-free. Callers obtain a [`RequestTicket`], perform
/// the fetch themselves, and hand the outcome back via [`apply_page`] or
/// [`apply_error`].
///
/// [`apply_page`]: SearchSession::apply_page
/// [`apply_error`]: SearchSession::apply_error
#[derive(Debug)]
pub struct SearchSession {
    query: SearchQuery,
    results: Vec<BookSummary>,
    total_items: u32,
    phase: SearchPhase,
    issued_seq: u64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            query: SearchQuery::default(),
            results: Vec::new(),
            total_items: 0,
            phase: SearchPhase::Idle,
            issued_seq: 0,
        }
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn results(&self) -> &[BookSummary] {
        &self.results
    }

    pub fn total_items(&self) -> u32 {
        self.total_items
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    /// Updates one query field. Any filter change starts a new logical query:
    /// the cursor goes back to 0 and accumulated results are dropped.
    pub fn set_filter(&mut self, filter: SearchFilter, value: impl Into<String>) {
        let value = value.into();
        match filter {
            SearchFilter::Query => self.query.query = value,
            SearchFilter::Category => self.query.category = value,
            SearchFilter::Language => self.query.language = value,
            SearchFilter::Sort => self.query.sort = value,
            SearchFilter::PrintType => self.query.print_type = value,
        }
        self.query.start_index = 0;
        self.results.clear();
        self.total_items = 0;
        self.phase = SearchPhase::Idle;
    }

    /// Starts a fetch for the current query. Returns `None` when the query
    /// text is empty: that is the silent no-op guard, not an error.
    pub fn begin_search(&mut self) -> Option<RequestTicket> {
        if self.query.query.trim().is_empty() {
            return None;
        }

        self.issued_seq += 1;
        self.phase = SearchPhase::Loading;
        tracing::debug!(
            seq = self.issued_seq,
            query = %self.query.query,
            start_index = self.query.start_index,
            "issuing search request"
        );
        Some(RequestTicket {
            seq: self.issued_seq,
            query: self.query.clone(),
        })
    }

    /// Advances the cursor by one page and starts an accumulate-mode fetch.
    pub fn load_more(&mut self) -> Option<RequestTicket> {
        self.query.start_index += PAGE_SIZE;
        self.begin_search()
    }

    /// Applies one fetched page. A page at cursor 0 replaces the accumulated
    /// list; any later page appends to it. Items are never deduplicated.
    ///
    /// Returns `false` without touching any state when the ticket is stale,
    /// i.e. a newer request has been issued since this one.
    pub fn apply_page(&mut self, ticket: &RequestTicket, page: SearchResultPage) -> bool {
        if !self.is_latest(ticket) {
            tracing::debug!(seq = ticket.seq, "discarding stale search response");
            return false;
        }

        self.total_items = page.total_items;
        if ticket.query.start_index == 0 {
            self.results = page.books;
        } else {
            self.results.extend(page.books);
        }

        self.phase = if self.results.is_empty() && ticket.query.start_index == 0 {
            SearchPhase::NoResults
        } else {
            SearchPhase::Results
        };
        true
    }

    /// Records a failed fetch. Results accumulated by earlier pages are kept
    /// so the presenter does not blank out on a transient failure.
    pub fn apply_error(&mut self, ticket: &RequestTicket, message: impl Into<String>) -> bool {
        if !self.is_latest(ticket) {
            tracing::debug!(seq = ticket.seq, "discarding stale search error");
            return false;
        }

        self.phase = SearchPhase::Failed {
            message: message.into(),
        };
        true
    }

    /// Whether the remote set has results beyond what is accumulated. Drives
    /// the load-more affordance: hidden once everything has arrived.
    pub fn has_more(&self) -> bool {
        !self.results.is_empty() && (self.results.len() as u32) < self.total_items
    }

    /// "Showing X-Y of Z results" line for the most recently applied page.
    pub fn summary(&self) -> String {
        let start = self.query.start_index + 1;
        let end = (self.results.len() as u32).min(self.total_items);
        format!("Showing {start}-{end} of {} results", self.total_items)
    }

    fn is_latest(&self, ticket: &RequestTicket) -> bool {
        ticket.seq == self.issued_seq
    }
}
