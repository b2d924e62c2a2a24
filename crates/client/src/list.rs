//! List state shared by every list screen (transactions, budgets, goals,
//! wallets, categories).
//!
//! Each fetch is stamped with a generation number. Only the response for the
//! most recently issued fetch is applied; anything older is dropped, so rapid
//! filter changes can't leave a stale page on screen.
use std::{
    future::Future,
    time::{Duration, Instant},
};

use api_types::envelope::PageMeta;

use crate::error::ClientError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    /// Extra endpoint-specific filters, e.g. `("type", "expense")`.
    pub filters: Vec<(String, String)>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            filters: Vec::new(),
        }
    }
}

impl ListQuery {
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        params.extend(self.filters.iter().cloned());
        params
    }
}

/// One page of a collection together with its pagination metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Uses the server's `meta` when present. Endpoints that return a bare
    /// array are paged locally.
    pub fn from_response(items: Vec<T>, meta: Option<PageMeta>, query: &ListQuery) -> Self {
        match meta {
            Some(meta) => Self {
                items,
                page: meta.page.unwrap_or(query.page),
                limit: meta.limit.unwrap_or(query.limit),
                total_items: meta.total_items,
                total_pages: meta.total_pages,
            },
            None => Self::sliced(items, query),
        }
    }

    fn sliced(items: Vec<T>, query: &ListQuery) -> Self {
        let limit = query.limit.max(1);
        let total_items = items.len() as u64;
        let total_pages = total_items.div_ceil(u64::from(limit)) as u32;
        let page = query.page.clamp(1, total_pages.max(1));
        let skip = (page as usize - 1) * limit as usize;
        Self {
            items: items.into_iter().skip(skip).take(limit as usize).collect(),
            page,
            limit,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub query: ListQuery,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Fixed-delay debounce for search input.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)starts the delay from `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// `true` exactly once, when the delay has elapsed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct ListController<T> {
    items: Vec<T>,
    page: u32,
    limit: u32,
    total_items: u64,
    total_pages: u32,
    search: String,
    filters: Vec<(String, String)>,
    latest: u64,
    loading: bool,
    error: Option<String>,
    selected: usize,
    debounce: Debouncer,
}

impl<T> Default for ListController<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, SEARCH_DEBOUNCE)
    }
}

impl<T> ListController<T> {
    pub fn new(limit: u32, debounce: Duration) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            limit: limit.max(1),
            total_items: 0,
            total_pages: 0,
            search: String::new(),
            filters: Vec::new(),
            latest: 0,
            loading: false,
            error: None,
            selected: 0,
            debounce: Debouncer::new(debounce),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn query(&self) -> ListQuery {
        let search = self.search.trim();
        ListQuery {
            page: self.page,
            limit: self.limit,
            search: (!search.is_empty()).then(|| search.to_string()),
            filters: self.filters.clone(),
        }
    }

    /// Issues a new generation; older in-flight fetches become stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        let query = self.query();
        self.ticket_for(query)
    }

    fn ticket_for(&mut self, query: ListQuery) -> FetchTicket {
        self.latest += 1;
        self.loading = true;
        FetchTicket {
            generation: self.latest,
            query,
        }
    }

    /// Back to an empty first page with no search or filters.
    ///
    /// The generation keeps counting, so fetches issued before the reset are
    /// stale afterwards.
    pub fn reset(&mut self) {
        self.latest += 1;
        self.items.clear();
        self.page = 1;
        self.total_items = 0;
        self.total_pages = 0;
        self.search.clear();
        self.filters.clear();
        self.loading = false;
        self.error = None;
        self.selected = 0;
        self.debounce.cancel();
    }

    /// Applies a fetch result if it belongs to the latest generation.
    ///
    /// Returns `false` for a stale ticket (nothing changes). A failed fetch
    /// keeps the previous items and records the error message.
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<Page<T>, ClientError>) -> bool {
        if ticket.generation != self.latest {
            tracing::debug!(
                stale = ticket.generation,
                latest = self.latest,
                "discarding superseded list response"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                let page_no = page.page.max(1);
                if page_no != self.page {
                    self.selected = 0;
                }
                self.items = page.items;
                self.page = page_no;
                self.limit = page.limit.max(1);
                self.total_items = page.total_items;
                self.total_pages = page.total_pages;
                self.error = None;
                self.selected = self.selected.min(self.items.len().saturating_sub(1));
            }
            Err(err) => {
                self.error = Some(err.user_message());
            }
        }
        true
    }

    /// Fetches with `fetch` and applies the result.
    pub async fn refetch<F, Fut>(&mut self, fetch: F) -> bool
    where
        F: FnOnce(ListQuery) -> Fut,
        Fut: Future<Output = Result<Page<T>, ClientError>>,
    {
        let ticket = self.begin_fetch();
        let result = fetch(ticket.query.clone()).await;
        self.apply(ticket, result)
    }

    /// Requests `page` if it is within the last known page range.
    ///
    /// The current page only moves once the fetch succeeds.
    pub fn handle_page_change(&mut self, page: u32) -> Option<FetchTicket> {
        if page < 1 || page > self.total_pages || page == self.page {
            return None;
        }
        let query = ListQuery {
            page,
            ..self.query()
        };
        Some(self.ticket_for(query))
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        self.handle_page_change(self.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        self.handle_page_change(self.page.saturating_sub(1))
    }

    /// Updates the search term; the fetch happens once the debounce elapses.
    pub fn set_search(&mut self, term: impl Into<String>, now: Instant) {
        self.search = term.into();
        self.page = 1;
        self.debounce.schedule(now);
    }

    pub fn poll_debounce(&mut self, now: Instant) -> Option<FetchTicket> {
        self.debounce
            .fire_if_due(now)
            .then(|| self.begin_fetch())
    }

    pub fn search_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Sets or removes a discrete filter and refetches from page one.
    pub fn set_filter(&mut self, key: &str, value: Option<String>) -> FetchTicket {
        self.filters.retain(|(k, _)| k != key);
        if let Some(value) = value {
            self.filters.push((key.to_string(), value));
        }
        self.page = 1;
        self.begin_fetch()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.items.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(items: Vec<u32>, page: u32, total_pages: u32) -> Page<u32> {
        Page {
            total_items: items.len() as u64,
            items,
            page,
            limit: 10,
            total_pages,
        }
    }

    #[test]
    fn stale_responses_are_discarded() {
        let mut list = ListController::<u32>::default();
        let first = list.begin_fetch();
        let second = list.begin_fetch();

        assert!(list.apply(second, Ok(page_of(vec![2], 1, 1))));
        assert!(!list.apply(first, Ok(page_of(vec![1], 1, 1))));
        assert_eq!(list.items(), &[2]);
        assert!(!list.is_loading());
    }

    #[test]
    fn page_change_outside_known_range_is_ignored() {
        let mut list = ListController::<u32>::default();
        let ticket = list.begin_fetch();
        list.apply(ticket, Ok(page_of(vec![1, 2], 1, 3)));

        assert!(list.handle_page_change(0).is_none());
        assert!(list.handle_page_change(4).is_none());
        assert!(list.handle_page_change(1).is_none());
        assert_eq!(list.page(), 1);

        let ticket = list.handle_page_change(3).unwrap();
        assert_eq!(ticket.query.page, 3);
        assert_eq!(list.page(), 1);
        list.apply(ticket, Ok(page_of(vec![5], 3, 3)));
        assert_eq!(list.page(), 3);
        assert!(list.next_page().is_none());
    }

    #[test]
    fn failed_page_change_stays_on_current_page() {
        let mut list = ListController::<u32>::default();
        let ticket = list.begin_fetch();
        list.apply(ticket, Ok(page_of(vec![1, 2], 1, 3)));
        list.select_next();

        let ticket = list.next_page().unwrap();
        assert_eq!(ticket.query.page, 2);
        list.apply(ticket, Err(ClientError::Timeout));
        assert_eq!(list.page(), 1);
        assert_eq!(list.items(), &[1, 2]);
        assert_eq!(list.selected(), 1);
        assert_eq!(list.next_page().map(|ticket| ticket.query.page), Some(2));
    }

    #[test]
    fn fetches_from_before_a_reset_are_stale() {
        let mut list = ListController::<u32>::default();
        let ticket = list.begin_fetch();
        list.apply(ticket, Ok(page_of(vec![1, 2], 1, 2)));
        list.set_filter("type", Some("income".to_string()));
        let before = list.begin_fetch();

        list.reset();
        assert!(list.items().is_empty());
        assert_eq!(list.filter("type"), None);
        assert_eq!(list.page(), 1);

        assert!(!list.apply(before, Ok(page_of(vec![9], 1, 1))));
        assert!(list.items().is_empty());

        let after = list.begin_fetch();
        assert!(after.generation() > 0);
        assert!(list.apply(after, Ok(page_of(vec![3], 1, 1))));
        assert_eq!(list.items(), &[3]);
    }

    #[test]
    fn failed_fetch_keeps_previous_items() {
        let mut list = ListController::<u32>::default();
        let ticket = list.begin_fetch();
        list.apply(ticket, Ok(page_of(vec![7, 8], 1, 1)));

        let ticket = list.begin_fetch();
        list.apply(ticket, Err(ClientError::Timeout));
        assert_eq!(list.items(), &[7, 8]);
        assert_eq!(list.error(), Some("Permintaan melebihi batas waktu."));
    }

    #[test]
    fn bare_arrays_are_paged_locally() {
        let query = ListQuery {
            page: 2,
            limit: 2,
            ..ListQuery::default()
        };
        let page = Page::from_response(vec![1, 2, 3, 4, 5], None, &query);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 5);

        let past_end = ListQuery {
            page: 9,
            limit: 2,
            ..ListQuery::default()
        };
        assert_eq!(Page::from_response(vec![1, 2, 3], None, &past_end).items, vec![3]);
    }

    #[test]
    fn server_meta_wins_over_local_counts() {
        let meta = PageMeta {
            total_items: 95,
            total_pages: 10,
            page: Some(4),
            limit: Some(10),
        };
        let page = Page::from_response(vec![1, 2, 3], Some(meta), &ListQuery::default());
        assert_eq!(page.total_pages, 10);
        assert_eq!(page.page, 4);
    }

    #[test]
    fn search_is_debounced() {
        let mut list = ListController::<u32>::new(10, Duration::from_millis(500));
        let start = Instant::now();

        list.set_search("ma", start);
        list.set_search("makan", start + Duration::from_millis(300));
        assert!(list.poll_debounce(start + Duration::from_millis(600)).is_none());

        let ticket = list
            .poll_debounce(start + Duration::from_millis(800))
            .unwrap();
        assert_eq!(ticket.query.search.as_deref(), Some("makan"));
        assert!(list.poll_debounce(start + Duration::from_millis(900)).is_none());
    }

    #[test]
    fn filters_reset_to_first_page() {
        let mut list = ListController::<u32>::default();
        let ticket = list.begin_fetch();
        list.apply(ticket, Ok(page_of(vec![1], 1, 5)));
        list.handle_page_change(3);

        let ticket = list.set_filter("type", Some("income".to_string()));
        assert_eq!(ticket.query.page, 1);
        assert!(
            ticket
                .query
                .to_params()
                .contains(&("type".to_string(), "income".to_string()))
        );
        assert_eq!(list.filter("type"), Some("income"));
    }

    #[tokio::test]
    async fn refetch_applies_the_fetched_page() {
        let mut list = ListController::<u32>::default();
        let applied = list
            .refetch(|query| async move {
                assert_eq!(query.page, 1);
                Ok(page_of(vec![4, 5, 6], 1, 1))
            })
            .await;
        assert!(applied);
        assert_eq!(list.items(), &[4, 5, 6]);
    }
}
