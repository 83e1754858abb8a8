//! List query controller.
//!
//! Owns the query state of one record type's list view and drives the
//! fetch/reconcile cycle against a [`Collection`]. Every state change that
//! affects the query triggers a fetch; only the response to the most recently
//! triggered fetch is ever applied.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{ApplicationError, Error, TransportError};
use crate::filter::{FieldDescriptor, Filter, QueryParams, fields_for, is_sortable};
use crate::record::{PageResult, Record};
use crate::traits::{Collection, Notice, Notifier, TracingNotifier};
use crate::types::{RecordId, RecordType};
use crate::Result;

use super::selection::SelectionModel;
use super::state::{ListConfig, QueryState, SortOrder};

/// What happened to a triggered fetch.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the visible page.
    Applied,
    /// A newer fetch was triggered before this one resolved; its response was dropped.
    Superseded,
    /// The fetch failed; the previous page stays visible and `last_error` is set.
    Failed,
    /// The request was a no-op and nothing was fetched.
    Unchanged,
}

/// Coarse state of the list for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    Loading,
    /// Idle after a failed fetch; a reload retries.
    Failed,
}

/// Read-only copy of the controller's view state.
#[derive(Debug, Clone)]
pub struct ListSnapshot {
    pub query: QueryState,
    pub items: Vec<Record>,
    pub total: u64,
    pub pages: u32,
    pub loading: bool,
    pub last_error: Option<Arc<Error>>,
    pub last_loaded_at: Option<DateTime<Utc>>,
    pub selected: BTreeSet<RecordId>,
}

impl ListSnapshot {
    pub fn phase(&self) -> ListPhase {
        if self.loading {
            ListPhase::Loading
        } else if self.last_error.is_some() {
            ListPhase::Failed
        } else {
            ListPhase::Idle
        }
    }

    pub fn has_previous_page(&self) -> bool {
        self.query.page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.query.page < self.pages
    }
}

struct ControllerState {
    query: QueryState,
    /// Query that produced `result`; restored when a fetch is cancelled.
    applied_query: QueryState,
    result: PageResult,
    loading: bool,
    last_error: Option<Arc<Error>>,
    last_loaded_at: Option<DateTime<Utc>>,
    selection: SelectionModel,
    /// Sequence number handed to the most recent fetch.
    latest: u64,
}

impl ControllerState {
    fn max_page(&self) -> u32 {
        self.result.pages.max(1)
    }

    /// Undo the query change of a fetch that never completed, keeping
    /// whatever is in the search box.
    fn roll_back_query(&mut self) {
        let search_term = std::mem::take(&mut self.query.search_term);
        self.query = self.applied_query.clone();
        self.query.search_term = search_term;
    }
}

struct FetchTicket {
    seq: u64,
    params: QueryParams,
}

/// Held across a fetch. Dropped without [`disarm`](Self::disarm) means the
/// fetch future was cancelled before `complete` ran.
struct InFlight<'a> {
    state: &'a Mutex<ControllerState>,
    seq: u64,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a Mutex<ControllerState>, seq: u64) -> Self {
        Self { state, seq, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = lock_state(self.state);
        if state.latest != self.seq {
            return;
        }
        state.loading = false;
        state.roll_back_query();
        debug!(seq = self.seq, "fetch cancelled, query rolled back");
    }
}

fn lock_state(state: &Mutex<ControllerState>) -> MutexGuard<'_, ControllerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Query state and fetch cycle for one list view.
pub struct ListQueryController<C> {
    collection: C,
    record_type: RecordType,
    catalog: &'static [FieldDescriptor],
    config: ListConfig,
    notifier: Arc<dyn Notifier>,
    state: Mutex<ControllerState>,
}

impl<C: Collection> ListQueryController<C> {
    /// Create a controller for `collection`. Nothing is fetched until the
    /// first triggering call (usually [`reload`](Self::reload)).
    pub fn new(collection: C, config: ListConfig) -> Self {
        let record_type = collection.record_type();
        let query = QueryState::from_config(&config);

        Self {
            collection,
            record_type,
            catalog: fields_for(record_type),
            config,
            notifier: Arc::new(TracingNotifier),
            state: Mutex::new(ControllerState {
                applied_query: query.clone(),
                query,
                result: PageResult::default(),
                loading: false,
                last_error: None,
                last_loaded_at: None,
                selection: SelectionModel::new(),
                latest: 0,
            }),
        }
    }

    /// Route user notices to `notifier` instead of the log.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Start from a previously saved query instead of the defaults.
    pub fn with_query(mut self, query: QueryState) -> Self {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.query = query.normalized();
        state.applied_query = state.query.clone();
        self
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn collection(&self) -> &C {
        &self.collection
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Copy of the current view state.
    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.lock();
        ListSnapshot {
            query: state.query.clone(),
            items: state.result.items.clone(),
            total: state.result.total,
            pages: state.result.pages,
            loading: state.loading,
            last_error: state.last_error.clone(),
            last_loaded_at: state.last_loaded_at,
            selected: state.selection.selected_ids().clone(),
        }
    }

    pub fn query(&self) -> QueryState {
        self.lock().query.clone()
    }

    pub fn items(&self) -> Vec<Record> {
        self.lock().result.items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Update the live search box. Never fetches.
    pub fn set_search_term(&self, term: impl Into<String>) {
        self.lock().query.search_term = term.into();
    }

    /// Commit the search box: it becomes the active search and paging
    /// restarts at page 1.
    #[instrument(skip(self), fields(record_type = %self.record_type))]
    pub async fn submit_search(&self) -> LoadOutcome {
        self.transition(|state| {
            state.query.active_search = state.query.search_term.clone();
            state.query.page = 1;
            true
        })
        .await
    }

    /// Empty both the search box and the active search.
    #[instrument(skip(self), fields(record_type = %self.record_type))]
    pub async fn clear_search(&self) -> LoadOutcome {
        self.transition(|state| {
            state.query.search_term.clear();
            state.query.active_search.clear();
            state.query.page = 1;
            true
        })
        .await
    }

    // ------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------

    /// Column-header click.
    ///
    /// The active column flips direction and keeps the page. Another column
    /// becomes the sort key in ascending order from page 1. A column that
    /// cannot be sorted is ignored.
    #[instrument(skip(self), fields(record_type = %self.record_type))]
    pub async fn sort_by(&self, column: &str) -> LoadOutcome {
        if !is_sortable(self.record_type, column) {
            debug!(column, "ignoring sort on non-sortable column");
            return LoadOutcome::Unchanged;
        }

        self.transition(|state| {
            if state.query.sort_by == column {
                state.query.sort_order = state.query.sort_order.toggled();
            } else {
                state.query.sort_by = column.to_string();
                state.query.sort_order = SortOrder::Asc;
                state.query.page = 1;
            }
            true
        })
        .await
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Replace the active filter set and restart at page 1.
    ///
    /// Rows that do not validate stay in the state but are never sent.
    #[instrument(skip(self, filters), fields(record_type = %self.record_type, count = filters.len()))]
    pub async fn apply_filters(&self, filters: Vec<Filter>) -> LoadOutcome {
        self.transition(move |state| {
            state.query.filters = filters;
            state.query.page = 1;
            true
        })
        .await
    }

    /// Drop every filter.
    pub async fn clear_filters(&self) -> LoadOutcome {
        self.apply_filters(Vec::new()).await
    }

    // ------------------------------------------------------------------
    // Paging
    // ------------------------------------------------------------------

    /// Jump to `page`, clamped to `1..=max(1, pages)`.
    #[instrument(skip(self), fields(record_type = %self.record_type))]
    pub async fn go_to_page(&self, page: u32) -> LoadOutcome {
        self.transition(|state| {
            let target = page.clamp(1, state.max_page());
            if target == state.query.page {
                return false;
            }
            state.query.page = target;
            true
        })
        .await
    }

    /// Next page; a no-op on the last page.
    pub async fn next_page(&self) -> LoadOutcome {
        let (page, pages) = {
            let state = self.lock();
            (state.query.page, state.result.pages)
        };
        if page >= pages {
            return LoadOutcome::Unchanged;
        }
        self.go_to_page(page + 1).await
    }

    /// Previous page; a no-op on page 1.
    pub async fn previous_page(&self) -> LoadOutcome {
        let page = self.lock().query.page;
        if page <= 1 {
            return LoadOutcome::Unchanged;
        }
        self.go_to_page(page - 1).await
    }

    /// Re-run the current query.
    #[instrument(skip(self), fields(record_type = %self.record_type))]
    pub async fn reload(&self) -> LoadOutcome {
        self.transition(|_| true).await
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn toggle_selected(&self, id: RecordId) {
        self.lock().selection.toggle(id);
    }

    /// Select-all checkbox over the loaded page.
    pub fn toggle_select_all(&self) {
        let mut state = self.lock();
        let ids = state.result.ids();
        state.selection.select_all(&ids);
    }

    pub fn clear_selection(&self) {
        self.lock().selection.clear();
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.lock().selection.is_selected(id)
    }

    pub fn selected_ids(&self) -> BTreeSet<RecordId> {
        self.lock().selection.selected_ids().clone()
    }

    /// Full records for the selected ids, in page order.
    pub fn selected_records(&self) -> Vec<Record> {
        let state = self.lock();
        state.selection.selected_records(&state.result.items)
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    /// Run a bulk action over the selection.
    ///
    /// With nothing selected the user is notified and `action` is never
    /// called.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::EmptySelection`] on an empty selection,
    /// or whatever `action` returns.
    pub async fn run_bulk_action<F, Fut, T>(&self, label: &str, action: F) -> Result<T>
    where
        F: FnOnce(Vec<RecordId>, Vec<Record>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let (ids, records) = {
            let state = self.lock();
            (
                state.selection.selected_ids().iter().copied().collect::<Vec<_>>(),
                state.selection.selected_records(&state.result.items),
            )
        };

        if ids.is_empty() {
            self.notifier.notify(Notice::error(format!(
                "Please select at least one {} first",
                self.record_type.as_str()
            )));
            return Err(ApplicationError::EmptySelection {
                action: label.to_string(),
            }
            .into());
        }

        debug!(action = label, count = ids.len(), "running bulk action");
        action(ids, records).await
    }

    /// Delete every selected record, then reload the list.
    ///
    /// Returns the number of records deleted.
    #[instrument(skip(self), fields(record_type = %self.record_type))]
    pub async fn delete_selected(&self) -> Result<usize> {
        let result = self
            .run_bulk_action("Delete", |ids, _| async move {
                for id in &ids {
                    self.collection.delete(*id).await?;
                }
                Ok(ids.len())
            })
            .await;

        match result {
            Ok(count) => {
                self.notifier
                    .notify(Notice::success(format!("Deleted {} record(s)", count)));
                let _ = self.reload().await;
                Ok(count)
            }
            Err(Error::Application(e)) => Err(e.into()),
            Err(e) => {
                warn!(error = %e, "bulk delete failed");
                self.notifier.notify(Notice::error("Failed to delete records"));
                let _ = self.reload().await;
                Err(e)
            }
        }
    }

    /// Create a record through the collection, then reload the list.
    #[instrument(skip(self, data), fields(record_type = %self.record_type))]
    pub async fn create_record(&self, data: &Value) -> Result<Record> {
        match self.collection.create(data).await {
            Ok(record) => {
                self.notifier.notify(Notice::success(format!(
                    "{} created",
                    self.record_type.label()
                )));
                let _ = self.reload().await;
                Ok(record)
            }
            Err(e) => {
                warn!(error = %e, "create failed");
                self.notifier.notify(Notice::error(format!(
                    "Failed to create {}",
                    self.record_type.as_str()
                )));
                Err(e)
            }
        }
    }

    // ------------------------------------------------------------------
    // Fetch cycle
    // ------------------------------------------------------------------

    /// Apply `change` and, if it asks for a fetch, run one.
    async fn transition<F>(&self, change: F) -> LoadOutcome
    where
        F: FnOnce(&mut ControllerState) -> bool,
    {
        let Some(ticket) = self.begin(change) else {
            return LoadOutcome::Unchanged;
        };
        let in_flight = InFlight::new(&self.state, ticket.seq);
        let result = self.fetch(&ticket.params).await;
        in_flight.disarm();
        self.complete(ticket, result)
    }

    /// Mutate the query and issue a ticket under one lock.
    fn begin<F>(&self, change: F) -> Option<FetchTicket>
    where
        F: FnOnce(&mut ControllerState) -> bool,
    {
        let mut state = self.lock();
        if !change(&mut state) {
            return None;
        }

        state.latest += 1;
        state.loading = true;
        let ticket = FetchTicket {
            seq: state.latest,
            params: state.query.fetch_params(self.catalog),
        };
        debug!(seq = ticket.seq, params = %ticket.params.to_query_string(), "fetch triggered");
        Some(ticket)
    }

    async fn fetch(&self, params: &QueryParams) -> Result<PageResult> {
        match tokio::time::timeout(self.config.timeout, self.collection.list(params)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout {
                duration_ms: self.config.timeout.as_millis() as u64,
            }
            .into()),
        }
    }

    /// Apply a response if its ticket is still the latest.
    fn complete(&self, ticket: FetchTicket, result: Result<PageResult>) -> LoadOutcome {
        let mut state = self.lock();
        if ticket.seq != state.latest {
            debug!(
                seq = ticket.seq,
                latest = state.latest,
                "discarding response to superseded fetch"
            );
            return LoadOutcome::Superseded;
        }

        state.loading = false;
        match result {
            Ok(page) => {
                debug!(seq = ticket.seq, total = page.total, pages = page.pages, "page applied");
                let visible = page.ids();
                state.selection.retain_visible(&visible);
                state.result = page;
                state.applied_query = state.query.clone();
                state.last_error = None;
                state.last_loaded_at = Some(Utc::now());
                LoadOutcome::Applied
            }
            Err(e) => {
                warn!(seq = ticket.seq, error = %e, "failed to load records");
                state.last_error = Some(Arc::new(e));
                drop(state);
                self.notifier.notify(Notice::error("Failed to load records"));
                LoadOutcome::Failed
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        lock_state(&self.state)
    }
}

impl<C> std::fmt::Debug for ListQueryController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListQueryController")
            .field("record_type", &self.record_type)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
