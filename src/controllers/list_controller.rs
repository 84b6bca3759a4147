use std::time::Instant;

use super::delete_flow::{ConfirmedDelete, DeleteFlow, DeleteState};
use super::list_view::{derive, FilterPatch, FilterState, ListItem, SortState};
use crate::error::{DashboardError, Result};
use crate::models::{EntityId, Role, Tab};
use crate::services::{EntityApi, TransitionApi};

type Filter<A> = <<A as EntityApi>::Item as ListItem>::Filter;
type Sort<A> = <<A as EntityApi>::Item as ListItem>::Sort;

/// Handle for a fetch started with [`ListController::begin_refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRequest {
    pub tab: Tab,
    seq: u64,
    started: Instant,
}

/// State behind one entity table.
///
/// Overlapping refreshes are neither coalesced nor cancelled: whichever
/// response is applied last replaces `raw`, even if it was requested first.
pub struct ListController<A: EntityApi> {
    api: A,
    tab: Tab,
    raw: Vec<A::Item>,
    filter: FilterState<Filter<A>>,
    sort: SortState<Sort<A>>,
    view: Vec<A::Item>,
    loading: bool,
    error: Option<String>,
    deletes: DeleteFlow<A::Item>,
    next_seq: u64,
}

impl<A: EntityApi> ListController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tab: Tab::All,
            raw: Vec::new(),
            filter: FilterState::default(),
            sort: SortState::default(),
            view: Vec::new(),
            loading: false,
            error: None,
            deletes: DeleteFlow::new(A::KIND),
            next_seq: 0,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Unfiltered collection as last fetched.
    pub fn raw(&self) -> &[A::Item] {
        &self.raw
    }

    /// Rows to render.
    pub fn rows(&self) -> &[A::Item] {
        &self.view
    }

    pub fn filter(&self) -> &FilterState<Filter<A>> {
        &self.filter
    }

    pub fn sort(&self) -> &SortState<Sort<A>> {
        &self.sort
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn total_count(&self) -> usize {
        self.raw.len()
    }

    pub fn visible_count(&self) -> usize {
        self.view.len()
    }

    pub fn get(&self, id: &EntityId) -> Option<&A::Item> {
        self.raw.iter().find(|item| item.id() == id)
    }

    fn rederive(&mut self) {
        self.view = derive(&self.raw, &self.filter, &self.sort);
    }

    fn report(&mut self, action: &str, err: &DashboardError) {
        tracing::warn!(
            target: "schooldesk::controller",
            kind = A::KIND.label(),
            action,
            error = %err,
            "action failed"
        );
        self.error = Some(err.user_message());
    }

    // ------------------------------------------------------------------
    // Fetching
    // ------------------------------------------------------------------

    /// Mark a fetch as started. Pair with [`Self::finish_refresh`] when
    /// the response arrives.
    pub fn begin_refresh(&mut self, tab: Tab) -> RefreshRequest {
        self.loading = true;
        self.tab = tab;
        self.next_seq += 1;
        RefreshRequest {
            tab,
            seq: self.next_seq,
            started: Instant::now(),
        }
    }

    /// Apply a fetch result. Success replaces `raw` wholesale; failure keeps
    /// the previous rows and records the error. Loading is always cleared.
    pub fn finish_refresh(&mut self, request: RefreshRequest, result: Result<Vec<A::Item>>) {
        self.loading = false;
        match result {
            Ok(items) => {
                tracing::debug!(
                    target: "schooldesk::controller",
                    kind = A::KIND.label(),
                    tab = ?request.tab,
                    seq = request.seq,
                    latest = self.next_seq,
                    count = items.len(),
                    elapsed_ms = request.started.elapsed().as_millis() as u64,
                    "collection loaded"
                );
                self.raw = items;
                self.error = None;
                self.rederive();
            }
            Err(err) => self.report("refresh", &err),
        }
    }

    /// Fetch the collection for `tab` and replace `raw` on success.
    pub async fn refresh(&mut self, tab: Tab) {
        let request = self.begin_refresh(tab);
        let result = self.api.list(tab).await;
        self.finish_refresh(request, result);
    }

    /// Re-fetch the active tab.
    pub async fn reload(&mut self) {
        self.refresh(self.tab).await;
    }

    // ------------------------------------------------------------------
    // Filter and sort
    // ------------------------------------------------------------------

    pub fn set_filter(&mut self, patch: FilterPatch<Filter<A>>) {
        self.filter.apply(patch);
        self.rederive();
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.set_filter(FilterPatch::search(term));
    }

    pub fn set_discrete(&mut self, key: Filter<A>, value: impl Into<String>) {
        self.set_filter(FilterPatch::default().with(key, value));
    }

    pub fn clear_discrete(&mut self, key: Filter<A>) {
        self.set_filter(FilterPatch::default().without(key));
    }

    pub fn reset_filters(&mut self) {
        self.filter = FilterState::default();
        self.rederive();
    }

    /// Same key flips direction; a new key sorts ascending.
    pub fn set_sort(&mut self, key: Sort<A>) {
        self.sort.select(key);
        self.rederive();
    }

    pub fn clear_sort(&mut self) {
        self.sort.clear();
        self.rederive();
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    pub fn delete_state(&self) -> &DeleteState<A::Item> {
        self.deletes.state()
    }

    /// Open the confirmation modal for a row, or land in `NoAccess`.
    pub fn request_delete(&mut self, id: &EntityId, role: Role) -> Result<()> {
        let item = self.get(id).cloned().ok_or_else(|| {
            DashboardError::InvalidState(format!("{} {id} is not in this list", A::KIND.label()))
        })?;
        self.deletes.request(item, role)
    }

    pub fn cancel_delete(&mut self) {
        self.deletes.cancel();
    }

    pub fn dismiss_no_access(&mut self) {
        self.deletes.dismiss();
    }

    /// The user confirmed in the modal. The returned ticket is what
    /// [`Self::remove`] needs.
    pub fn confirm_delete(&mut self) -> Result<ConfirmedDelete> {
        self.deletes.confirm()
    }

    /// Apply the outcome of a confirmed delete. The row leaves `raw` only if
    /// the backend call succeeded.
    pub fn finish_remove(&mut self, confirmed: ConfirmedDelete, result: Result<()>) -> Result<()> {
        self.deletes.finish(&confirmed);
        match result {
            Ok(()) => {
                self.raw.retain(|item| item.id() != confirmed.id());
                self.rederive();
                tracing::info!(
                    target: "schooldesk::controller",
                    kind = A::KIND.label(),
                    id = %confirmed.id(),
                    "row deleted"
                );
                Ok(())
            }
            Err(err) => {
                self.report("delete", &err);
                Err(err)
            }
        }
    }

    /// Call the backend delete for a confirmed row. If this future is
    /// dropped before the backend answers, the flow returns to `Idle` and the
    /// row stays in `raw`.
    pub async fn remove(&mut self, confirmed: ConfirmedDelete) -> Result<()> {
        let result = {
            let in_flight = self.deletes.in_flight(&confirmed);
            let result = self.api.delete(confirmed.id()).await;
            in_flight.complete();
            result
        };
        self.finish_remove(confirmed, result)
    }

    /// Give up on a confirmed delete whose outcome will never be applied.
    /// Ignored if that delete is no longer the one in flight.
    pub fn abandon_delete(&mut self, confirmed: &ConfirmedDelete) {
        self.deletes.abandon(confirmed);
    }

    /// Force the delete flow back to `Idle`, whatever it was doing.
    pub fn reset_delete(&mut self) {
        self.deletes.reset();
    }

    /// Confirm the pending delete and carry it out.
    pub async fn confirm_and_remove(&mut self) -> Result<()> {
        let confirmed = self.confirm_delete()?;
        self.remove(confirmed).await
    }
}

impl<A: TransitionApi> ListController<A> {
    /// Apply the backend's answer to a status change. Nothing changes until
    /// this is called with a success.
    pub fn finish_transition(&mut self, id: &EntityId, result: Result<A::Item>) -> Result<()> {
        match result {
            Ok(updated) => {
                if let Some(slot) = self.raw.iter_mut().find(|item| item.id() == id) {
                    *slot = updated;
                    self.rederive();
                } else {
                    // Row vanished (refetch in between); nothing to patch.
                    tracing::debug!(
                        target: "schooldesk::controller",
                        kind = A::KIND.label(),
                        %id,
                        "transitioned row no longer in list"
                    );
                }
                Ok(())
            }
            Err(err) => {
                self.report("transition", &err);
                Err(err)
            }
        }
    }

    /// Ask the backend to move a row to `target` and adopt its answer.
    pub async fn transition(&mut self, id: &EntityId, target: A::Transition) -> Result<()> {
        tracing::debug!(
            target: "schooldesk::controller",
            kind = A::KIND.label(),
            %id,
            transition = ?target,
            "requesting transition"
        );
        let result = self.api.transition(id, target).await;
        self.finish_transition(id, result)
    }
}
