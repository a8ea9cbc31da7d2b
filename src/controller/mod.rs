// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Tidemark-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tidemark and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! The interactive data controller.
//!
//! A [`DataController`] owns the fetch lifecycle of one paginated, filterable remote data view:
//! the current parameter set, the initial and update request slots, pagination cursor
//! bookkeeping, the optional live-poll timer, and the query/command surface a view renders from.
//!
//! Correctness rests on one rule: every issued fetch captures the controller-wide sequence
//! counter and a completion is applied only if its sequence still matches its slot. Responses
//! superseded by a later `update_with_params` are silently dropped, which gives last-call-wins
//! semantics under arbitrarily reordered completions without cancelling anything in flight. The
//! last good payload is retained across failed or in-flight refreshes, so views dim instead of
//! blanking.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::{ApiError, ApiRequest, Envelope, FetchClient, PageCursors};
use crate::nav::{MemoryNavigator, Navigator};
use crate::params::{self, Params};
use crate::ui::{HostBinding, NullHost};

mod paging;
mod slot;

pub use paging::{PageDirection, PageLink, PagingLinks, PagingOptions, CURSOR_PARAM, PAGE_PARAM};

use slot::{RequestSlot, SlotState};

/// What a view renders right now; see [`DataController::data_to_show`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    NotRequested,
    Loading,
    Loaded(Arc<Envelope<T>>),
    Failed(ApiError),
}

impl<T> ViewState<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Failed(error) => error.status_code,
            _ => None,
        }
    }

    pub fn returned_data(&self) -> Option<&T> {
        match self {
            Self::Loaded(envelope) => Some(&envelope.data),
            _ => None,
        }
    }

    pub fn envelope(&self) -> Option<&Envelope<T>> {
        match self {
            Self::Loaded(envelope) => Some(envelope.as_ref()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerError {
    /// A command was issued before `initialize`; a programming error in the host, not a
    /// user-facing condition.
    NotInitialized,
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => f.write_str("controller has not been initialized"),
        }
    }
}

impl std::error::Error for ControllerError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotKind {
    Initial,
    Update,
}

struct ControllerState<T> {
    initialized: bool,
    params: Params,
    /// Controller-wide issue counter; every fetch captures the current value and advances it.
    sequence: u64,
    initial: RequestSlot<T>,
    update: RequestSlot<T>,
    last_good: Option<Arc<Envelope<T>>>,
    /// Issue sequence of the fetch that produced `last_good`; an older success never replaces a
    /// newer payload even across slots.
    last_good_sequence: u64,
    initial_loaded: bool,
    cursors: PageCursors,
}

impl<T> ControllerState<T> {
    fn new() -> Self {
        Self {
            initialized: false,
            params: Params::new(),
            sequence: 0,
            initial: RequestSlot::new(),
            update: RequestSlot::new(),
            last_good: None,
            last_good_sequence: 0,
            initial_loaded: false,
            cursors: PageCursors::default(),
        }
    }

    fn slot(&self, kind: SlotKind) -> &RequestSlot<T> {
        match kind {
            SlotKind::Initial => &self.initial,
            SlotKind::Update => &self.update,
        }
    }

    fn slot_mut(&mut self, kind: SlotKind) -> &mut RequestSlot<T> {
        match kind {
            SlotKind::Initial => &mut self.initial,
            SlotKind::Update => &mut self.update,
        }
    }

    fn begin_fetch(&mut self, endpoint: &str, kind: SlotKind) -> (u64, ApiRequest) {
        let sequence = self.sequence;
        self.sequence += 1;
        self.slot_mut(kind).begin(sequence);
        (sequence, ApiRequest::new(endpoint, self.params.clone()))
    }
}

struct PollControl {
    interval: Option<Duration>,
    task: Option<JoinHandle<()>>,
}

struct Inner<T> {
    endpoint: String,
    client: Arc<dyn FetchClient<T>>,
    navigator: Arc<dyn Navigator>,
    host: Arc<dyn HostBinding>,
    runtime: Handle,
    state: Mutex<ControllerState<T>>,
    poll: Mutex<PollControl>,
}

impl<T: Send + Sync + 'static> Inner<T> {
    fn spawn_fetch(inner: &Arc<Self>, kind: SlotKind, sequence: u64, request: ApiRequest) {
        let future = inner.client.fetch(request);
        let task_inner = Arc::clone(inner);
        inner.runtime.spawn(async move {
            let outcome = future.await;
            Self::resolve(&task_inner, kind, sequence, outcome);
        });
    }

    fn resolve(
        inner: &Arc<Self>,
        kind: SlotKind,
        sequence: u64,
        outcome: Result<Envelope<T>, ApiError>,
    ) {
        let applied = {
            let mut state = inner.state.lock().expect("controller state lock poisoned");
            if !state.slot(kind).accepts(sequence) {
                // superseded by a later issue: drop without a trace
                false
            } else {
                match outcome {
                    Ok(envelope) => {
                        let envelope = Arc::new(envelope);
                        state.slot_mut(kind).complete_loaded(Arc::clone(&envelope));
                        if state.last_good.is_none() || sequence >= state.last_good_sequence {
                            state.cursors = envelope.pagination.clone();
                            state.last_good = Some(envelope);
                            state.last_good_sequence = sequence;
                        }
                        if kind == SlotKind::Initial {
                            state.initial_loaded = true;
                        }
                    }
                    Err(error) => state.slot_mut(kind).complete_failed(error),
                }
                true
            }
        };

        if applied {
            inner.host.data_changed();
        }
    }

    fn poll_tick(inner: &Arc<Self>) {
        let issued = {
            let mut state = inner.state.lock().expect("controller state lock poisoned");
            if !state.initialized || state.update.is_pending() {
                // no overlapping refreshes; the next tick re-attempts
                None
            } else {
                Some(state.begin_fetch(&inner.endpoint, SlotKind::Update))
            }
        };

        if let Some((sequence, request)) = issued {
            Self::spawn_fetch(inner, SlotKind::Update, sequence, request);
            inner.host.data_changed();
        }
    }
}

/// Handle to one interactive data view. Clones share the same state; a view typically creates
/// the controller once per mount-point and calls [`DataController::destroy`] on unmount.
pub struct DataController<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for DataController<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T: Send + Sync + 'static> DataController<T> {
    /// Shorthand for [`DataController::new_with_navigator_and_host`] with an in-memory address
    /// and no notifications.
    pub fn new(endpoint: impl Into<String>, client: Arc<dyn FetchClient<T>>) -> Self {
        Self::new_with_navigator(endpoint, client, Arc::new(MemoryNavigator::new()))
    }

    pub fn new_with_navigator(
        endpoint: impl Into<String>,
        client: Arc<dyn FetchClient<T>>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self::new_with_navigator_and_host(endpoint, client, navigator, Arc::new(NullHost))
    }

    /// Creates a controller bound to `endpoint`. Fetch resolutions run on the ambient Tokio
    /// runtime; panics when called outside a runtime context.
    pub fn new_with_navigator_and_host(
        endpoint: impl Into<String>,
        client: Arc<dyn FetchClient<T>>,
        navigator: Arc<dyn Navigator>,
        host: Arc<dyn HostBinding>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                endpoint: endpoint.into(),
                client,
                navigator,
                host,
                runtime: Handle::current(),
                state: Mutex::new(ControllerState::new()),
                poll: Mutex::new(PollControl { interval: None, task: None }),
            }),
        }
    }

    /// Sets the parameter set and issues the first fetch into the initial slot. Returns `false`
    /// without issuing anything if already initialized, so hosts that re-mount without
    /// re-creating the controller do not duplicate requests.
    pub fn initialize(&self, params: Params) -> bool {
        let issued = {
            let mut state = self.lock_state();
            if state.initialized {
                None
            } else {
                state.initialized = true;
                state.params = params;
                Some(state.begin_fetch(&self.inner.endpoint, SlotKind::Initial))
            }
        };

        let Some((sequence, request)) = issued else {
            return false;
        };
        Inner::spawn_fetch(&self.inner, SlotKind::Initial, sequence, request);
        self.arm_poll();
        self.inner.host.data_changed();
        true
    }

    /// Merges `partial` into the current parameters (an empty value clears its key) and issues a
    /// fresh update fetch. `reset_pagination` drops the cursor/page keys first, for filter
    /// changes that invalidate the current page. The last good payload stays visible until the
    /// new fetch resolves successfully.
    pub fn update_with_params(
        &self,
        partial: Params,
        reset_pagination: bool,
    ) -> Result<(), ControllerError> {
        let (sequence, request) = {
            let mut state = self.lock_state();
            if !state.initialized {
                return Err(ControllerError::NotInitialized);
            }
            if reset_pagination {
                state.params.remove(CURSOR_PARAM);
                state.params.remove(PAGE_PARAM);
            }
            state.params.merge(&partial);
            state.begin_fetch(&self.inner.endpoint, SlotKind::Update)
        };

        Inner::spawn_fetch(&self.inner, SlotKind::Update, sequence, request);
        self.inner.host.data_changed();
        Ok(())
    }

    /// Follows a paging affordance from [`DataController::paging_links`]. Pagination never
    /// resets other filters.
    pub fn follow(&self, link: &PageLink) -> Result<(), ControllerError> {
        self.update_with_params(link.partial.clone(), false)
    }

    pub fn has_run_initialize(&self) -> bool {
        self.lock_state().initialized
    }

    /// True while the initial slot has never reached the loaded state; the host shows a
    /// full-page spinner or error instead of the dashboard body.
    pub fn has_not_loaded_initial_data(&self) -> bool {
        !self.lock_state().initial_loaded
    }

    /// The value a view renders: the last good envelope whenever one exists (even while an
    /// update is in flight or failed), otherwise the most recent slot's condition.
    pub fn data_to_show(&self) -> ViewState<T> {
        let state = self.lock_state();
        if let Some(envelope) = &state.last_good {
            return ViewState::Loaded(Arc::clone(envelope));
        }
        let slot = if state.update.has_started() { &state.update } else { &state.initial };
        match slot.state() {
            SlotState::NotStarted => ViewState::NotRequested,
            SlotState::Pending => ViewState::Loading,
            SlotState::Loaded(envelope) => ViewState::Loaded(Arc::clone(envelope)),
            SlotState::Failed(error) => ViewState::Failed(error.clone()),
        }
    }

    /// True only while the update slot is pending — the "dim, don't blank" refresh state,
    /// distinct from the initial-load spinner.
    pub fn is_loading_updated_data(&self) -> bool {
        self.lock_state().update.is_pending()
    }

    pub fn failed_to_load_updated_data(&self) -> bool {
        self.lock_state().update.error().is_some()
    }

    /// The most recent failed update, for an inline banner beside still-valid data.
    pub fn data_for_error_message(&self) -> Option<ApiError> {
        self.lock_state().update.error().cloned()
    }

    pub fn current_params(&self) -> Params {
        self.lock_state().params.clone()
    }

    pub fn paging_links(&self, options: PagingOptions) -> PagingLinks {
        let state = self.lock_state();
        PagingLinks::derive(options, &state.cursors, &state.params)
    }

    /// Writes the encoded parameter set through the navigator, without triggering navigation,
    /// so the current view state is link-shareable and survives a reload.
    pub fn update_address(&self) -> Result<(), ControllerError> {
        let query = {
            let state = self.lock_state();
            if !state.initialized {
                return Err(ControllerError::NotInitialized);
            }
            params::encode(&state.params)
        };
        self.inner.navigator.write_query(&query);
        Ok(())
    }

    /// Arms the live poll. Each tick refreshes through the same path as an empty
    /// `update_with_params`; ticks that would overlap a pending refresh are skipped.
    pub fn enable_polling(&self, interval: Duration) {
        {
            let mut poll = self.lock_poll();
            poll.interval = Some(interval);
        }
        if self.has_run_initialize() {
            self.arm_poll();
        }
    }

    pub fn disable_polling(&self) {
        let mut poll = self.lock_poll();
        poll.interval = None;
        if let Some(task) = poll.task.take() {
            task.abort();
        }
    }

    pub fn is_polling(&self) -> bool {
        self.lock_poll().task.is_some()
    }

    /// Cancels any pending poll. Called by the host on unmount; the timer never outlives its
    /// owning view.
    pub fn destroy(&self) {
        self.disable_polling();
    }

    fn arm_poll(&self) {
        let mut poll = self.lock_poll();
        let Some(interval) = poll.interval else {
            return;
        };
        if poll.task.is_some() {
            return;
        }

        let weak = Arc::downgrade(&self.inner);
        poll.task = Some(self.inner.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // the interval's immediate first tick; polling starts one period from now
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                Inner::poll_tick(&inner);
            }
        }));
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ControllerState<T>> {
        self.inner.state.lock().expect("controller state lock poisoned")
    }

    fn lock_poll(&self) -> std::sync::MutexGuard<'_, PollControl> {
        self.inner.poll.lock().expect("controller poll lock poisoned")
    }
}
