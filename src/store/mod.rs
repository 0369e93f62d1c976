//! Client state container.
//!
//! `Store` owns one `RootState` tree made of the appointment slice, the
//! treatment plan slice and the UI slice. Reads go through `state` /
//! `select` / `subscribe`; synchronous changes go through `dispatch`;
//! server round trips are the async operations in `appointments` and
//! `treatment_plans`.
//!
//! A store is an ordinary value: construct as many isolated instances as
//! needed and pass them to whoever renders.

mod appointments;
mod slice;
mod treatment_plans;
mod ui;

pub use appointments::*;
pub use slice::{EntitySlice, Selection};
pub use treatment_plans::*;
pub use ui::{NewNotification, Notification, UiAction, UiState};

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::client::{
    ApiClient, FileStorage, OperationError, PersistentStorage, ReqwestTransport, StorageError,
    Transport,
};
use crate::config::ClientConfig;
use crate::models::{Appointment, Entity, TreatmentPlan};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootState {
    pub appointments: EntitySlice<Appointment>,
    pub treatment_plans: EntitySlice<TreatmentPlan>,
    pub ui: UiState,
}

/// Synchronous actions on an entity slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceAction {
    ClearSelected,
    ClearError,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Appointments(SliceAction),
    TreatmentPlans(SliceAction),
    Ui(UiAction),
}

impl RootState {
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::Appointments(action) => reduce_slice(&mut self.appointments, action),
            Action::TreatmentPlans(action) => reduce_slice(&mut self.treatment_plans, action),
            Action::Ui(action) => self.ui.reduce(action),
        }
    }
}

fn reduce_slice<E: Entity>(slice: &mut EntitySlice<E>, action: SliceAction) {
    match action {
        SliceAction::ClearSelected => slice.clear_selected(),
        SliceAction::ClearError => slice.clear_error(),
    }
}

/// Picks one entity slice out of the tree.
pub(crate) type SliceSelector<E> = fn(&mut RootState) -> &mut EntitySlice<E>;

#[derive(Clone)]
pub struct Store {
    state: Arc<watch::Sender<RootState>>,
    client: ApiClient,
}

impl Store {
    pub fn new(transport: Arc<dyn Transport>, storage: Arc<dyn PersistentStorage>) -> Self {
        let (state, _) = watch::channel(RootState::default());
        Self {
            state: Arc::new(state),
            client: ApiClient::new(transport, storage),
        }
    }

    /// Store talking to the configured API, with the token kept in the
    /// configured storage file.
    pub fn from_config(config: &ClientConfig) -> Result<Self, StorageError> {
        let storage = FileStorage::open(&config.storage_path)?;
        Ok(Self::new(
            Arc::new(ReqwestTransport::new(&config.api_base_url)),
            Arc::new(storage),
        ))
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Snapshot of the whole tree.
    pub fn state(&self) -> RootState {
        self.state.borrow().clone()
    }

    pub fn select<R>(&self, f: impl FnOnce(&RootState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Receiver that is marked changed after every state transition.
    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.state.subscribe()
    }

    pub fn dispatch(&self, action: Action) {
        self.update(|state| state.reduce(action));
    }

    fn update(&self, f: impl FnOnce(&mut RootState)) {
        self.state.send_modify(f);
    }

    /// Drive one slice through a full operation.
    ///
    /// `begin` is applied before `call` is first polled, so the pending flag
    /// is visible while the request is in flight. On settlement either
    /// `settle` runs with the response or the failure is recorded as the
    /// slice's `last_error` using `fallback` when the server gave no message.
    /// If the returned future is dropped first, the slice leaves pending
    /// with nothing else applied.
    /// Concurrent operations are not ordered; the last to settle wins.
    pub(crate) async fn run<E, T, Fut, F>(
        &self,
        op: &'static str,
        slice: SliceSelector<E>,
        fallback: &'static str,
        call: Fut,
        settle: F,
    ) -> Result<T, OperationError>
    where
        E: Entity,
        T: Clone,
        Fut: Future<Output = Result<T, OperationError>>,
        F: FnOnce(&mut EntitySlice<E>, T),
    {
        self.update(|state| slice(state).begin());
        let guard = InFlight {
            store: self,
            op,
            slice,
            armed: true,
        };
        tracing::debug!(op, "Operation started");

        let outcome = call.await;
        guard.disarm();
        match outcome {
            Ok(payload) => {
                let result = payload.clone();
                self.update(|state| settle(slice(state), payload));
                tracing::debug!(op, "Operation fulfilled");
                Ok(result)
            }
            Err(err) => {
                let message = err.user_message(fallback);
                tracing::warn!(op, error = %err, "Operation rejected");
                self.update(|state| slice(state).fail(message));
                Err(err)
            }
        }
    }
}

/// Held across the request await of `Store::run`; abandons the slice's
/// pending state if the operation future is dropped before settling.
struct InFlight<'a, E: Entity> {
    store: &'a Store,
    op: &'static str,
    slice: SliceSelector<E>,
    armed: bool,
}

impl<E: Entity> InFlight<'_, E> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<E: Entity> Drop for InFlight<'_, E> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(op = self.op, "Operation dropped before settling");
            let slice = self.slice;
            self.store.update(|state| slice(state).abandon());
        }
    }
}
