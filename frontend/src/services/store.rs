//! Reactive home of the demo workflow.

use boltzmann_core::{SessionSnapshot, SessionStore, Workflow};
use leptos::*;

use super::ObjectUrl;

/// A [`Workflow`] living in a Leptos signal.
///
/// Copyable, so every event handler can hold one. Once the owning view is
/// disposed the store reports `None` and late results are dropped.
#[derive(Clone, Copy)]
pub struct SignalStore(RwSignal<Workflow<ObjectUrl>>);

impl SignalStore {
    pub fn new() -> Self {
        Self(create_rw_signal(Workflow::new()))
    }

    /// Memoized snapshot for the view; only changes re-render.
    pub fn snapshot(&self) -> Memo<SessionSnapshot> {
        let signal = self.0;
        create_memo(move |_| signal.with(|wf| wf.snapshot()))
    }
}

impl Default for SignalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for SignalStore {
    type Preview = ObjectUrl;

    fn with_workflow<R>(&self, f: impl FnOnce(&mut Workflow<ObjectUrl>) -> R) -> Option<R> {
        self.0.try_update(f)
    }
}
