// Events that flow from spawned network tasks back to the UI loop
//
// Every backend call runs in its own tokio task. When it completes, the task
// posts exactly one of these onto the app channel and the loop feeds it to
// the owning controller or form. Using an enum keeps the hand-off type-safe
// and lets the loop pattern match on what finished.

use crate::api::RequestError;
use crate::crud::{ManagedResource, ReloadTicket, Snapshot};
use crate::model::{Asignatura, IssuedCredentials, Pac, User};

/// Outcome of one list-page task
#[derive(Debug)]
pub enum PageEvent<R: ManagedResource> {
    Reloaded {
        ticket: ReloadTicket,
        result: Result<Snapshot<R>, RequestError>,
    },
    Submitted(Result<Option<R>, RequestError>),
    Deleted(Result<(), RequestError>),
}

/// Main event type delivered to the UI loop
#[derive(Debug)]
pub enum AppEvent {
    Pac(PageEvent<Pac>),
    Asignatura(PageEvent<Asignatura>),
    LoggedIn(Result<User, RequestError>),
    Registered(Result<IssuedCredentials, RequestError>),
}

/// An event tagged with the session epoch its task was spawned under
///
/// Logout bumps the epoch, so anything still queued from the old session
/// is recognisably stale once a new session starts.
#[derive(Debug)]
pub struct Stamped {
    pub epoch: u64,
    pub event: AppEvent,
}

/// Route a page event to the matching `AppEvent` variant
pub trait PageRoute: ManagedResource {
    fn wrap(event: PageEvent<Self>) -> AppEvent;
}

impl PageRoute for Pac {
    fn wrap(event: PageEvent<Self>) -> AppEvent {
        AppEvent::Pac(event)
    }
}

impl PageRoute for Asignatura {
    fn wrap(event: PageEvent<Self>) -> AppEvent {
        AppEvent::Asignatura(event)
    }
}
