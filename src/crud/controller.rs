//! List controller: the CRUD workflow for one resource
//!
//! ```text
//!   Loading ──ok/err──▶ Ready ──open_create/open_edit──▶ FormOpen
//!      ▲                  │                                 │  ▲
//!      │               delete                            submit │ invalid / request error
//!      │               (confirmed)                          ▼  │
//!      └──────success─────┴────────────success───────── Submitting
//! ```
//!
//! The controller owns the page's collections and never performs IO. Each
//! `begin_*` method validates the transition and hands back a request; the
//! caller awaits the matching function in [`super::tasks`] and passes the
//! result to the `finish_*` counterpart. A `true` return from `finish_submit`
//! or `finish_delete` means the collections must be reloaded.
//!
//! Reloads are tagged with a generation. Only the outcome of the most
//! recently issued reload is applied; anything older is discarded.

use super::form::{Draft, FieldInput, FormError, FormState, ValidationError};
use super::status::{StatusBoard, StatusTimeouts};
use super::ManagedResource;
use crate::api::{RequestError, Resource};
use std::time::Instant;

/// Observable workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    FormOpen,
    Submitting,
}

/// Handle for an issued reload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadTicket {
    pub generation: u64,
}

/// A validated create (`id == None`) or update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest<P> {
    pub id: Option<String>,
    pub payload: P,
}

/// A confirmed delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub id: String,
}

/// Result of a successful reload
#[derive(Debug, Clone)]
pub struct Snapshot<R: ManagedResource> {
    pub items: Vec<R>,
    pub refs: R::Refs,
}

pub struct ListController<R: ManagedResource> {
    items: Vec<R>,
    refs: R::Refs,
    loading: bool,
    deleting: bool,
    form: Option<FormState<R::Draft>>,
    status: StatusBoard,
    generation: u64,
    selected: usize,
}

impl<R: ManagedResource> ListController<R> {
    /// New controller in `Loading`; the caller issues the first reload
    pub fn new(timeouts: StatusTimeouts) -> Self {
        Self {
            items: Vec::new(),
            refs: R::Refs::default(),
            loading: true,
            deleting: false,
            form: None,
            status: StatusBoard::new(timeouts),
            generation: 0,
            selected: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.form {
            Some(form) if form.submitting => Phase::Submitting,
            Some(_) => Phase::FormOpen,
            None if self.loading || self.deleting => Phase::Loading,
            None => Phase::Ready,
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn refs(&self) -> &R::Refs {
        &self.refs
    }

    pub fn form(&self) -> Option<&FormState<R::Draft>> {
        self.form.as_ref()
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.loading || self.deleting || self.form.as_ref().is_some_and(|f| f.submitting)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&R> {
        self.items.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reload
    // ─────────────────────────────────────────────────────────────────────

    /// Start a reload of the collection and its references
    ///
    /// Supersedes any reload still in flight.
    pub fn begin_reload(&mut self) -> ReloadTicket {
        self.generation += 1;
        self.loading = true;
        self.status.clear_error();
        tracing::debug!("{}: reload #{} issued", R::PLURAL, self.generation);
        ReloadTicket {
            generation: self.generation,
        }
    }

    /// Apply a reload outcome. Returns false if it was stale and ignored.
    ///
    /// On failure the previously loaded items stay visible.
    pub fn finish_reload(
        &mut self,
        ticket: ReloadTicket,
        result: Result<Snapshot<R>, RequestError>,
        now: Instant,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                "{}: dropping stale reload #{} (latest #{})",
                R::PLURAL,
                ticket.generation,
                self.generation
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(snapshot) => {
                tracing::debug!("{}: loaded {} item(s)", R::PLURAL, snapshot.items.len());
                self.items = snapshot.items;
                self.refs = snapshot.refs;
                if self.selected >= self.items.len() {
                    self.selected = self.items.len().saturating_sub(1);
                }
            }
            Err(err) => {
                self.status.error(err.to_string(), now);
            }
        }
        true
    }

    // ─────────────────────────────────────────────────────────────────────
    // Form
    // ─────────────────────────────────────────────────────────────────────

    /// Open an empty form. Only from `Ready`.
    pub fn open_create(&mut self) -> bool {
        if self.phase() != Phase::Ready {
            return false;
        }
        self.status.clear_error();
        self.form = Some(FormState::create());
        true
    }

    /// Open a form holding a copy of `entity`. Only from `Ready`.
    pub fn open_edit(&mut self, entity: &R) -> bool {
        if self.phase() != Phase::Ready {
            return false;
        }
        self.status.clear_error();
        self.form = Some(FormState::edit(entity));
        true
    }

    /// Edit the selected row, if any
    pub fn open_edit_selected(&mut self) -> bool {
        match self.selected_item().cloned() {
            Some(entity) => self.open_edit(&entity),
            None => false,
        }
    }

    /// Discard the draft. Refused while a submit is in flight.
    pub fn cancel_form(&mut self) -> bool {
        match &self.form {
            Some(form) if form.submitting => false,
            Some(_) => {
                self.form = None;
                true
            }
            None => false,
        }
    }

    pub fn form_input(&mut self, input: FieldInput) {
        if let Some(form) = self.form.as_mut() {
            form.input(input, &self.refs);
        }
    }

    pub fn form_focus_next(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.focus_next(&self.refs);
        }
    }

    pub fn form_focus_prev(&mut self) {
        if let Some(form) = self.form.as_mut() {
            form.focus_prev(&self.refs);
        }
    }

    /// Validate the open draft and, if valid, mark the form submitting
    ///
    /// Returns `None` when there is no form, a submit is already in flight,
    /// or validation failed (the error is then shown inside the form).
    pub fn begin_submit(&mut self) -> Option<SubmitRequest<<R as Resource>::Payload>> {
        let form = self.form.as_mut()?;
        if form.submitting {
            tracing::debug!("{}: submit ignored, already submitting", R::LABEL);
            return None;
        }

        match form.draft.validate() {
            Ok(payload) => {
                form.error = None;
                form.submitting = true;
                tracing::debug!(
                    "{}: submitting {}",
                    R::LABEL,
                    if form.is_edit() { "update" } else { "create" }
                );
                Some(SubmitRequest {
                    id: form.editing.clone(),
                    payload,
                })
            }
            Err(err) => {
                tracing::debug!("{}: validation failed: {}", R::LABEL, err);
                form.error = Some(FormError::Invalid(err));
                None
            }
        }
    }

    /// Apply a submit outcome. Returns true when a reload should follow.
    ///
    /// Success does not depend on the server echoing the entity; the reload
    /// that follows is what refreshes the rows.
    pub fn finish_submit(&mut self, result: Result<Option<R>, RequestError>, now: Instant) -> bool {
        let Some(form) = self.form.as_mut() else {
            return false;
        };
        form.submitting = false;

        match result {
            Ok(_) => {
                let message = if form.is_edit() { R::UPDATED } else { R::CREATED };
                self.form = None;
                self.status.success(message, now);
                true
            }
            Err(err) => {
                form.error = Some(FormError::Request(err));
                false
            }
        }
    }

    /// Current validation error of the open form, if that is what it shows
    pub fn validation_error(&self) -> Option<ValidationError> {
        match self.form.as_ref()?.error {
            Some(FormError::Invalid(e)) => Some(e),
            _ => None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Delete
    // ─────────────────────────────────────────────────────────────────────

    /// Ask `confirm` and, on yes, hand back the delete to dispatch
    ///
    /// A declined confirmation is a no-op, not an error.
    pub fn begin_delete(
        &mut self,
        entity: &R,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Option<DeleteRequest> {
        if self.phase() != Phase::Ready {
            return None;
        }
        if !confirm(R::DELETE_PROMPT) {
            tracing::debug!("{}: delete of {} declined", R::LABEL, entity.id());
            return None;
        }
        self.status.clear_error();
        self.deleting = true;
        Some(DeleteRequest {
            id: entity.id().to_string(),
        })
    }

    /// Apply a delete outcome. Returns true when a reload should follow.
    ///
    /// A failed delete leaves the list as it was.
    pub fn finish_delete(&mut self, result: Result<(), RequestError>, now: Instant) -> bool {
        self.deleting = false;
        match result {
            Ok(()) => {
                self.status.success(R::DELETED, now);
                true
            }
            Err(err) => {
                self.status.error(err.to_string(), now);
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Housekeeping
    // ─────────────────────────────────────────────────────────────────────

    /// Expire status messages
    pub fn tick(&mut self, now: Instant) -> bool {
        self.status.tick(now)
    }
}
