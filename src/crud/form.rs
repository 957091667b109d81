//! Resource forms
//!
//! A form holds a draft (raw field text, as typed) and validates it only when
//! a submit is attempted. Rules run in a fixed order and the first failure is
//! the one surfaced. A valid draft becomes the resource's wire payload; the
//! form itself never talks to the backend.

use super::resolve;
use crate::api::{RequestError, Resource};
use crate::model::{Asignatura, AsignaturaPayload, Pac, PacPayload};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// A local, field-level rejection. Never reaches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    NameRequired,
    SectionRequired,
    CapacityNotPositive,
    PacRequired,
    CodeRequired,
    EmailRequired,
    EmailInvalid,
    PasswordRequired,
    /// Generic "<field> required" for the account forms
    FieldRequired(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NameRequired => write!(f, "name required"),
            ValidationError::SectionRequired => write!(f, "section required"),
            ValidationError::CapacityNotPositive => write!(f, "capacity must be greater than 0"),
            ValidationError::PacRequired => write!(f, "PAC required"),
            ValidationError::CodeRequired => write!(f, "code required"),
            ValidationError::EmailRequired => write!(f, "email required"),
            ValidationError::EmailInvalid => write!(f, "enter a valid email"),
            ValidationError::PasswordRequired => write!(f, "password required"),
            ValidationError::FieldRequired(field) => write!(f, "{} required", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// What an open form is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    Invalid(ValidationError),
    Request(RequestError),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::Invalid(e) => e.fmt(f),
            FormError::Request(e) => e.fmt(f),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fields
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Toggle,
    Choice,
}

/// Rendered view of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
}

/// An edit applied to the focused field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput {
    Char(char),
    Backspace,
    Next,
    Prev,
}

/// Apply a text edit. Returns whether the buffer changed.
pub(crate) fn edit_text(buf: &mut String, input: FieldInput) -> bool {
    match input {
        FieldInput::Char(c) if !c.is_control() => {
            buf.push(c);
            true
        }
        FieldInput::Backspace => buf.pop().is_some(),
        _ => false,
    }
}

fn edit_number(buf: &mut String, input: FieldInput) -> bool {
    match input {
        FieldInput::Char(c) if c.is_ascii_digit() || (c == '-' && buf.is_empty()) => {
            // A lone default "0" is replaced rather than prefixed
            if buf == "0" {
                buf.clear();
            }
            buf.push(c);
            true
        }
        FieldInput::Backspace => buf.pop().is_some(),
        _ => false,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Draft contract
// ─────────────────────────────────────────────────────────────────────────────

/// In-progress, unvalidated copy of an entity
pub trait Draft: Clone + Default + Send + 'static {
    type Entity: Resource;
    /// Reference collections needed to render/edit foreign keys
    type Refs;

    fn from_entity(entity: &Self::Entity) -> Self;

    fn fields(&self, refs: &Self::Refs) -> Vec<Field>;

    /// Apply an edit to field `index`. Returns whether anything changed.
    fn apply(&mut self, index: usize, input: FieldInput, refs: &Self::Refs) -> bool;

    fn validate(&self) -> Result<<Self::Entity as Resource>::Payload, ValidationError>;
}

/// Draft plus its per-form UI state
#[derive(Debug, Clone)]
pub struct FormState<D: Draft> {
    pub draft: D,
    /// Id of the entity being edited, `None` when creating
    pub editing: Option<String>,
    pub error: Option<FormError>,
    pub submitting: bool,
    pub focus: usize,
}

impl<D: Draft> FormState<D> {
    pub fn create() -> Self {
        Self {
            draft: D::default(),
            editing: None,
            error: None,
            submitting: false,
            focus: 0,
        }
    }

    pub fn edit(entity: &D::Entity) -> Self {
        Self {
            draft: D::from_entity(entity),
            editing: Some(entity.id().to_string()),
            ..Self::create()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }

    /// Edit the focused field; any change clears the surfaced error
    pub fn input(&mut self, input: FieldInput, refs: &D::Refs) {
        if self.submitting {
            return;
        }
        if self.draft.apply(self.focus, input, refs) {
            self.error = None;
        }
    }

    pub fn focus_next(&mut self, refs: &D::Refs) {
        let count = self.draft.fields(refs).len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn focus_prev(&mut self, refs: &D::Refs) {
        let count = self.draft.fields(refs).len();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PAC
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacDraft {
    pub codigo: String,
    pub finalizar: bool,
}

impl Draft for PacDraft {
    type Entity = Pac;
    type Refs = ();

    fn from_entity(pac: &Pac) -> Self {
        Self {
            codigo: pac.codigo.clone(),
            finalizar: pac.finalizar,
        }
    }

    fn fields(&self, _refs: &()) -> Vec<Field> {
        vec![
            Field {
                label: "Code",
                value: self.codigo.clone(),
                kind: FieldKind::Text,
            },
            Field {
                label: "Finalized",
                value: if self.finalizar { "[x]" } else { "[ ]" }.to_string(),
                kind: FieldKind::Toggle,
            },
        ]
    }

    fn apply(&mut self, index: usize, input: FieldInput, _refs: &()) -> bool {
        match index {
            0 => edit_text(&mut self.codigo, input),
            1 => match input {
                FieldInput::Char(' ') => {
                    self.finalizar = !self.finalizar;
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn validate(&self) -> Result<PacPayload, ValidationError> {
        if self.codigo.trim().is_empty() {
            return Err(ValidationError::CodeRequired);
        }
        Ok(PacPayload {
            codigo: self.codigo.clone(),
            finalizar: self.finalizar,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Asignatura
// ─────────────────────────────────────────────────────────────────────────────

/// `cupos` is kept as typed and only parsed on submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsignaturaDraft {
    pub nombre: String,
    pub seccion: String,
    pub cupos: String,
    pub pac_id: String,
}

impl Default for AsignaturaDraft {
    fn default() -> Self {
        Self {
            nombre: String::new(),
            seccion: String::new(),
            cupos: "0".to_string(),
            pac_id: String::new(),
        }
    }
}

impl AsignaturaDraft {
    /// Step the PAC selector through "none" and every loaded PAC
    fn cycle_pac(&mut self, pacs: &[Pac], forward: bool) -> bool {
        if pacs.is_empty() {
            return false;
        }
        // Slot 0 is "no selection", slots 1..=n are the PACs
        let slots = pacs.len() + 1;
        let current = pacs
            .iter()
            .position(|p| p.id == self.pac_id)
            .map(|i| i + 1)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        self.pac_id = match next {
            0 => String::new(),
            n => pacs[n - 1].id.clone(),
        };
        true
    }
}

impl Draft for AsignaturaDraft {
    type Entity = Asignatura;
    type Refs = Vec<Pac>;

    fn from_entity(asignatura: &Asignatura) -> Self {
        Self {
            nombre: asignatura.nombre.clone(),
            seccion: asignatura.seccion.clone(),
            cupos: asignatura.cupos.to_string(),
            pac_id: asignatura.pac_id.clone(),
        }
    }

    fn fields(&self, pacs: &Vec<Pac>) -> Vec<Field> {
        let pac = if self.pac_id.is_empty() {
            "Select a PAC".to_string()
        } else {
            resolve::pac_code(&self.pac_id, pacs).to_string()
        };
        vec![
            Field {
                label: "Name",
                value: self.nombre.clone(),
                kind: FieldKind::Text,
            },
            Field {
                label: "Section",
                value: self.seccion.clone(),
                kind: FieldKind::Text,
            },
            Field {
                label: "Cupos",
                value: self.cupos.clone(),
                kind: FieldKind::Number,
            },
            Field {
                label: "PAC",
                value: pac,
                kind: FieldKind::Choice,
            },
        ]
    }

    fn apply(&mut self, index: usize, input: FieldInput, pacs: &Vec<Pac>) -> bool {
        match index {
            0 => edit_text(&mut self.nombre, input),
            1 => edit_text(&mut self.seccion, input),
            2 => edit_number(&mut self.cupos, input),
            3 => match input {
                FieldInput::Next | FieldInput::Char(' ') => {
                    self.cycle_pac(pacs, true)
                }
                FieldInput::Prev => self.cycle_pac(pacs, false),
                FieldInput::Backspace if !self.pac_id.is_empty() => {
                    self.pac_id.clear();
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn validate(&self) -> Result<AsignaturaPayload, ValidationError> {
        if self.nombre.trim().is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if self.seccion.trim().is_empty() {
            return Err(ValidationError::SectionRequired);
        }
        let cupos = match self.cupos.trim().parse::<i64>() {
            Ok(n) if n > 0 => u32::try_from(n).map_err(|_| ValidationError::CapacityNotPositive)?,
            _ => return Err(ValidationError::CapacityNotPositive),
        };
        if self.pac_id.trim().is_empty() {
            return Err(ValidationError::PacRequired);
        }
        Ok(AsignaturaPayload {
            nombre: self.nombre.clone(),
            seccion: self.seccion.clone(),
            cupos,
            pac_id: self.pac_id.clone(),
        })
    }
}
