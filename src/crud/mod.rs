//! Generic CRUD workflow shared by the PAC and Asignatura screens
//!
//! The pieces, leaf to root:
//! - [`form`]: drafts, field editing and submit-time validation
//! - [`status`]: transient success/error banners with expiry
//! - [`resolve`]: foreign key → display label join
//! - [`controller`]: the list/form state machine for one resource
//! - [`tasks`]: the awaited network steps the controller hands out
//!
//! The controller never performs IO. It issues tickets/requests, the caller
//! runs the matching task, then feeds the outcome back.

pub mod controller;
pub mod form;
pub mod resolve;
pub mod status;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{DeleteRequest, ListController, Phase, ReloadTicket, Snapshot, SubmitRequest};
pub use form::{AsignaturaDraft, Draft, Field, FieldInput, FieldKind, FormError, FormState, PacDraft, ValidationError};
pub use status::{StatusBoard, StatusTimeouts};

use crate::api::{RequestError, Resource, ResourceApi};
use crate::model::{Asignatura, Pac};
use crate::session::SharedSession;
use std::fmt;
use std::future::Future;

/// Collections a resource needs loaded beside its own (for foreign keys)
pub trait References: fmt::Debug + Default + Clone + Send + Sync + 'static {
    fn load<A: ResourceApi>(
        api: &A,
        session: &SharedSession,
    ) -> impl Future<Output = Result<Self, RequestError>> + Send;
}

impl References for () {
    async fn load<A: ResourceApi>(_api: &A, _session: &SharedSession) -> Result<Self, RequestError> {
        Ok(())
    }
}

impl<R: Resource> References for Vec<R> {
    async fn load<A: ResourceApi>(api: &A, session: &SharedSession) -> Result<Self, RequestError> {
        api.list::<R>(session).await
    }
}

/// A resource with a managed list screen
pub trait ManagedResource: Resource {
    type Refs: References;
    type Draft: Draft<Entity = Self, Refs = Self::Refs>;

    const CREATED: &'static str;
    const UPDATED: &'static str;
    const DELETED: &'static str;
    const DELETE_PROMPT: &'static str;

    /// Table headers, matching [`ManagedResource::cells`]
    const COLUMNS: &'static [&'static str];

    /// Display cells for one row; foreign keys are resolved against `refs`
    fn cells(&self, refs: &Self::Refs) -> Vec<String>;
}

impl ManagedResource for Pac {
    type Refs = ();
    type Draft = PacDraft;

    const CREATED: &'static str = "PAC creado exitosamente";
    const UPDATED: &'static str = "PAC actualizado exitosamente";
    const DELETED: &'static str = "PAC eliminado exitosamente";
    const DELETE_PROMPT: &'static str = "Are you sure you want to delete this PAC?";

    const COLUMNS: &'static [&'static str] = &["Code", "Status"];

    fn cells(&self, _refs: &()) -> Vec<String> {
        let status = if self.finalizar { "Finalized" } else { "Active" };
        vec![self.codigo.clone(), status.to_string()]
    }
}

impl ManagedResource for Asignatura {
    type Refs = Vec<Pac>;
    type Draft = AsignaturaDraft;

    const CREATED: &'static str = "Asignatura creada exitosamente";
    const UPDATED: &'static str = "Asignatura actualizada exitosamente";
    const DELETED: &'static str = "Asignatura eliminada exitosamente";
    const DELETE_PROMPT: &'static str = "Are you sure you want to delete this asignatura?";

    const COLUMNS: &'static [&'static str] = &["Name", "Section", "Cupos", "PAC"];

    fn cells(&self, pacs: &Vec<Pac>) -> Vec<String> {
        vec![
            self.nombre.clone(),
            self.seccion.clone(),
            self.cupos.to_string(),
            resolve::pac_code(&self.pac_id, pacs).to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asignatura_cells_resolve_pac_code() {
        let pacs = vec![Pac {
            id: "p1".to_string(),
            codigo: "PAC-2024-A".to_string(),
            finalizar: true,
        }];
        let mut row = Asignatura {
            id: "a1".to_string(),
            nombre: "Programación I".to_string(),
            seccion: "0900".to_string(),
            cupos: 15,
            pac_id: "p1".to_string(),
        };
        assert_eq!(row.cells(&pacs), ["Programación I", "0900", "15", "PAC-2024-A"]);

        row.pac_id = "deleted".to_string();
        assert_eq!(row.cells(&pacs)[3], "N/A");
        assert_eq!(pacs[0].cells(&()), ["PAC-2024-A", "Finalized"]);
    }
}
