//! Resource descriptors: where each entity lives and how it is named

use crate::model::{Asignatura, AsignaturaPayload, Pac, PacPayload};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// An entity served under `/{PATH}/` with list/create/update/delete
pub trait Resource: Debug + Clone + DeserializeOwned + Send + Sync + 'static {
    /// Body sent on create and update
    type Payload: Serialize + Send + Sync + 'static;

    /// Collection path segment, without slashes
    const PATH: &'static str;

    /// Singular name used in messages ("PAC", "Asignatura")
    const LABEL: &'static str;

    /// Collection name used in fetch errors
    const PLURAL: &'static str;

    fn id(&self) -> &str;
}

impl Resource for Pac {
    type Payload = PacPayload;

    const PATH: &'static str = "pac";
    const LABEL: &'static str = "PAC";
    const PLURAL: &'static str = "PACs";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Asignatura {
    type Payload = AsignaturaPayload;

    const PATH: &'static str = "asignaturas";
    const LABEL: &'static str = "Asignatura";
    const PLURAL: &'static str = "asignaturas";

    fn id(&self) -> &str {
        &self.id
    }
}
