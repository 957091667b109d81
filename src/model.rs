//! Wire-level entities for the enrollment backend
//!
//! Identifiers are server-assigned and arrive as `_id`. Payload types carry
//! only the mutable fields and are what create/update requests send.

use serde::{Deserialize, Serialize};

/// An enrollment period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pac {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub codigo: String,
    #[serde(default)]
    pub finalizar: bool,
}

/// Fields sent when creating or updating a [`Pac`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacPayload {
    pub codigo: String,
    pub finalizar: bool,
}

/// A course section offered within a PAC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asignatura {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub nombre: String,
    pub seccion: String,
    pub cupos: u32,
    #[serde(rename = "pacId")]
    pub pac_id: String,
}

/// Fields sent when creating or updating an [`Asignatura`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsignaturaPayload {
    pub nombre: String,
    pub seccion: String,
    pub cupos: u32,
    #[serde(rename = "pacId")]
    pub pac_id: String,
}

/// Identity of the logged-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
}

/// `POST /auth/login` response (extra fields ignored)
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// `POST /auth/users` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub nombre: String,
    pub apellido: String,
    pub identidad: String,
    pub email: String,
}

/// Institutional credentials issued by `POST /auth/users`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssuedCredentials {
    pub email_institucional: String,
    pub password: String,
}
