//! Network steps handed out by the controller
//!
//! Each function performs exactly one logical operation against the backend
//! and returns its outcome for the matching `finish_*` call.

use super::controller::{DeleteRequest, Snapshot, SubmitRequest};
use super::{ManagedResource, References};
use crate::api::{RequestError, Resource, ResourceApi};
use crate::session::SharedSession;

/// Fetch the collection and its reference collections concurrently
///
/// Fails as a whole if either fetch fails; the first error wins.
pub async fn reload<R, A>(api: &A, session: &SharedSession) -> Result<Snapshot<R>, RequestError>
where
    R: ManagedResource,
    A: ResourceApi,
{
    let (items, refs) =
        futures::future::try_join(api.list::<R>(session), R::Refs::load(api, session)).await?;
    Ok(Snapshot { items, refs })
}

/// Create or update, depending on whether the request carries an id
pub async fn submit<R, A>(
    api: &A,
    session: &SharedSession,
    request: SubmitRequest<<R as Resource>::Payload>,
) -> Result<Option<R>, RequestError>
where
    R: ManagedResource,
    A: ResourceApi,
{
    match request.id {
        Some(id) => api.update::<R>(session, &id, &request.payload).await,
        None => api.create::<R>(session, &request.payload).await,
    }
}

pub async fn delete<R, A>(
    api: &A,
    session: &SharedSession,
    request: DeleteRequest,
) -> Result<(), RequestError>
where
    R: ManagedResource,
    A: ResourceApi,
{
    api.delete::<R>(session, &request.id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Cause, Operation};
    use crate::crud::form::{FieldInput, ValidationError};
    use crate::crud::testing::FakeBackend;
    use crate::crud::{ListController, Phase, StatusTimeouts};
    use crate::model::{Asignatura, Pac};
    use serde_json::json;
    use std::time::{Duration, Instant};

    async fn ready<R: ManagedResource>(
        backend: &FakeBackend,
        session: &SharedSession,
    ) -> ListController<R> {
        let mut c = ListController::<R>::new(StatusTimeouts::default());
        let ticket = c.begin_reload();
        let result = reload::<R, _>(backend, session).await;
        c.finish_reload(ticket, result, Instant::now());
        c
    }

    fn type_into(c: &mut ListController<Asignatura>, text: &str) {
        for ch in text.chars() {
            c.form_input(FieldInput::Char(ch));
        }
    }

    fn seeded() -> FakeBackend {
        let backend = FakeBackend::new();
        backend.seed(
            "pac",
            vec![
                json!({"_id": "p1", "codigo": "PAC-2024-A", "finalizar": false}),
                json!({"_id": "p2", "codigo": "PAC-2024-B", "finalizar": true}),
            ],
        );
        backend.seed(
            "asignaturas",
            vec![json!({
                "_id": "a1", "nombre": "Cálculo", "seccion": "1100", "cupos": 40, "pacId": "p2"
            })],
        );
        backend
    }

    #[tokio::test]
    async fn reload_fetches_items_and_references() {
        let backend = seeded();
        let session = FakeBackend::session();
        let c = ready::<Asignatura>(&backend, &session).await;

        assert_eq!(c.phase(), Phase::Ready);
        assert_eq!(c.items().len(), 1);
        assert_eq!(c.refs().len(), 2);
        assert_eq!(
            crate::crud::resolve::pac_code(&c.items()[0].pac_id, c.refs()),
            "PAC-2024-B"
        );
    }

    #[tokio::test]
    async fn reference_failure_fails_whole_reload() {
        let backend = seeded();
        backend.fail("pac", Operation::Fetch);
        let session = FakeBackend::session();
        let c = ready::<Asignatura>(&backend, &session).await;

        assert_eq!(c.phase(), Phase::Ready);
        assert!(c.items().is_empty());
        assert_eq!(c.status().error_text(), Some("Failed to fetch PACs"));
    }

    #[tokio::test]
    async fn create_asignatura_then_message_expires() {
        let backend = seeded();
        let session = FakeBackend::session();
        let mut c = ready::<Asignatura>(&backend, &session).await;

        assert!(c.open_create());
        type_into(&mut c, "Programación I");
        c.form_focus_next();
        type_into(&mut c, "0900");
        c.form_focus_next();
        type_into(&mut c, "15");
        c.form_focus_next();
        c.form_input(FieldInput::Next);

        let request = c.begin_submit().expect("valid draft");
        assert_eq!(request.payload.cupos, 15);

        let t0 = Instant::now();
        let result = submit::<Asignatura, _>(&backend, &session, request).await;
        assert!(c.finish_submit(result, t0));
        assert_eq!(c.status().success_text(), Some("Asignatura creada exitosamente"));

        let ticket = c.begin_reload();
        let result = reload::<Asignatura, _>(&backend, &session).await;
        c.finish_reload(ticket, result, t0);

        let created = c
            .items()
            .iter()
            .find(|a| a.nombre == "Programación I")
            .expect("created row listed");
        assert_eq!(created.cupos, 15);
        assert_eq!(crate::crud::resolve::pac_code(&created.pac_id, c.refs()), "PAC-2024-A");

        c.tick(t0 + Duration::from_secs(3));
        assert_eq!(c.status().success_text(), None);
    }

    #[tokio::test]
    async fn zero_capacity_never_reaches_backend() {
        let backend = seeded();
        let session = FakeBackend::session();
        let mut c = ready::<Asignatura>(&backend, &session).await;
        let calls = backend.calls();

        c.open_create();
        type_into(&mut c, "Programación I");
        c.form_focus_next();
        type_into(&mut c, "0900");
        c.form_focus_next();
        c.form_focus_next();
        c.form_input(FieldInput::Next);

        assert!(c.begin_submit().is_none());
        assert_eq!(c.validation_error(), Some(ValidationError::CapacityNotPositive));
        assert_eq!(
            c.form().and_then(|f| f.error.as_ref()).map(|e| e.to_string()),
            Some("capacity must be greater than 0".to_string())
        );
        assert_eq!(backend.calls(), calls);
    }

    #[tokio::test]
    async fn edit_round_trips_capacity_as_integer() {
        let backend = seeded();
        let session = FakeBackend::session();
        let mut c = ready::<Asignatura>(&backend, &session).await;

        assert!(c.open_edit_selected());
        c.form_focus_next();
        c.form_focus_next();
        c.form_input(FieldInput::Backspace);
        c.form_input(FieldInput::Backspace);
        type_into(&mut c, "25");

        let request = c.begin_submit().unwrap();
        assert_eq!(request.id.as_deref(), Some("a1"));
        let result = submit::<Asignatura, _>(&backend, &session, request).await;
        assert!(c.finish_submit(result, Instant::now()));
        assert_eq!(c.status().success_text(), Some("Asignatura actualizada exitosamente"));

        let stored = backend.stored("asignaturas");
        assert_eq!(stored[0]["cupos"], json!(25));
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let backend = seeded();
        let session = FakeBackend::session();
        let mut c = ready::<Pac>(&backend, &session).await;
        let calls = backend.calls();

        let target = c.items()[0].clone();
        assert!(c.begin_delete(&target, |_| false).is_none());
        assert_eq!(backend.calls(), calls);
        assert_eq!(c.items().len(), 2);
    }

    #[tokio::test]
    async fn deleting_a_vanished_row_reports_and_keeps_list() {
        let backend = seeded();
        let session = FakeBackend::session();
        let mut c = ready::<Pac>(&backend, &session).await;

        // Another client removed it first
        backend.remove("pac", "p1");

        let target = c.items()[0].clone();
        let request = c.begin_delete(&target, |_| true).unwrap();
        let result = delete::<Pac, _>(&backend, &session, request).await;
        assert!(!c.finish_delete(result, Instant::now()));

        assert_eq!(c.status().error_text(), Some("Failed to delete PAC"));
        assert_eq!(c.items().len(), 2);
        assert_eq!(c.phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn delete_then_reload_drops_row() {
        let backend = seeded();
        let session = FakeBackend::session();
        let mut c = ready::<Pac>(&backend, &session).await;

        let target = c.items()[1].clone();
        let request = c.begin_delete(&target, |_| true).unwrap();
        let result = delete::<Pac, _>(&backend, &session, request).await;
        assert!(c.finish_delete(result, Instant::now()));
        assert_eq!(c.status().success_text(), Some("PAC eliminado exitosamente"));

        let ticket = c.begin_reload();
        let result = reload::<Pac, _>(&backend, &session).await;
        c.finish_reload(ticket, result, Instant::now());
        assert_eq!(c.items().len(), 1);
        assert_eq!(c.items()[0].id, "p1");
    }

    #[tokio::test]
    async fn server_rejection_keeps_draft_for_retry() {
        let backend = seeded();
        backend.fail("pac", Operation::Create);
        let session = FakeBackend::session();
        let mut c = ready::<Pac>(&backend, &session).await;

        c.open_create();
        c.form_input(FieldInput::Char('X'));
        let request = c.begin_submit().unwrap();
        let result = submit::<Pac, _>(&backend, &session, request).await;
        assert!(!c.finish_submit(result, Instant::now()));

        let form = c.form().expect("form stays open");
        assert_eq!(form.draft.codigo, "X");
        assert_eq!(
            form.error.as_ref().map(|e| e.to_string()).as_deref(),
            Some("Failed to create PAC")
        );
    }

    #[tokio::test]
    async fn overlapping_reloads_apply_only_latest() {
        let backend = seeded();
        let session = FakeBackend::session();
        let mut c = ready::<Pac>(&backend, &session).await;

        let older = c.begin_reload();
        let older_result = reload::<Pac, _>(&backend, &session).await;

        backend.remove("pac", "p2");
        let newer = c.begin_reload();
        let newer_result = reload::<Pac, _>(&backend, &session).await;

        assert!(c.finish_reload(newer, newer_result, Instant::now()));
        assert!(!c.finish_reload(older, older_result, Instant::now()));
        assert_eq!(c.items().len(), 1);
    }

    #[tokio::test]
    async fn logged_out_session_is_rejected_by_backend() {
        let backend = seeded();
        let err = reload::<Pac, _>(&backend, &SharedSession::new())
            .await
            .unwrap_err();
        assert_eq!(err.cause, Cause::Status(401));
    }
}
