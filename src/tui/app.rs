// TUI application state
//
// App owns one Page per resource screen, the login/register forms, the
// session handle and the channel that spawned network tasks report back on.
// Every backend call is spawned here; outcomes come back as AppEvents
// stamped with the session epoch and are applied by `handle_event`, which
// drops anything stamped before the last logout.

use super::components::Toast;
use super::modal::Modal;
use super::theme::Theme;
use crate::account::{self, LoginForm, RegisterForm};
use crate::api::{ApiClient, Resource};
use crate::config::Config;
use crate::crud::{tasks, ListController, ManagedResource, Phase, StatusTimeouts};
use crate::events::{AppEvent, PageEvent, PageRoute, Stamped};
use crate::logging::LogBuffer;
use crate::model::{Asignatura, Pac};
use crate::session::SharedSession;
use std::future::Future;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Screens the TUI can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Register,
    Pac,
    Asignaturas,
}

impl Screen {
    /// Display name for the title bar
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Register => "Register",
            Screen::Pac => "PAC",
            Screen::Asignaturas => "Asignaturas",
        }
    }

    /// Whether the screen needs a session
    pub fn is_protected(&self) -> bool {
        matches!(self, Screen::Pac | Screen::Asignaturas)
    }
}

/// A resource screen: its controller plus the reload task in flight
pub struct Page<R: ManagedResource> {
    pub controller: ListController<R>,
    reload: Option<JoinHandle<()>>,
}

impl<R: ManagedResource> Page<R> {
    fn new(timeouts: StatusTimeouts) -> Self {
        Self {
            controller: ListController::new(timeouts),
            reload: None,
        }
    }

    fn abort_reload(&mut self) {
        if let Some(handle) = self.reload.take() {
            handle.abort();
        }
    }
}

/// Typed access from a resource to its page on [`App`]
pub trait PageAccess: PageRoute {
    const SCREEN: Screen;

    fn page(app: &App) -> &Page<Self>;
    fn page_mut(app: &mut App) -> &mut Page<Self>;
}

impl PageAccess for Pac {
    const SCREEN: Screen = Screen::Pac;

    fn page(app: &App) -> &Page<Self> {
        &app.pacs
    }

    fn page_mut(app: &mut App) -> &mut Page<Self> {
        &mut app.pacs
    }
}

impl PageAccess for Asignatura {
    const SCREEN: Screen = Screen::Asignaturas;

    fn page(app: &App) -> &Page<Self> {
        &app.asignaturas
    }

    fn page_mut(app: &mut App) -> &mut Page<Self> {
        &mut app.asignaturas
    }
}

const SPINNER: [char; 4] = ['⠋', '⠙', '⠹', '⠸'];

/// Main application state for the TUI
pub struct App {
    pub screen: Screen,
    pub login: LoginForm,
    pub register: RegisterForm,
    pub pacs: Page<Pac>,
    pub asignaturas: Page<Asignatura>,

    /// Shared with every spawned task
    pub session: SharedSession,
    api: ApiClient,
    tx: mpsc::Sender<Stamped>,
    /// Bumped on logout; outcomes stamped with an older value are dropped
    epoch: u64,

    /// Active overlay, captures all input
    pub modal: Option<Modal>,
    pub toast: Option<Toast>,

    /// Captured tracing output for the logs panel
    pub log_buffer: LogBuffer,
    pub show_logs: bool,

    pub theme: Theme,
    pub should_quit: bool,
    timeouts: StatusTimeouts,
    frame: usize,
}

impl App {
    pub fn new(
        config: &Config,
        api: ApiClient,
        session: SharedSession,
        log_buffer: LogBuffer,
        tx: mpsc::Sender<Stamped>,
    ) -> Self {
        let timeouts = config.status.timeouts();
        Self {
            screen: Screen::Login,
            login: LoginForm::default(),
            register: RegisterForm::default(),
            pacs: Page::new(timeouts),
            asignaturas: Page::new(timeouts),
            session,
            api,
            tx,
            epoch: 0,
            modal: None,
            toast: None,
            log_buffer,
            show_logs: false,
            theme: Theme::from_choice(config.theme),
            should_quit: false,
            timeouts,
            frame: 0,
        }
    }

    pub fn api_url(&self) -> &str {
        self.api.base_url()
    }

    pub fn spinner_char(&self) -> char {
        SPINNER[self.frame % SPINNER.len()]
    }

    /// Whether anything on the current screen is waiting on the network
    pub fn is_busy(&self) -> bool {
        match self.screen {
            Screen::Login => self.login.submitting,
            Screen::Register => self.register.submitting,
            Screen::Pac => self.pacs.controller.is_busy(),
            Screen::Asignaturas => self.asignaturas.controller.is_busy(),
        }
    }

    /// Advance spinner and expire banners
    pub fn tick(&mut self, now: Instant) {
        self.frame = self.frame.wrapping_add(1);
        self.pacs.controller.tick(now);
        self.asignaturas.controller.tick(now);
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
        }
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast::new(message, Instant::now()));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Task plumbing
    // ─────────────────────────────────────────────────────────────────────

    /// Run `work` on the runtime and post its event back to the loop
    fn spawn<F>(&self, work: F) -> JoinHandle<()>
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.tx.clone();
        let epoch = self.epoch;
        tokio::spawn(async move {
            let event = work.await;
            // Receiver gone means the UI is shutting down
            let _ = tx.send(Stamped { epoch, event }).await;
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────

    /// Switch screens; entering a resource screen mounts it (fresh reload)
    pub fn set_screen(&mut self, screen: Screen) {
        if screen.is_protected() != self.session.is_authenticated() {
            return;
        }
        match screen {
            Screen::Pac => self.mount::<Pac>(),
            Screen::Asignaturas => self.mount::<Asignatura>(),
            other => self.screen = other,
        }
    }

    fn mount<R: PageAccess>(&mut self) {
        self.screen = R::SCREEN;
        self.reload::<R>();
    }

    /// Drop the session and everything loaded under it
    pub fn logout(&mut self) {
        self.pacs.abort_reload();
        self.asignaturas.abort_reload();
        self.session.logout();
        self.epoch += 1;
        self.pacs = Page::new(self.timeouts);
        self.asignaturas = Page::new(self.timeouts);
        self.login = LoginForm::default();
        self.modal = None;
        self.screen = Screen::Login;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Resource workflow
    // ─────────────────────────────────────────────────────────────────────

    /// Issue a reload, aborting the one it supersedes
    pub fn reload<R: PageAccess>(&mut self) {
        let ticket = R::page_mut(self).controller.begin_reload();
        let api = self.api.clone();
        let session = self.session.clone();
        let handle = self.spawn(async move {
            let result = tasks::reload::<R, _>(&api, &session).await;
            R::wrap(PageEvent::Reloaded { ticket, result })
        });
        if let Some(previous) = R::page_mut(self).reload.replace(handle) {
            previous.abort();
        }
    }

    pub fn submit_form<R: PageAccess>(&mut self) {
        let Some(request) = R::page_mut(self).controller.begin_submit() else {
            return;
        };
        let api = self.api.clone();
        let session = self.session.clone();
        self.spawn(async move {
            let result = tasks::submit::<R, _>(&api, &session, request).await;
            R::wrap(PageEvent::Submitted(result))
        });
    }

    /// Ask for confirmation before deleting the selected row
    pub fn request_delete<R: PageAccess>(&mut self) {
        let controller = &R::page(self).controller;
        if controller.phase() != Phase::Ready {
            return;
        }
        if let Some(id) = controller.selected_item().map(|item| item.id().to_string()) {
            self.modal = Some(Modal::confirm_delete(R::SCREEN, id, R::DELETE_PROMPT));
        }
    }

    /// Resolve a delete confirmation for row `id`
    pub fn answer_delete<R: PageAccess>(&mut self, id: &str, confirmed: bool) {
        let Some(entity) = R::page(self)
            .controller
            .items()
            .iter()
            .find(|e| e.id() == id)
            .cloned()
        else {
            return;
        };
        let Some(request) = R::page_mut(self)
            .controller
            .begin_delete(&entity, |_| confirmed)
        else {
            return;
        };
        let api = self.api.clone();
        let session = self.session.clone();
        self.spawn(async move {
            let result = tasks::delete::<R, _>(&api, &session, request).await;
            R::wrap(PageEvent::Deleted(result))
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Account
    // ─────────────────────────────────────────────────────────────────────

    pub fn submit_login(&mut self) {
        let Some(credentials) = self.login.begin_submit() else {
            return;
        };
        let api = self.api.clone();
        let session = self.session.clone();
        self.spawn(async move {
            AppEvent::LoggedIn(account::login(&api, &session, credentials).await)
        });
    }

    pub fn submit_register(&mut self) {
        let Some(registration) = self.register.begin_submit() else {
            return;
        };
        let api = self.api.clone();
        self.spawn(async move { AppEvent::Registered(api.register(&registration).await) });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Task outcomes
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_event(&mut self, stamped: Stamped) {
        if stamped.epoch != self.epoch {
            tracing::debug!(
                "dropping outcome from session epoch {} (current {})",
                stamped.epoch,
                self.epoch
            );
            return;
        }
        match stamped.event {
            AppEvent::Pac(event) => self.apply_page(event),
            AppEvent::Asignatura(event) => self.apply_page(event),
            AppEvent::LoggedIn(result) => {
                self.login.finish_submit(&result);
                if result.is_ok() {
                    self.mount::<Pac>();
                }
            }
            AppEvent::Registered(result) => {
                self.register.finish_submit(result);
                if let Some(issued) = self.register.issued.take() {
                    self.modal = Some(Modal::Credentials(issued));
                    self.screen = Screen::Login;
                }
            }
        }
    }

    fn apply_page<R: PageAccess>(&mut self, event: PageEvent<R>) {
        let now = Instant::now();
        let reload = match event {
            PageEvent::Reloaded { ticket, result } => {
                let page = R::page_mut(self);
                if page.controller.finish_reload(ticket, result, now) {
                    page.reload = None;
                }
                false
            }
            PageEvent::Submitted(result) => R::page_mut(self).controller.finish_submit(result, now),
            PageEvent::Deleted(result) => R::page_mut(self).controller.finish_delete(result, now),
        };
        if reload {
            self.reload::<R>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::spawn_backend;
    use crate::crud::FieldInput;
    use axum::{
        extract::Path,
        http::StatusCode,
        routing::{delete, get, post},
        Json, Router,
    };
    use serde_json::json;

    fn backend() -> Router {
        Router::new()
            .route(
                "/auth/login",
                post(|| async { Json(json!({"access_token": "tok", "token_type": "bearer"})) }),
            )
            .route(
                "/pac/",
                get(|| async {
                    Json(json!([
                        {"_id": "p1", "codigo": "PAC-2024-A", "finalizar": false}
                    ]))
                })
                .post(|| async {
                    Json(json!({"_id": "p2", "codigo": "PAC-2025-A", "finalizar": false}))
                }),
            )
            .route(
                "/pac/:id",
                delete(|Path(_id): Path<String>| async { StatusCode::NOT_FOUND }),
            )
            .route("/asignaturas/", get(|| async { Json(json!([])) }))
    }

    async fn app() -> (App, mpsc::Receiver<Stamped>) {
        let base = spawn_backend(backend()).await;
        let (tx, rx) = mpsc::channel(16);
        let app = App::new(
            &Config::default(),
            ApiClient::new(&base).unwrap(),
            SharedSession::new(),
            LogBuffer::new(),
            tx,
        );
        (app, rx)
    }

    async fn pump(app: &mut App, rx: &mut mpsc::Receiver<Stamped>) {
        let event = rx.recv().await.unwrap();
        app.handle_event(event);
    }

    async fn logged_in() -> (App, mpsc::Receiver<Stamped>) {
        let (mut app, mut rx) = app().await;
        app.login.email = "admin@unah.hn".to_string();
        app.login.password = "pw".to_string();
        app.submit_login();
        pump(&mut app, &mut rx).await; // LoggedIn
        pump(&mut app, &mut rx).await; // PAC reload
        (app, rx)
    }

    #[tokio::test]
    async fn protected_screens_need_a_session() {
        let (mut app, _rx) = app().await;
        app.set_screen(Screen::Asignaturas);
        assert_eq!(app.screen, Screen::Login);
        app.set_screen(Screen::Register);
        assert_eq!(app.screen, Screen::Register);
    }

    #[tokio::test]
    async fn login_mounts_pac_page() {
        let (app, _rx) = logged_in().await;
        assert_eq!(app.screen, Screen::Pac);
        assert_eq!(app.pacs.controller.phase(), Phase::Ready);
        assert_eq!(app.pacs.controller.items()[0].codigo, "PAC-2024-A");
    }

    #[tokio::test]
    async fn create_then_reload_via_events() {
        let (mut app, mut rx) = logged_in().await;
        app.pacs.controller.open_create();
        app.pacs.controller.form_input(FieldInput::Char('X'));
        app.submit_form::<Pac>();
        assert_eq!(app.pacs.controller.phase(), Phase::Submitting);

        pump(&mut app, &mut rx).await; // Submitted
        assert_eq!(
            app.pacs.controller.status().success_text(),
            Some("PAC creado exitosamente")
        );
        assert_eq!(app.pacs.controller.phase(), Phase::Loading);
        pump(&mut app, &mut rx).await; // Reloaded
        assert_eq!(app.pacs.controller.phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn delete_goes_through_confirmation() {
        let (mut app, mut rx) = logged_in().await;
        app.request_delete::<Pac>();
        let Some(Modal::ConfirmDelete { id, prompt, .. }) = app.modal.clone() else {
            panic!("expected confirmation modal");
        };
        assert_eq!(prompt, "Are you sure you want to delete this PAC?");

        app.modal = None;
        app.answer_delete::<Pac>(&id, false);
        assert_eq!(app.pacs.controller.phase(), Phase::Ready);

        app.answer_delete::<Pac>(&id, true);
        pump(&mut app, &mut rx).await; // Deleted (404)
        assert_eq!(
            app.pacs.controller.status().error_text(),
            Some("Failed to delete PAC")
        );
        assert_eq!(app.pacs.controller.items().len(), 1);
    }

    #[tokio::test]
    async fn outcomes_from_previous_session_are_dropped_after_relogin() {
        let (mut app, mut rx) = logged_in().await;
        let old_epoch = app.epoch;
        app.logout();

        app.session.login(
            crate::model::User {
                email: "otra@unah.hn".to_string(),
            },
            "tok-2".to_string(),
        );
        app.set_screen(Screen::Pac);
        assert_eq!(app.pacs.controller.phase(), Phase::Loading);

        // Same generation as the fresh page's first reload
        let ticket = ListController::<Pac>::new(StatusTimeouts::default()).begin_reload();
        let stale_rows = vec![Pac {
            id: "old".to_string(),
            codigo: "SESSION-1".to_string(),
            finalizar: false,
        }];
        app.handle_event(Stamped {
            epoch: old_epoch,
            event: AppEvent::Pac(PageEvent::Reloaded {
                ticket,
                result: Ok(crate::crud::Snapshot {
                    items: stale_rows,
                    refs: (),
                }),
            }),
        });
        app.handle_event(Stamped {
            epoch: old_epoch,
            event: AppEvent::Pac(PageEvent::Deleted(Ok(()))),
        });
        assert!(app.pacs.controller.items().is_empty());
        assert_eq!(app.pacs.controller.status().success_text(), None);

        pump(&mut app, &mut rx).await; // this session's reload
        let codes: Vec<_> = app.pacs.controller.items().iter().map(|p| p.codigo.as_str()).collect();
        assert_eq!(codes, ["PAC-2024-A"]);
    }

    #[tokio::test]
    async fn logout_clears_pages_and_returns_to_login() {
        let (mut app, _rx) = logged_in().await;
        app.logout();
        assert_eq!(app.screen, Screen::Login);
        assert!(!app.session.is_authenticated());
        assert!(app.pacs.controller.items().is_empty());
        assert_eq!(app.pacs.controller.phase(), Phase::Loading);
    }
}
