// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, network task outcomes)
// - Key dispatch to modals, global shortcuts and the active screen

pub mod app;
pub mod clipboard;
pub mod components;
pub mod layout;
pub mod modal;
pub mod theme;
pub mod views;

use crate::api::ApiClient;
use crate::config::Config;
use crate::crud::FieldInput;
use crate::events::Stamped;
use crate::logging::LogBuffer;
use crate::session::SharedSession;
use anyhow::{Context, Result};
use app::{App, PageAccess, Screen};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use modal::{Modal, ModalAction};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::model::{Asignatura, Pac};

/// Capacity of the task-outcome channel
const EVENT_CHANNEL_SIZE: usize = 100;

/// Run the TUI
///
/// Sets up the terminal, runs the event loop and restores the terminal
/// whether the loop ended cleanly or not.
pub async fn run_tui(config: Config, log_buffer: LogBuffer) -> Result<()> {
    let api = ApiClient::new(&config.api_url)?;
    let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
    let mut app = App::new(&config, api, SharedSession::new(), log_buffer, tx);

    tracing::info!("matricula {} using backend {}", crate::config::VERSION, config.api_url);

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut app, &mut rx).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on whichever comes first: a key press, the redraw tick, or the
/// outcome of a spawned backend call.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::Receiver<Stamped>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        handle_key_event(app, key_event);
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.tick(Instant::now());
            }

            Some(event) = rx.recv() => {
                app.handle_event(event);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Modal → Global → Screen
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }

    if handle_modal_input(app, &key_event) {
        return;
    }

    if handle_global_keys(app, &key_event) {
        return;
    }

    match app.screen {
        Screen::Login => handle_login_keys(app, &key_event),
        Screen::Register => handle_register_keys(app, &key_event),
        Screen::Pac => handle_page_keys::<Pac>(app, &key_event),
        Screen::Asignaturas => handle_page_keys::<Asignatura>(app, &key_event),
    }
}

/// Whether plain characters should go into a text field
fn is_typing(app: &App) -> bool {
    match app.screen {
        Screen::Login | Screen::Register => true,
        Screen::Pac => app.pacs.controller.form().is_some(),
        Screen::Asignaturas => app.asignaturas.controller.form().is_some(),
    }
}

/// Handle modal input - returns true if modal absorbed the input
fn handle_modal_input(app: &mut App, key_event: &KeyEvent) -> bool {
    let Some(modal) = app.modal.as_ref() else {
        return false;
    };

    match modal.handle_input(key_event.code) {
        ModalAction::None => {}
        ModalAction::Close => app.modal = None,
        action @ (ModalAction::Confirm | ModalAction::Decline) => {
            let confirmed = action == ModalAction::Confirm;
            if let Some(Modal::ConfirmDelete { screen, id, .. }) = app.modal.take() {
                match screen {
                    Screen::Pac => app.answer_delete::<Pac>(&id, confirmed),
                    Screen::Asignaturas => app.answer_delete::<Asignatura>(&id, confirmed),
                    Screen::Login | Screen::Register => {}
                }
            }
        }
        ModalAction::Copy => {
            let text = match &app.modal {
                Some(Modal::Credentials(issued)) => Some(crate::account::credentials_text(issued)),
                _ => None,
            };
            if let Some(text) = text {
                match clipboard::copy_to_clipboard(&text) {
                    Ok(()) => app.show_toast("✓ Copied to clipboard"),
                    Err(e) => {
                        tracing::warn!("{:#}", e);
                        app.show_toast("✗ Failed to copy");
                    }
                }
            }
        }
    }

    true
}

/// Handle global keys - returns true if handled
fn handle_global_keys(app: &mut App, key_event: &KeyEvent) -> bool {
    let key = key_event.code;

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
        app.should_quit = true;
        return true;
    }

    let typing = is_typing(app);
    let authenticated = app.session.is_authenticated();

    match key {
        KeyCode::F(1) if !authenticated => app.set_screen(Screen::Login),
        KeyCode::F(2) if !authenticated => app.set_screen(Screen::Register),
        KeyCode::F(1) if !typing => app.set_screen(Screen::Pac),
        KeyCode::F(2) if !typing => app.set_screen(Screen::Asignaturas),
        KeyCode::Char('q') | KeyCode::Char('Q') if !typing => app.should_quit = true,
        KeyCode::Char('?') if !typing => app.modal = Some(Modal::help()),
        KeyCode::Char('L') if !typing => app.show_logs = !app.show_logs,
        _ => return false,
    }
    true
}

/// Map a key to a form field edit. Space stays a character; checkboxes
/// treat it as a toggle.
fn field_input(key_event: &KeyEvent) -> Option<FieldInput> {
    match key_event.code {
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(FieldInput::Char(c))
        }
        KeyCode::Backspace => Some(FieldInput::Backspace),
        KeyCode::Left => Some(FieldInput::Prev),
        KeyCode::Right => Some(FieldInput::Next),
        _ => None,
    }
}

fn handle_login_keys(app: &mut App, key_event: &KeyEvent) {
    if app.login.submitting {
        return;
    }
    match key_event.code {
        KeyCode::Char('r') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            app.set_screen(Screen::Register)
        }
        KeyCode::Tab | KeyCode::Down => app.login.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.login.focus_prev(),
        KeyCode::Enter => app.submit_login(),
        _ => {
            if let Some(input) = field_input(key_event) {
                app.login.input(input);
            }
        }
    }
}

fn handle_register_keys(app: &mut App, key_event: &KeyEvent) {
    if app.register.submitting {
        return;
    }
    match key_event.code {
        KeyCode::Char('r') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            app.set_screen(Screen::Login)
        }
        KeyCode::Esc => app.set_screen(Screen::Login),
        KeyCode::Tab | KeyCode::Down => app.register.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.register.focus_prev(),
        KeyCode::Enter => app.submit_register(),
        _ => {
            if let Some(input) = field_input(key_event) {
                app.register.input(input);
            }
        }
    }
}

/// Keys on a resource screen: the form when one is open, the list otherwise
fn handle_page_keys<R: PageAccess>(app: &mut App, key_event: &KeyEvent) {
    let controller = &mut R::page_mut(app).controller;

    if controller.form().is_some() {
        match key_event.code {
            KeyCode::Tab | KeyCode::Down => controller.form_focus_next(),
            KeyCode::BackTab | KeyCode::Up => controller.form_focus_prev(),
            KeyCode::Esc => {
                controller.cancel_form();
            }
            KeyCode::Enter => app.submit_form::<R>(),
            _ => {
                if let Some(input) = field_input(key_event) {
                    controller.form_input(input);
                }
            }
        }
        return;
    }

    match key_event.code {
        KeyCode::Down | KeyCode::Char('j') => controller.select_next(),
        KeyCode::Up | KeyCode::Char('k') => controller.select_prev(),
        KeyCode::Char('n') => {
            controller.open_create();
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            controller.open_edit_selected();
        }
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete::<R>(),
        KeyCode::Char('r') => app.reload::<R>(),
        KeyCode::Char('1') => app.set_screen(Screen::Pac),
        KeyCode::Char('2') => app.set_screen(Screen::Asignaturas),
        KeyCode::Char('o') => app.logout(),
        _ => {}
    }
}
