// Modal system for TUI overlays
//
// Self-contained modal dialogs that handle their own input and return actions.
// App just holds Option<Modal>, input routing acts on returned ModalAction.
// Resource forms are not modals here: they live in the page controllers.

use super::app::Screen;
use crate::model::IssuedCredentials;
use crossterm::event::KeyCode;

/// Actions returned by modal input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Input consumed, no state change needed
    None,
    /// Close the modal
    Close,
    /// Affirmative answer to a confirmation
    Confirm,
    /// Negative answer to a confirmation
    Decline,
    /// Copy the modal's content to the clipboard
    Copy,
}

/// Available modal types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Keyboard shortcuts
    Help,
    /// Yes/no before deleting the row with `id` on `screen`
    ConfirmDelete {
        screen: Screen,
        id: String,
        prompt: &'static str,
    },
    /// Credentials issued by a successful registration
    Credentials(IssuedCredentials),
}

impl Modal {
    pub fn help() -> Self {
        Modal::Help
    }

    pub fn confirm_delete(screen: Screen, id: impl Into<String>, prompt: &'static str) -> Self {
        Modal::ConfirmDelete {
            screen,
            id: id.into(),
            prompt,
        }
    }

    /// Handle keyboard input, return action for caller to execute
    pub fn handle_input(&self, key: KeyCode) -> ModalAction {
        match self {
            Modal::Help => match key {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => ModalAction::Close,
                _ => ModalAction::None,
            },
            Modal::ConfirmDelete { .. } => match key {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => ModalAction::Confirm,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => ModalAction::Decline,
                _ => ModalAction::None,
            },
            Modal::Credentials(_) => match key {
                KeyCode::Char('y') | KeyCode::Char('c') => ModalAction::Copy,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => ModalAction::Close,
                _ => ModalAction::None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_delete_maps_yes_and_no() {
        let modal = Modal::confirm_delete(Screen::Pac, "p1", "Are you sure?");
        assert_eq!(modal.handle_input(KeyCode::Char('y')), ModalAction::Confirm);
        assert_eq!(modal.handle_input(KeyCode::Esc), ModalAction::Decline);
        assert_eq!(modal.handle_input(KeyCode::Char('x')), ModalAction::None);
    }

    #[test]
    fn credentials_modal_copies_and_closes() {
        let modal = Modal::Credentials(IssuedCredentials {
            email_institucional: "a@unah.edu.hn".to_string(),
            password: "pw".to_string(),
        });
        assert_eq!(modal.handle_input(KeyCode::Char('y')), ModalAction::Copy);
        assert_eq!(modal.handle_input(KeyCode::Enter), ModalAction::Close);
    }
}
