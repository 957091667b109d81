//! Login and registration forms
//!
//! Both forms validate locally before any network call, surface at most one
//! error at a time, and refuse re-entrant submits while a request is out.

use crate::api::{ApiClient, RequestError};
use crate::crud::form::edit_text;
use crate::crud::{Field, FieldInput, FieldKind, FormError, ValidationError};
use crate::model::{IssuedCredentials, Registration, User};
use crate::session::SharedSession;
use regex::Regex;
use std::sync::OnceLock;

/// An `@` with a `.` somewhere after it
const EMAIL_PATTERN: &str = r"@.*\.";

fn looks_like_email(email: &str) -> bool {
    static EMAIL: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    match EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN)) {
        Ok(re) => re.is_match(email.trim()),
        Err(e) => {
            // Leave the decision to the server rather than reject everyone
            tracing::error!("email pattern failed to build: {}", e);
            true
        }
    }
}

fn wrap(focus: usize, count: usize, forward: bool) -> usize {
    if forward {
        (focus + 1) % count
    } else {
        (focus + count - 1) % count
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Login
// ─────────────────────────────────────────────────────────────────────────────

/// Validated login credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub focus: usize,
    pub error: Option<FormError>,
    pub submitting: bool,
}

impl LoginForm {
    const FIELDS: usize = 2;

    pub fn fields(&self) -> Vec<Field> {
        vec![
            Field {
                label: "Email",
                value: self.email.clone(),
                kind: FieldKind::Text,
            },
            Field {
                label: "Password",
                value: "•".repeat(self.password.chars().count()),
                kind: FieldKind::Text,
            },
        ]
    }

    pub fn input(&mut self, input: FieldInput) {
        if self.submitting {
            return;
        }
        let buf = match self.focus {
            0 => &mut self.email,
            _ => &mut self.password,
        };
        if edit_text(buf, input) {
            self.error = None;
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = wrap(self.focus, Self::FIELDS, true);
    }

    pub fn focus_prev(&mut self) {
        self.focus = wrap(self.focus, Self::FIELDS, false);
    }

    pub fn validate(&self) -> Result<Credentials, ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if !looks_like_email(&self.email) {
            return Err(ValidationError::EmailInvalid);
        }
        if self.password.trim().is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        Ok(Credentials {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    pub fn begin_submit(&mut self) -> Option<Credentials> {
        if self.submitting {
            return None;
        }
        match self.validate() {
            Ok(credentials) => {
                self.error = None;
                self.submitting = true;
                Some(credentials)
            }
            Err(err) => {
                self.error = Some(FormError::Invalid(err));
                None
            }
        }
    }

    /// On failure the form keeps its fields and shows the error
    pub fn finish_submit(&mut self, result: &Result<User, RequestError>) {
        self.submitting = false;
        match result {
            Ok(_) => *self = Self::default(),
            Err(err) => {
                self.password.clear();
                self.error = Some(FormError::Request(err.clone()));
            }
        }
    }
}

/// Authenticate and store the token in the session
pub async fn login(
    api: &ApiClient,
    session: &SharedSession,
    credentials: Credentials,
) -> Result<User, RequestError> {
    let response = api.login(&credentials.email, &credentials.password).await?;
    let user = User {
        email: credentials.email,
    };
    session.login(user.clone(), response.access_token);
    Ok(user)
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub nombre: String,
    pub apellido: String,
    pub identidad: String,
    pub email: String,
    pub focus: usize,
    pub error: Option<FormError>,
    pub submitting: bool,
    /// Set once the server has issued credentials
    pub issued: Option<IssuedCredentials>,
}

impl RegisterForm {
    const LABELS: [&'static str; 4] = ["nombre", "apellido", "identidad", "email"];

    fn values(&self) -> [&String; 4] {
        [&self.nombre, &self.apellido, &self.identidad, &self.email]
    }

    pub fn fields(&self) -> Vec<Field> {
        Self::LABELS
            .into_iter()
            .zip(self.values())
            .map(|(label, value)| Field {
                label,
                value: value.clone(),
                kind: FieldKind::Text,
            })
            .collect()
    }

    pub fn input(&mut self, input: FieldInput) {
        if self.submitting {
            return;
        }
        let buf = match self.focus {
            0 => &mut self.nombre,
            1 => &mut self.apellido,
            2 => &mut self.identidad,
            _ => &mut self.email,
        };
        if edit_text(buf, input) {
            self.error = None;
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = wrap(self.focus, Self::LABELS.len(), true);
    }

    pub fn focus_prev(&mut self) {
        self.focus = wrap(self.focus, Self::LABELS.len(), false);
    }

    pub fn validate(&self) -> Result<Registration, ValidationError> {
        for (label, value) in Self::LABELS.into_iter().zip(self.values()) {
            if value.trim().is_empty() {
                return Err(ValidationError::FieldRequired(label));
            }
        }
        Ok(Registration {
            nombre: self.nombre.trim().to_string(),
            apellido: self.apellido.trim().to_string(),
            identidad: self.identidad.trim().to_string(),
            email: self.email.trim().to_string(),
        })
    }

    pub fn begin_submit(&mut self) -> Option<Registration> {
        if self.submitting {
            return None;
        }
        match self.validate() {
            Ok(registration) => {
                self.error = None;
                self.submitting = true;
                Some(registration)
            }
            Err(err) => {
                self.error = Some(FormError::Invalid(err));
                None
            }
        }
    }

    pub fn finish_submit(&mut self, result: Result<IssuedCredentials, RequestError>) {
        self.submitting = false;
        match result {
            Ok(issued) => {
                tracing::info!("Registered {}", issued.email_institucional);
                *self = Self {
                    issued: Some(issued),
                    ..Self::default()
                };
            }
            Err(err) => self.error = Some(FormError::Request(err)),
        }
    }
}

/// Issued credentials formatted for the clipboard
pub fn credentials_text(issued: &IssuedCredentials) -> String {
    format!(
        "Email: {}\nPassword: {}",
        issued.email_institucional, issued.password
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::spawn_backend;
    use axum::{http::StatusCode, routing::post, Form, Json, Router};
    use serde::Deserialize;
    use serde_json::json;

    fn login_form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
            ..LoginForm::default()
        }
    }

    #[test]
    fn login_validation_order() {
        let cases = [
            (login_form("", ""), ValidationError::EmailRequired),
            (login_form("  ", "x"), ValidationError::EmailRequired),
            (login_form("ana", ""), ValidationError::EmailInvalid),
            (login_form("ana@unah", "x"), ValidationError::EmailInvalid),
            (login_form("ana.b@unah", "x"), ValidationError::EmailInvalid),
            (login_form("ana@unah.hn", ""), ValidationError::PasswordRequired),
            (login_form("ana@unah.hn", "   "), ValidationError::PasswordRequired),
        ];
        for (form, expected) in cases {
            assert_eq!(form.validate().unwrap_err(), expected, "{:?}", form.email);
        }
        assert_eq!(
            login_form(" ana@unah.hn ", "pw").validate().unwrap().email,
            "ana@unah.hn"
        );
    }

    #[test]
    fn email_check_is_at_then_dot() {
        assert!(Regex::new(EMAIL_PATTERN).is_ok());
        assert!(looks_like_email("ana@unah.edu.hn"));
        assert!(looks_like_email("ana maria@unah.hn"));
        assert!(looks_like_email("a@b@c.hn"));
        assert!(!looks_like_email("ana.maria@unah"));
        assert!(!looks_like_email("unah.hn"));
    }

    #[test]
    fn login_input_targets_focused_field_and_masks_password() {
        let mut form = LoginForm::default();
        form.error = Some(FormError::Invalid(ValidationError::EmailRequired));
        form.input(FieldInput::Char('a'));
        assert!(form.error.is_none());

        form.focus_next();
        form.input(FieldInput::Char('p'));
        form.input(FieldInput::Char('w'));
        assert_eq!(form.email, "a");
        assert_eq!(form.password, "pw");
        assert_eq!(form.fields()[1].value, "••");

        form.focus_next();
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn register_reports_first_missing_field() {
        let mut form = RegisterForm {
            nombre: "Juan".to_string(),
            apellido: " ".to_string(),
            ..RegisterForm::default()
        };
        assert!(form.begin_submit().is_none());
        assert_eq!(
            form.error.as_ref().map(|e| e.to_string()).as_deref(),
            Some("apellido required")
        );

        form.apellido = "Pérez".to_string();
        form.identidad = "0801199912345".to_string();
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::FieldRequired("email")
        );
    }

    #[test]
    fn register_success_keeps_only_issued_credentials() {
        let mut form = RegisterForm {
            nombre: "Juan".to_string(),
            apellido: "Pérez".to_string(),
            identidad: "0801".to_string(),
            email: "juan@gmail.com".to_string(),
            ..RegisterForm::default()
        };
        let registration = form.begin_submit().unwrap();
        assert!(form.submitting);
        assert!(form.begin_submit().is_none());
        assert_eq!(registration.apellido, "Pérez");

        let issued = IssuedCredentials {
            email_institucional: "juan.perez@unah.edu.hn".to_string(),
            password: "Xy12ab".to_string(),
        };
        form.finish_submit(Ok(issued.clone()));
        assert!(form.nombre.is_empty());
        assert_eq!(form.issued.as_ref(), Some(&issued));
        assert_eq!(
            credentials_text(&issued),
            "Email: juan.perez@unah.edu.hn\nPassword: Xy12ab"
        );
    }

    #[derive(Deserialize)]
    struct LoginBody {
        username: String,
        password: String,
    }

    #[tokio::test]
    async fn login_stores_token_in_session() {
        let router = Router::new().route(
            "/auth/login",
            post(|Form(body): Form<LoginBody>| async move {
                if body.username == "ana@unah.hn" && body.password == "secreta" {
                    Ok(Json(json!({"access_token": "tok-42", "token_type": "bearer"})))
                } else {
                    Err(StatusCode::UNAUTHORIZED)
                }
            }),
        );
        let api = ApiClient::new(&spawn_backend(router).await).unwrap();
        let session = SharedSession::new();

        let mut form = login_form("ana@unah.hn", "wrong");
        let credentials = form.begin_submit().unwrap();
        let result = login(&api, &session, credentials).await;
        form.finish_submit(&result);
        assert!(!session.is_authenticated());
        assert_eq!(
            form.error.as_ref().map(|e| e.to_string()).as_deref(),
            Some("Failed to login")
        );
        assert_eq!(form.email, "ana@unah.hn");

        form.password = "secreta".to_string();
        let credentials = form.begin_submit().unwrap();
        let user = login(&api, &session, credentials).await.unwrap();
        assert_eq!(user.email, "ana@unah.hn");
        assert_eq!(session.token().as_deref(), Some("tok-42"));
    }
}
