//! Unauthenticated endpoints: login and registration

use super::{ApiClient, Operation, RequestError};
use crate::model::{IssuedCredentials, LoginResponse, Registration};

impl ApiClient {
    /// `POST /auth/login` with a form-encoded `username`/`password`
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, RequestError> {
        let url = self.endpoint("auth/login");
        tracing::debug!("POST {} as {}", url, email);
        let req = self
            .client
            .post(&url)
            .form(&[("username", email), ("password", password)]);
        let response = Self::send(req, Operation::Login, "").await?;
        Self::decode(response, Operation::Login, "").await
    }

    /// `POST /auth/users`; the server issues institutional credentials
    pub async fn register(
        &self,
        registration: &Registration,
    ) -> Result<IssuedCredentials, RequestError> {
        let url = self.endpoint("auth/users");
        tracing::debug!("POST {} for {}", url, registration.email);
        let req = self.client.post(&url).json(registration);
        let response = Self::send(req, Operation::Register, "").await?;
        Self::decode(response, Operation::Register, "").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::spawn_backend;
    use axum::{http::StatusCode, routing::post, Form, Json, Router};
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Deserialize)]
    struct LoginForm {
        username: String,
        password: String,
    }

    fn auth_router() -> Router {
        Router::new()
            .route(
                "/auth/login",
                post(|Form(form): Form<LoginForm>| async move {
                    if form.username == "ana@unah.hn" && form.password == "secreta" {
                        Ok(Json(json!({"access_token": "tok-9", "token_type": "bearer"})))
                    } else {
                        Err(StatusCode::UNAUTHORIZED)
                    }
                }),
            )
            .route(
                "/auth/users",
                post(|Json(body): Json<Value>| async move {
                    for field in ["nombre", "apellido", "identidad", "email"] {
                        if body[field].as_str().unwrap_or_default().is_empty() {
                            return Err(StatusCode::UNPROCESSABLE_ENTITY);
                        }
                    }
                    Ok(Json(json!({
                        "email_institucional": "juan.perez@unah.edu.hn",
                        "password": "Xy12ab",
                        "nombre": body["nombre"],
                    })))
                }),
            )
    }

    #[tokio::test]
    async fn login_posts_form_and_returns_token() {
        let api = ApiClient::new(&spawn_backend(auth_router()).await).unwrap();

        let ok = api.login("ana@unah.hn", "secreta").await.unwrap();
        assert_eq!(ok.access_token, "tok-9");

        let err = api.login("ana@unah.hn", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to login");
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn register_returns_issued_credentials() {
        let api = ApiClient::new(&spawn_backend(auth_router()).await).unwrap();

        let issued = api
            .register(&Registration {
                nombre: "Juan".to_string(),
                apellido: "Pérez".to_string(),
                identidad: "0801199912345".to_string(),
                email: "juan@gmail.com".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(issued.email_institucional, "juan.perez@unah.edu.hn");
        assert_eq!(issued.password, "Xy12ab");

        let err = api
            .register(&Registration {
                nombre: String::new(),
                apellido: "Pérez".to_string(),
                identidad: "0801".to_string(),
                email: "juan@gmail.com".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to register");
    }
}
