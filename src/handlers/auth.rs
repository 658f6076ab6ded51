use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::{hash_password, issue_token, verify_password, AuthorizedUser};
use crate::config::Config;
use crate::models::{initials_of, NewUser, User};
use crate::registry::AppRegistry;
use crate::repository::UserStore;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::{created, success};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

async fn register(
    users: &dyn UserStore,
    config: &Config,
    req: SignupRequest,
) -> AppResult<AuthResponse> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::ValidationError("Name is required".to_string()));
    }
    let email = req.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(AppError::ValidationError(
            "A valid email address is required".to_string(),
        ));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::ValidationError(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let user = users
        .create(NewUser {
            name: name.to_string(),
            initials: initials_of(name),
            email,
            password_hash: hash_password(&req.password)?,
        })
        .await?;

    let token = issue_token(user.id, &config.jwt_secret, config.token_ttl_hours)?;

    tracing::info!(user_id = %user.id, "New user registered");
    Ok(AuthResponse { user, token })
}

async fn authenticate(
    users: &dyn UserStore,
    config: &Config,
    req: SigninRequest,
) -> AppResult<AuthResponse> {
    let email = req.email.trim().to_lowercase();

    // Unknown email and bad password are deliberately indistinguishable.
    let user = users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid credentials".to_string()))?;

    if !verify_password(&user.password_hash, &req.password) {
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    let token = issue_token(user.id, &config.jwt_secret, config.token_ttl_hours)?;

    Ok(AuthResponse { user, token })
}

pub async fn signup(
    State(registry): State<AppRegistry>,
    Json(req): Json<SignupRequest>,
) -> AppResult<Response> {
    let response = register(registry.user_store(), registry.config(), req).await?;
    Ok(created(response, "Account created"))
}

pub async fn signin(
    State(registry): State<AppRegistry>,
    Json(req): Json<SigninRequest>,
) -> AppResult<Response> {
    let response = authenticate(registry.user_store(), registry.config(), req).await?;
    Ok(success(response, "Signed in"))
}

pub async fn me(AuthorizedUser(user): AuthorizedUser) -> Response {
    success(user, "Current user")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// In-memory users with the same unique-email rule as the real store.
    struct MemoryUsers {
        rows: Mutex<Vec<User>>,
    }

    impl MemoryUsers {
        fn new() -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl UserStore for MemoryUsers {
        async fn create(&self, user: NewUser) -> AppResult<User> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|u| u.email == user.email) {
                return Err(AppError::Conflict(
                    "An account with this email already exists".to_string(),
                ));
            }
            let created = User {
                id: Uuid::new_v4(),
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                initials: user.initials,
                created_at: Utc::now(),
            };
            rows.push(created.clone());
            Ok(created)
        }

        async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned())
        }
    }

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/tunewave".to_string(),
            port: 0,
            jwt_secret: "test-secret".to_string(),
            token_ttl_hours: 1,
            genai_api_url: "http://localhost".to_string(),
            genai_api_key: None,
            genai_model: "test".to_string(),
        }
    }

    fn signup_request(email: &str) -> SignupRequest {
        SignupRequest {
            name: "Jane Doe".to_string(),
            email: email.to_string(),
            password: "correct-horse-battery".to_string(),
        }
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let users = MemoryUsers::new();
        let config = test_config();
        register(&users, &config, signup_request("jane.doe@example.com"))
            .await
            .unwrap();

        let unknown_email = authenticate(
            &users,
            &config,
            SigninRequest {
                email: "nobody@example.com".to_string(),
                password: "correct-horse-battery".to_string(),
            },
        )
        .await;

        let wrong_password = authenticate(
            &users,
            &config,
            SigninRequest {
                email: "jane.doe@example.com".to_string(),
                password: "not-the-password".to_string(),
            },
        )
        .await;

        let unknown_msg = match unknown_email {
            Err(AppError::AuthError(msg)) => msg,
            other => panic!("expected auth error, got {:?}", other.map(|_| ())),
        };
        let wrong_msg = match wrong_password {
            Err(AppError::AuthError(msg)) => msg,
            other => panic!("expected auth error, got {:?}", other.map(|_| ())),
        };
        assert_eq!(unknown_msg, wrong_msg);
    }

    #[tokio::test]
    async fn valid_credentials_sign_in() {
        let users = MemoryUsers::new();
        let config = test_config();
        register(&users, &config, signup_request("jane.doe@example.com"))
            .await
            .unwrap();

        let response = authenticate(
            &users,
            &config,
            SigninRequest {
                email: "Jane.Doe@Example.com ".to_string(),
                password: "correct-horse-battery".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(response.user.email, "jane.doe@example.com");
        assert!(!response.token.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_signup_is_a_conflict() {
        let users = MemoryUsers::new();
        let config = test_config();
        register(&users, &config, signup_request("jane.doe@example.com"))
            .await
            .unwrap();

        let second = register(&users, &config, signup_request("Jane.Doe@example.com")).await;
        assert!(matches!(second, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let users = MemoryUsers::new();
        let config = test_config();

        let mut req = signup_request("jane.doe@example.com");
        req.password = "short".to_string();
        let result = register(&users, &config, req).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn invalid_email_is_rejected() {
        let users = MemoryUsers::new();
        let config = test_config();

        let result = register(&users, &config, signup_request("not-an-email")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
