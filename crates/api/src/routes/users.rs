//! User route handlers.
//!
//! JSON endpoints for registration and access-controlled account management.
//! The `{userId}` path segment accepts either a store ID or an email address.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use cantina_core::{Email, PageQuery, Pagination, Roles, UserId};

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::services::{RegisterUser, UserChanges};
use crate::state::AppState;

/// Sanitized user payload; the password hash never leaves the service layer.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub email: Email,
    pub roles: Roles,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl UserResponse {
    fn new(user: User, message: Option<&'static str>) -> Self {
        Self {
            id: user.id,
            email: user.email,
            roles: user.roles,
            message,
        }
    }
}

/// Request body for `POST /users`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserBody {
    pub email: String,
    pub password: String,
    pub roles: Option<Roles>,
}

/// Request body for `PUT /users/{userId}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserBody {
    pub email: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Roles>,
}

/// List users.
///
/// GET /users?limit&page
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(_actor): RequireAuth,
    Query(page): Query<PageQuery>,
) -> Result<Response, AppError> {
    let service = state.user_service();
    let total = service.count().await?;
    let pagination = Pagination::from_query(&page, total);
    let users = service.list(pagination.skip(), pagination.limit()).await?;

    let body: Vec<UserResponse> = users
        .into_iter()
        .map(|user| UserResponse::new(user, None))
        .collect();
    let headers = super::link_headers(state.config().base_url.join("/users").ok(), &pagination);
    Ok((headers, Json(body)).into_response())
}

/// Fetch one user.
///
/// GET /users/{userId}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service().get(&actor, &user_id).await?;
    Ok(Json(UserResponse::new(user, None)))
}

/// Register a new user.
///
/// POST /users
///
/// The only unauthenticated endpoint; accounts default to non-admin.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .user_service()
        .register(RegisterUser {
            email: body.email,
            password: body.password,
            roles: body.roles,
        })
        .await?;

    Ok(Json(UserResponse::new(user, Some("user created"))))
}

/// Update a user.
///
/// PUT /users/{userId}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(user_id): Path<String>,
    Json(body): Json<UpdateUserBody>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .user_service()
        .update(
            &actor,
            &user_id,
            UserChanges {
                email: body.email,
                password: body.password,
                roles: body.roles,
            },
        )
        .await?;

    Ok(Json(UserResponse::new(user, Some("user updated"))))
}

/// Delete a user, returning the record as it existed.
///
/// DELETE /users/{userId}
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service().delete(&actor, &user_id).await?;
    Ok(Json(UserResponse::new(user, Some("user deleted"))))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_shape() {
        let user = User {
            id: UserId::generate(),
            email: Email::parse("ana@example.com").unwrap(),
            password_hash: "hash".to_owned(),
            roles: Roles::default(),
        };
        let json =
            serde_json::to_value(UserResponse::new(user.clone(), Some("user created"))).unwrap();

        assert_eq!(json["_id"], user.id.to_string());
        assert_eq!(json["email"], "ana@example.com");
        assert_eq!(json["roles"]["admin"], false);
        assert_eq!(json["message"], "user created");
        // The hash must never appear in a response.
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_message_field_is_omitted_when_absent() {
        let user = User {
            id: UserId::generate(),
            email: Email::parse("ana@example.com").unwrap(),
            password_hash: "hash".to_owned(),
            roles: Roles::default(),
        };
        let json = serde_json::to_value(UserResponse::new(user, None)).unwrap();
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_update_body_accepts_empty_object() {
        let body: UpdateUserBody = serde_json::from_str("{}").unwrap();
        assert!(body.email.is_none());
        assert!(body.password.is_none());
        assert!(body.roles.is_none());
    }
}
