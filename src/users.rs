//! User records.
//!
//! Identity lives in Supabase; this table mirrors the minimum the journal
//! needs for ownership and display.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::AppState;
use crate::auth::AuthUser;

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: Option<String>,
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), StatusCode> {
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    // The row id follows the Supabase identity when the caller registers
    // themselves, so journal ownership lines up with the JWT subject.
    let id = if Uuid::parse_str(&user.id).is_ok() {
        user.id.clone()
    } else {
        Uuid::new_v4().to_string()
    };

    sqlx::query("INSERT INTO users (id, email, name) VALUES ($1, $2, $3)")
        .bind(&id)
        .bind(&req.email)
        .bind(&req.name)
        .execute(&state.pool)
        .await
        .map_err(|e| {
            tracing::warn!("user insert failed: {e}");
            StatusCode::CONFLICT
        })?;

    Ok((
        StatusCode::CREATED,
        Json(User {
            id,
            email: req.email,
            name: req.name,
            created_at: None,
        }),
    ))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<User>, StatusCode> {
    let row: Option<User> = sqlx::query_as(
        r#"SELECT id, email, name,
           to_char(created_at, 'YYYY-MM-DD HH24:MI:SS') as created_at
           FROM users WHERE id = $1"#,
    )
    .bind(&id)
    .fetch_optional(&state.pool)
    .await
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    row.map(Json).ok_or(StatusCode::NOT_FOUND)
}
