// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User routes under `/v1/users`.

use crate::error::{AppError, Result};
use crate::mappers::user as user_mapper;
use crate::models::{UserDto, UserSimpleDto};
use crate::routes::{ApiJson, ApiPath, ApiQuery};
use crate::time_utils::parse_date;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/users", get(list_users).post(create_user))
        .route("/v1/users/simple", get(list_users_simple))
        .route("/v1/users/email", get(search_by_email))
        .route("/v1/users/email/exact", get(find_by_email))
        .route("/v1/users/older/{date}", get(find_older_than))
        .route(
            "/v1/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[derive(Deserialize)]
struct EmailQuery {
    email: Option<String>,
}

impl EmailQuery {
    fn require(self) -> Result<String> {
        self.email
            .ok_or_else(|| AppError::InvalidRequest("Missing 'email' parameter".to_string()))
    }
}

async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<UserDto>>> {
    let users = state.users.list_all().await?;
    Ok(Json(users.iter().map(user_mapper::to_dto).collect()))
}

async fn list_users_simple(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserSimpleDto>>> {
    let users = state.users.list_all().await?;
    Ok(Json(users.iter().map(user_mapper::to_simple_dto).collect()))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<UserDto>> {
    let user = state
        .users
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found with id: {}", id)))?;
    Ok(Json(user_mapper::to_dto(&user)))
}

/// Create a user. Any `id` in the body is ignored.
async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(dto): ApiJson<UserDto>,
) -> Result<(StatusCode, Json<UserDto>)> {
    let created = state.users.create(user_mapper::to_entity(dto)).await?;
    Ok((StatusCode::CREATED, Json(user_mapper::to_dto(&created))))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(dto): ApiJson<UserDto>,
) -> Result<Json<UserDto>> {
    let updated = state.users.update(id, user_mapper::to_entity(dto)).await?;
    Ok(Json(user_mapper::to_dto(&updated)))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<u64>,
) -> Result<StatusCode> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Users whose email contains the `email` query parameter.
async fn search_by_email(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> Result<Json<Vec<UserDto>>> {
    let fragment = query.require()?;
    let users = state.users.search_by_email(&fragment).await?;
    Ok(Json(users.iter().map(user_mapper::to_dto).collect()))
}

/// The first user whose email equals the `email` query parameter.
async fn find_by_email(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> Result<Json<UserDto>> {
    let email = query.require()?;
    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found with email: {}", email)))?;
    Ok(Json(user_mapper::to_dto(&user)))
}

/// Users born on or before the `yyyy-MM-dd` path date.
async fn find_older_than(
    State(state): State<Arc<AppState>>,
    ApiPath(date): ApiPath<String>,
) -> Result<Json<Vec<UserDto>>> {
    let cutoff = parse_date(&date)?;
    let users = state.users.find_older_than(cutoff).await?;
    Ok(Json(users.iter().map(user_mapper::to_dto).collect()))
}
