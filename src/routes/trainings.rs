// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training routes under `/v1/trainings`.

use crate::error::{AppError, Result};
use crate::mappers::TrainingMapper;
use crate::models::{ActivityType, Training, TrainingDto, TrainingRequest};
use crate::routes::{ApiJson, ApiPath, ApiQuery};
use crate::time_utils::{parse_date, start_of_day};
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
        .route("/v1/trainings", get(list_trainings).post(create_training))
        .route("/v1/trainings/finished/{date}", get(list_finished_after))
        .route("/v1/trainings/activityType", get(list_by_activity_type))
        // GET takes a user id, PUT a training id.
        .route(
            "/v1/trainings/{id}",
            get(list_by_user).put(update_training),
        )
}

#[derive(Deserialize)]
struct ActivityTypeQuery {
    #[serde(rename = "activityType")]
    activity_type: Option<ActivityType>,
}

fn to_dtos(trainings: &[Training]) -> Vec<TrainingDto> {
    trainings.iter().map(TrainingMapper::to_dto).collect()
}

async fn create_training(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<TrainingRequest>,
) -> Result<(StatusCode, Json<TrainingDto>)> {
    let training = state.training_mapper.to_entity(request).await?;
    let created = state.trainings.create(training).await?;
    Ok((StatusCode::CREATED, Json(TrainingMapper::to_dto(&created))))
}

async fn list_trainings(State(state): State<Arc<AppState>>) -> Result<Json<Vec<TrainingDto>>> {
    let trainings = state.trainings.list_all().await?;
    Ok(Json(to_dtos(&trainings)))
}

async fn list_by_user(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<u64>,
) -> Result<Json<Vec<TrainingDto>>> {
    let trainings = state.trainings.list_by_user(user_id).await?;
    Ok(Json(to_dtos(&trainings)))
}

/// Trainings that ended after the start (UTC) of the `yyyy-MM-dd` path date.
async fn list_finished_after(
    State(state): State<Arc<AppState>>,
    ApiPath(date): ApiPath<String>,
) -> Result<Json<Vec<TrainingDto>>> {
    let cutoff = start_of_day(parse_date(&date)?);
    let trainings = state.trainings.list_ended_after(cutoff).await?;
    Ok(Json(to_dtos(&trainings)))
}

async fn list_by_activity_type(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ActivityTypeQuery>,
) -> Result<Json<Vec<TrainingDto>>> {
    let activity_type = query.activity_type.ok_or_else(|| {
        AppError::InvalidRequest("Missing 'activityType' parameter".to_string())
    })?;
    let trainings = state.trainings.list_by_activity_type(activity_type).await?;
    Ok(Json(to_dtos(&trainings)))
}

/// Update a training. The body's `userId` must still name an existing user,
/// but ownership itself is never changed.
async fn update_training(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(request): ApiJson<TrainingRequest>,
) -> Result<Json<TrainingDto>> {
    let patch = state.training_mapper.to_entity(request).await?.into();
    let updated = state.trainings.update(id, patch).await?;
    Ok(Json(TrainingMapper::to_dto(&updated)))
}
