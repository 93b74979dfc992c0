// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training entity <-> DTO mapping.
//!
//! Inbound requests reference their owner by id; the mapper parses the
//! request's timestamps and resolves that id through the user service before
//! building an entity.

use crate::error::{AppError, Result};
use crate::mappers::user;
use crate::models::{Training, TrainingDto, TrainingRequest};
use crate::services::UserService;
use crate::time_utils::parse_timestamp;

#[derive(Clone)]
pub struct TrainingMapper {
    users: UserService,
}

impl TrainingMapper {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }

    /// Project a training into its outbound shape.
    pub fn to_dto(training: &Training) -> TrainingDto {
        TrainingDto {
            id: training.id,
            user_id: training.user.id,
            user: user::to_dto(&training.user),
            start_time: training.start_time,
            end_time: training.end_time,
            activity_type: training.activity_type,
            distance: training.distance,
            average_speed: training.average_speed,
        }
    }

    /// Build a transient training, resolving the owner by id.
    ///
    /// Fails with [`AppError::InvalidFormat`] when a timestamp matches no
    /// accepted layout, and with [`AppError::ReferenceNotFound`] when the user
    /// does not exist.
    pub async fn to_entity(&self, request: TrainingRequest) -> Result<Training> {
        let start_time = parse_timestamp(&request.start_time)?;
        let end_time = parse_timestamp(&request.end_time)?;

        let user = self.users.get(request.user_id).await?.ok_or_else(|| {
            AppError::ReferenceNotFound(format!("User not found with id: {}", request.user_id))
        })?;

        Ok(Training {
            id: None,
            user,
            start_time,
            end_time,
            activity_type: request.activity_type,
            distance: request.distance,
            average_speed: request.average_speed,
        })
    }
}
