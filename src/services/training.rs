// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Training service.

use crate::db::TrainingStore;
use crate::error::{AppError, Result};
use crate::models::{ActivityType, Training, TrainingPatch};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct TrainingService {
    store: Arc<dyn TrainingStore>,
}

impl TrainingService {
    pub fn new(store: Arc<dyn TrainingStore>) -> Self {
        Self { store }
    }

    /// Persist a training and return it with its assigned id.
    ///
    /// Field values are stored as given (no range or ordering checks).
    pub async fn create(&self, training: Training) -> Result<Training> {
        let created = self.store.save_training(training).await?;
        tracing::info!(
            training_id = ?created.id,
            user_id = ?created.user.id,
            activity_type = %created.activity_type,
            "Training created"
        );
        Ok(created)
    }

    pub async fn list_all(&self) -> Result<Vec<Training>> {
        self.store.find_all_trainings().await
    }

    pub async fn list_by_user(&self, user_id: u64) -> Result<Vec<Training>> {
        tracing::debug!(user_id, "Fetching trainings for user");
        self.store.find_trainings_by_user(user_id).await
    }

    /// Trainings that ended strictly after `cutoff`.
    pub async fn list_ended_after(&self, cutoff: DateTime<Utc>) -> Result<Vec<Training>> {
        tracing::debug!(%cutoff, "Fetching trainings ended after cutoff");
        self.store.find_trainings_ended_after(cutoff).await
    }

    pub async fn list_by_activity_type(&self, activity_type: ActivityType) -> Result<Vec<Training>> {
        tracing::debug!(%activity_type, "Fetching trainings by activity type");
        self.store.find_trainings_by_activity_type(activity_type).await
    }

    /// Overwrite times, activity type, distance and speed of training `id`.
    ///
    /// The id and owning user are left untouched.
    pub async fn update(&self, id: u64, patch: TrainingPatch) -> Result<Training> {
        let mut existing = self
            .store
            .find_training(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Training {} not found", id)))?;

        existing.apply(patch);

        let updated = self.store.save_training(existing).await?;
        tracing::info!(training_id = id, "Training updated");
        Ok(updated)
    }
}
