// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory storage backend.
//!
//! Records live in concurrent maps keyed by id. Ids are allocated from
//! per-collection sequences starting at 1. Trainings are kept as rows that
//! reference their owner by id and carry the activity type as its storage
//! code, mirroring the persisted layout of the Firestore backend.

use crate::db::{TrainingStore, UserStore};
use crate::error::{AppError, Result};
use crate::models::{ActivityType, Training, User};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stored form of a training.
#[derive(Debug, Clone)]
struct TrainingRow {
    id: u64,
    user_id: u64,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    activity_type: u8,
    distance: f64,
    average_speed: f64,
}

/// In-memory database.
#[derive(Default)]
pub struct MemoryDb {
    users: DashMap<u64, User>,
    trainings: DashMap<u64, TrainingRow>,
    user_seq: AtomicU64,
    training_seq: AtomicU64,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the id for a record: keep an existing one, or allocate the next.
    fn assign_id(seq: &AtomicU64, id: Option<u64>) -> u64 {
        match id {
            Some(id) => {
                seq.fetch_max(id, Ordering::SeqCst);
                id
            }
            None => seq.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    fn sorted_users(&self, keep: impl Fn(&User) -> bool) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by_key(|user| user.id);
        users
    }

    /// Attach the owner to a row. `None` when the owner has been deleted.
    fn join(&self, row: &TrainingRow) -> Result<Option<Training>> {
        let Some(user) = self.users.get(&row.user_id).map(|entry| entry.value().clone()) else {
            tracing::warn!(
                training_id = row.id,
                user_id = row.user_id,
                "Skipping training whose owner no longer exists"
            );
            return Ok(None);
        };

        let activity_type = ActivityType::from_code(row.activity_type).ok_or_else(|| {
            AppError::Database(format!(
                "Unknown activity type code {} on training {}",
                row.activity_type, row.id
            ))
        })?;

        Ok(Some(Training {
            id: Some(row.id),
            user,
            start_time: row.start_time,
            end_time: row.end_time,
            activity_type,
            distance: row.distance,
            average_speed: row.average_speed,
        }))
    }

    fn sorted_trainings(&self, keep: impl Fn(&TrainingRow) -> bool) -> Result<Vec<Training>> {
        let mut rows: Vec<TrainingRow> = self
            .trainings
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by_key(|row| row.id);

        let mut trainings = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(training) = self.join(row)? {
                trainings.push(training);
            }
        }
        Ok(trainings)
    }
}

#[async_trait]
impl UserStore for MemoryDb {
    async fn save_user(&self, mut user: User) -> Result<User> {
        let id = Self::assign_id(&self.user_seq, user.id);
        user.id = Some(id);
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: u64) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_all_users(&self) -> Result<Vec<User>> {
        Ok(self.sorted_users(|_| true))
    }

    async fn delete_user(&self, id: u64) -> Result<()> {
        self.users.remove(&id);
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.sorted_users(|user| user.email == email).into_iter().next())
    }

    async fn search_users_by_email(&self, fragment: &str) -> Result<Vec<User>> {
        Ok(self.sorted_users(|user| user.email.contains(fragment)))
    }

    async fn find_users_born_on_or_before(&self, cutoff: NaiveDate) -> Result<Vec<User>> {
        Ok(self.sorted_users(|user| user.birthdate <= cutoff))
    }
}

#[async_trait]
impl TrainingStore for MemoryDb {
    async fn save_training(&self, training: Training) -> Result<Training> {
        let user_id = training.user.id.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Training owner has not been persisted"))
        })?;

        let id = Self::assign_id(&self.training_seq, training.id);
        let row = TrainingRow {
            id,
            user_id,
            start_time: training.start_time,
            end_time: training.end_time,
            activity_type: training.activity_type.code(),
            distance: training.distance,
            average_speed: training.average_speed,
        };
        self.trainings.insert(id, row);

        Ok(Training {
            id: Some(id),
            ..training
        })
    }

    async fn find_training(&self, id: u64) -> Result<Option<Training>> {
        let row = self.trainings.get(&id).map(|entry| entry.value().clone());
        match row {
            Some(row) => self.join(&row),
            None => Ok(None),
        }
    }

    async fn find_all_trainings(&self) -> Result<Vec<Training>> {
        self.sorted_trainings(|_| true)
    }

    async fn find_trainings_by_user(&self, user_id: u64) -> Result<Vec<Training>> {
        self.sorted_trainings(|row| row.user_id == user_id)
    }

    async fn find_trainings_ended_after(&self, cutoff: DateTime<Utc>) -> Result<Vec<Training>> {
        self.sorted_trainings(|row| row.end_time > cutoff)
    }

    async fn find_trainings_by_activity_type(
        &self,
        activity_type: ActivityType,
    ) -> Result<Vec<Training>> {
        let code = activity_type.code();
        self.sorted_trainings(|row| row.activity_type == code)
    }
}
