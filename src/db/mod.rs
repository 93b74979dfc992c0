// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! Services talk to storage through [`UserStore`] and [`TrainingStore`]. Two
//! backends implement both: [`MemoryDb`] (default, also used by tests) and
//! [`FirestoreDb`].

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::config::StorageBackend;
use crate::error::Result;
use crate::models::{ActivityType, Training, User};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const TRAININGS: &str = "trainings";
    /// Last allocated id per collection (keyed by collection name)
    pub const COUNTERS: &str = "counters";
}

/// Persistence for users.
///
/// Listing methods return users ordered by id.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert (when `id` is `None`) or overwrite a user. Returns the stored
    /// record with its id set.
    async fn save_user(&self, user: User) -> Result<User>;

    async fn find_user(&self, id: u64) -> Result<Option<User>>;

    async fn find_all_users(&self) -> Result<Vec<User>>;

    /// Delete a user. Deleting a missing id is not an error.
    async fn delete_user(&self, id: u64) -> Result<()>;

    /// First user (lowest id) whose email equals `email`.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Users whose email contains `fragment`.
    async fn search_users_by_email(&self, fragment: &str) -> Result<Vec<User>>;

    /// Users born on or before `cutoff`.
    async fn find_users_born_on_or_before(&self, cutoff: NaiveDate) -> Result<Vec<User>>;
}

/// Persistence for trainings.
///
/// Trainings are stored with a reference to their owner and returned with the
/// owner loaded. Trainings whose owner no longer exists are not returned.
/// Listing methods return trainings ordered by id.
#[async_trait]
pub trait TrainingStore: Send + Sync {
    /// Insert (when `id` is `None`) or overwrite a training. The owning user
    /// must already be persisted.
    async fn save_training(&self, training: Training) -> Result<Training>;

    async fn find_training(&self, id: u64) -> Result<Option<Training>>;

    async fn find_all_trainings(&self) -> Result<Vec<Training>>;

    async fn find_trainings_by_user(&self, user_id: u64) -> Result<Vec<Training>>;

    /// Trainings whose end time is strictly after `cutoff`.
    async fn find_trainings_ended_after(&self, cutoff: DateTime<Utc>) -> Result<Vec<Training>>;

    async fn find_trainings_by_activity_type(
        &self,
        activity_type: ActivityType,
    ) -> Result<Vec<Training>>;
}

/// Handles to the configured storage backend.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserStore>,
    pub trainings: Arc<dyn TrainingStore>,
}

impl Storage {
    /// In-memory storage with empty collections.
    pub fn in_memory() -> Self {
        let db = Arc::new(MemoryDb::new());
        Self {
            users: db.clone(),
            trainings: db,
        }
    }

    /// Connect to the configured backend.
    pub async fn connect(backend: &StorageBackend) -> Result<Self> {
        match backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory storage");
                Ok(Self::in_memory())
            }
            StorageBackend::Firestore { project_id } => {
                let db = Arc::new(FirestoreDb::new(project_id).await?);
                Ok(Self {
                    users: db.clone(),
                    trainings: db,
                })
            }
        }
    }
}
