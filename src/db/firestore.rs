// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides storage for:
//! - Users (`users/{id}`)
//! - Trainings (`trainings/{id}`, referencing the owner by `user_id`)
//! - Id sequences (`counters/{collection}`)

use crate::db::{collections, TrainingStore, UserStore};
use crate::error::{AppError, Result};
use crate::models::{ActivityType, Training, User};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use firestore::errors::{BackoffError, FirestoreError};
use firestore::FirestoreWritePrecondition;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Stored user document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    id: u64,
    first_name: String,
    last_name: String,
    /// `yyyy-MM-dd`, so string comparison matches date order
    birthdate: NaiveDate,
    email: String,
}

impl UserDocument {
    fn into_user(self) -> User {
        User {
            id: Some(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            birthdate: self.birthdate,
            email: self.email,
        }
    }
}

/// Stored training document.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TrainingDocument {
    id: u64,
    user_id: u64,
    #[serde(with = "firestore::serialize_as_timestamp")]
    start_time: DateTime<Utc>,
    #[serde(with = "firestore::serialize_as_timestamp")]
    end_time: DateTime<Utc>,
    /// Activity type storage code
    activity_type: u64,
    distance: f64,
    average_speed: f64,
}

/// Last id handed out for a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IdSequence {
    last_id: u64,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: firestore::FirestoreDb,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── Id Allocation ───────────────────────────────────────────

    /// Insert `document` under the next id of `collection`.
    ///
    /// The sequence read, the sequence bump and the document write share one
    /// transaction, which is retried on contention. The document write also
    /// requires that no document with that id exists yet.
    async fn insert_with_next_id<T>(
        &self,
        collection: &'static str,
        document: T,
        assign_id: fn(&mut T, u64),
    ) -> Result<T>
    where
        T: Serialize + for<'de> Deserialize<'de> + Clone + Send + Sync + 'static,
    {
        self.client
            .run_transaction(move |db, transaction| {
                let mut document = document.clone();
                Box::pin(async move {
                    let sequence: Option<IdSequence> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::COUNTERS)
                        .obj()
                        .one(collection)
                        .await?;
                    let id = sequence.unwrap_or_default().last_id + 1;
                    assign_id(&mut document, id);

                    db.fluent()
                        .update()
                        .in_col(collections::COUNTERS)
                        .document_id(collection)
                        .object(&IdSequence { last_id: id })
                        .add_to_transaction(transaction)?;

                    db.fluent()
                        .update()
                        .in_col(collection)
                        .precondition(FirestoreWritePrecondition::Exists(false))
                        .document_id(id.to_string())
                        .object(&document)
                        .add_to_transaction(transaction)?;

                    Ok::<_, BackoffError<FirestoreError>>(document)
                })
            })
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to insert into {}: {}", collection, e))
            })
    }

    // ─── User Helpers ────────────────────────────────────────────

    async fn query_users(&self) -> Result<Vec<User>> {
        let documents: Vec<UserDocument> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(sort_users(documents))
    }

    // ─── Training Helpers ────────────────────────────────────────

    /// Load the owners of `documents` and build trainings, skipping orphans.
    async fn join_owners(&self, documents: Vec<TrainingDocument>) -> Result<Vec<Training>> {
        let owner_ids: BTreeSet<u64> = documents.iter().map(|d| d.user_id).collect();

        let owners: HashMap<u64, User> = stream::iter(owner_ids)
            .map(|user_id| async move {
                self.find_user(user_id)
                    .await
                    .map(|user| user.map(|u| (user_id, u)))
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<(u64, User)>>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Option<(u64, User)>>>>()?
            .into_iter()
            .flatten()
            .collect();

        let mut trainings = Vec::with_capacity(documents.len());
        for document in documents {
            match owners.get(&document.user_id) {
                Some(user) => trainings.push(into_training(document, user.clone())?),
                None => tracing::warn!(
                    training_id = document.id,
                    user_id = document.user_id,
                    "Skipping training whose owner no longer exists"
                ),
            }
        }
        trainings.sort_by_key(|t| t.id);
        Ok(trainings)
    }
}

fn sort_users(documents: Vec<UserDocument>) -> Vec<User> {
    let mut users: Vec<User> = documents.into_iter().map(UserDocument::into_user).collect();
    users.sort_by_key(|u| u.id);
    users
}

fn into_training(document: TrainingDocument, user: User) -> Result<Training> {
    let activity_type = u8::try_from(document.activity_type)
        .ok()
        .and_then(ActivityType::from_code)
        .ok_or_else(|| {
            AppError::Database(format!(
                "Unknown activity type code {} on training {}",
                document.activity_type, document.id
            ))
        })?;

    Ok(Training {
        id: Some(document.id),
        user,
        start_time: document.start_time,
        end_time: document.end_time,
        activity_type,
        distance: document.distance,
        average_speed: document.average_speed,
    })
}

#[async_trait]
impl UserStore for FirestoreDb {
    async fn save_user(&self, user: User) -> Result<User> {
        let mut document = UserDocument {
            id: user.id.unwrap_or_default(),
            first_name: user.first_name,
            last_name: user.last_name,
            birthdate: user.birthdate,
            email: user.email,
        };

        match user.id {
            Some(id) => {
                let _: () = self
                    .client
                    .fluent()
                    .update()
                    .in_col(collections::USERS)
                    .document_id(id.to_string())
                    .object(&document)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
            None => {
                document = self
                    .insert_with_next_id(collections::USERS, document, |d, id| d.id = id)
                    .await?;
                tracing::debug!(user_id = document.id, "Allocated user id");
            }
        }

        Ok(document.into_user())
    }

    async fn find_user(&self, id: u64) -> Result<Option<User>> {
        let document: Option<UserDocument> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(document.map(UserDocument::into_user))
    }

    async fn find_all_users(&self) -> Result<Vec<User>> {
        self.query_users().await
    }

    async fn delete_user(&self, id: u64) -> Result<()> {
        self.client
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(id.to_string())
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        let documents: Vec<UserDocument> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(sort_users(documents).into_iter().next())
    }

    async fn search_users_by_email(&self, fragment: &str) -> Result<Vec<User>> {
        // Firestore has no substring operator; filter client-side.
        let users = self.query_users().await?;
        Ok(users
            .into_iter()
            .filter(|u| u.email.contains(fragment))
            .collect())
    }

    async fn find_users_born_on_or_before(&self, cutoff: NaiveDate) -> Result<Vec<User>> {
        let cutoff = cutoff.format("%Y-%m-%d").to_string();
        let documents: Vec<UserDocument> = self
            .client
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.field("birthdate").less_than_or_equal(cutoff.clone()))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(sort_users(documents))
    }
}

#[async_trait]
impl TrainingStore for FirestoreDb {
    async fn save_training(&self, training: Training) -> Result<Training> {
        let user_id = training.user.id.ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("Training owner has not been persisted"))
        })?;

        let mut document = TrainingDocument {
            id: training.id.unwrap_or_default(),
            user_id,
            start_time: training.start_time,
            end_time: training.end_time,
            activity_type: u64::from(training.activity_type.code()),
            distance: training.distance,
            average_speed: training.average_speed,
        };

        match training.id {
            Some(id) => {
                let _: () = self
                    .client
                    .fluent()
                    .update()
                    .in_col(collections::TRAININGS)
                    .document_id(id.to_string())
                    .object(&document)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
            }
            None => {
                document = self
                    .insert_with_next_id(collections::TRAININGS, document, |d, id| d.id = id)
                    .await?;
                tracing::debug!(training_id = document.id, "Allocated training id");
            }
        }

        Ok(Training {
            id: Some(document.id),
            ..training
        })
    }

    async fn find_training(&self, id: u64) -> Result<Option<Training>> {
        let document: Option<TrainingDocument> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::TRAININGS)
            .obj()
            .one(&id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match document {
            Some(document) => Ok(self.join_owners(vec![document]).await?.into_iter().next()),
            None => Ok(None),
        }
    }

    async fn find_all_trainings(&self) -> Result<Vec<Training>> {
        let documents: Vec<TrainingDocument> = self
            .client
            .fluent()
            .select()
            .from(collections::TRAININGS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.join_owners(documents).await
    }

    async fn find_trainings_by_user(&self, user_id: u64) -> Result<Vec<Training>> {
        let documents: Vec<TrainingDocument> = self
            .client
            .fluent()
            .select()
            .from(collections::TRAININGS)
            .filter(move |q| q.field("user_id").eq(user_id))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.join_owners(documents).await
    }

    async fn find_trainings_ended_after(&self, cutoff: DateTime<Utc>) -> Result<Vec<Training>> {
        let documents: Vec<TrainingDocument> = self
            .client
            .fluent()
            .select()
            .from(collections::TRAININGS)
            .filter(move |q| {
                q.field("end_time")
                    .greater_than(firestore::FirestoreTimestamp(cutoff))
            })
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.join_owners(documents).await
    }

    async fn find_trainings_by_activity_type(
        &self,
        activity_type: ActivityType,
    ) -> Result<Vec<Training>> {
        let code = u64::from(activity_type.code());
        let documents: Vec<TrainingDocument> = self
            .client
            .fluent()
            .select()
            .from(collections::TRAININGS)
            .filter(move |q| q.field("activity_type").eq(code))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.join_owners(documents).await
    }
}
