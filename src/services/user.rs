// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User service.
//!
//! Enforces the identity rules around user records:
//! - `create` only accepts records without an id
//! - `update` replaces every mutable field of an existing record
//! - `delete` never reports whether the record existed

use crate::db::UserStore;
use crate::error::{AppError, Result};
use crate::models::User;
use chrono::NaiveDate;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Persist a new user and return it with its assigned id.
    pub async fn create(&self, user: User) -> Result<User> {
        if let Some(id) = user.id {
            tracing::warn!(user_id = id, "Refusing to create user that already has an id");
            return Err(AppError::AlreadyIdentified(format!(
                "User already has id {}, use update instead",
                id
            )));
        }

        let created = self.store.save_user(user).await?;
        tracing::info!(user_id = ?created.id, "User created");
        Ok(created)
    }

    /// Look up a user. A missing user is `Ok(None)`.
    pub async fn get(&self, id: u64) -> Result<Option<User>> {
        tracing::debug!(user_id = id, "Fetching user");
        self.store.find_user(id).await
    }

    pub async fn list_all(&self) -> Result<Vec<User>> {
        self.store.find_all_users().await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        self.store.delete_user(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Overwrite first name, last name, birthdate and email of user `id`.
    ///
    /// Any id carried by `patch` is ignored.
    pub async fn update(&self, id: u64, patch: User) -> Result<User> {
        let mut existing = self
            .store
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        existing.first_name = patch.first_name;
        existing.last_name = patch.last_name;
        existing.birthdate = patch.birthdate;
        existing.email = patch.email;

        let updated = self.store.save_user(existing).await?;
        tracing::info!(user_id = id, "User updated");
        Ok(updated)
    }

    /// Exact email match. Emails are not unique; the lowest id wins.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        tracing::debug!(email, "Looking up user by email");
        self.store.find_user_by_email(email).await
    }

    /// Users whose email contains `fragment`.
    pub async fn search_by_email(&self, fragment: &str) -> Result<Vec<User>> {
        tracing::debug!(fragment, "Searching users by email");
        self.store.search_users_by_email(fragment).await
    }

    /// Users born on or before `cutoff`.
    pub async fn find_older_than(&self, cutoff: NaiveDate) -> Result<Vec<User>> {
        tracing::debug!(%cutoff, "Searching users born on or before cutoff");
        self.store.find_users_born_on_or_before(cutoff).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDb;

    fn service() -> UserService {
        UserService::new(Arc::new(MemoryDb::new()))
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ann() -> User {
        User::new("Ann", "Lee", date(1990, 1, 1), "a@x.com")
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let users = service();
        let created = users.create(ann()).await.unwrap();

        assert_eq!(created.id, Some(1));
        assert_eq!(users.get(1).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_create_with_id_is_rejected() {
        let users = service();
        let mut user = ann();
        user.id = Some(7);

        let err = users.create(user).await.unwrap_err();

        assert!(matches!(err, AppError::AlreadyIdentified(_)));
        assert!(users.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        assert_eq!(service().get(99).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_is_unconditional() {
        let users = service();
        users.create(ann()).await.unwrap();

        users.delete(1).await.unwrap();
        users.delete(1).await.unwrap();
        users.delete(404).await.unwrap();

        assert!(users.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields_and_keeps_id() {
        let users = service();
        users.create(ann()).await.unwrap();

        let mut patch = User::new("Anna", "Smith", date(1991, 2, 3), "anna@y.com");
        patch.id = Some(55);
        let updated = users.update(1, patch).await.unwrap();

        assert_eq!(updated.id, Some(1));
        assert_eq!(updated.first_name, "Anna");
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.birthdate, date(1991, 2, 3));
        assert_eq!(updated.email, "anna@y.com");
        assert!(users.get(55).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_leaves_store_unchanged() {
        let users = service();
        let created = users.create(ann()).await.unwrap();

        let err = users.update(2, ann()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(users.list_all().await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_duplicate_emails_are_tolerated() {
        let users = service();
        users.create(ann()).await.unwrap();
        users
            .create(User::new("Other", "Lee", date(1980, 5, 5), "a@x.com"))
            .await
            .unwrap();

        let first = users.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(users.search_by_email("@x.").await.unwrap().len(), 2);
        assert!(users.find_by_email("nobody@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_older_than_is_inclusive() {
        let users = service();
        let cutoff = date(1990, 1, 1);
        users
            .create(User::new("Before", "X", date(1989, 12, 31), "b@x.com"))
            .await
            .unwrap();
        users
            .create(User::new("On", "X", cutoff, "o@x.com"))
            .await
            .unwrap();
        users
            .create(User::new("After", "X", date(1990, 1, 2), "a@x.com"))
            .await
            .unwrap();

        let older: Vec<String> = users
            .find_older_than(cutoff)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.first_name)
            .collect();

        assert_eq!(older, vec!["Before", "On"]);
    }
}
