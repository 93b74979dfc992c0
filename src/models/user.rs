// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A user profile.
///
/// `id` is `None` until the record has been persisted. Email addresses are
/// not unique.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Option<u64>,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub email: String,
}

impl User {
    /// Build a transient (not yet persisted) user.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birthdate: NaiveDate,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birthdate,
            email: email.into(),
        }
    }
}

/// Full user representation on the wire.
///
/// `birthdate` is serialized as `yyyy-MM-dd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: Option<u64>,
    pub first_name: String,
    pub last_name: String,
    pub birthdate: NaiveDate,
    pub email: String,
}

/// Minimal user representation for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSimpleDto {
    pub id: Option<u64>,
    pub first_name: String,
    pub last_name: String,
}
