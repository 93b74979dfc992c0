// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Training model for storage and API.

use crate::models::user::{User, UserDto};
use crate::time_utils::timestamp_format;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of activity performed during a training.
///
/// Stored as a small integer code (see [`ActivityType::code`]). On the wire
/// the display name is used; the upper-case name is also accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    #[serde(rename = "Running", alias = "RUNNING")]
    Running,
    #[serde(rename = "Cycling", alias = "CYCLING")]
    Cycling,
    #[serde(rename = "Walking", alias = "WALKING")]
    Walking,
    #[serde(rename = "Swimming", alias = "SWIMMING")]
    Swimming,
    #[serde(rename = "Tennis", alias = "TENNIS")]
    Tennis,
}

impl ActivityType {
    pub const ALL: [ActivityType; 5] = [
        ActivityType::Running,
        ActivityType::Cycling,
        ActivityType::Walking,
        ActivityType::Swimming,
        ActivityType::Tennis,
    ];

    /// Storage code for this activity type.
    ///
    /// The code table is append only: existing codes must never be
    /// renumbered or reused.
    pub fn code(self) -> u8 {
        match self {
            ActivityType::Running => 0,
            ActivityType::Cycling => 1,
            ActivityType::Walking => 2,
            ActivityType::Swimming => 3,
            ActivityType::Tennis => 4,
        }
    }

    /// Look up an activity type by its storage code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ActivityType::Running),
            1 => Some(ActivityType::Cycling),
            2 => Some(ActivityType::Walking),
            3 => Some(ActivityType::Swimming),
            4 => Some(ActivityType::Tennis),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ActivityType::Running => "Running",
            ActivityType::Cycling => "Cycling",
            ActivityType::Walking => "Walking",
            ActivityType::Swimming => "Swimming",
            ActivityType::Tennis => "Tennis",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A training session owned by a user.
///
/// `id` is `None` until persisted. `user` is the owning user as resolved when
/// the training was mapped or loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Training {
    pub id: Option<u64>,
    pub user: User,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub activity_type: ActivityType,
    pub distance: f64,
    pub average_speed: f64,
}

/// Fields of a training that an update may overwrite.
///
/// Identifier and owning user cannot be changed through a patch.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingPatch {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub activity_type: ActivityType,
    pub distance: f64,
    pub average_speed: f64,
}

impl From<Training> for TrainingPatch {
    fn from(training: Training) -> Self {
        Self {
            start_time: training.start_time,
            end_time: training.end_time,
            activity_type: training.activity_type,
            distance: training.distance,
            average_speed: training.average_speed,
        }
    }
}

impl Training {
    /// Overwrite the mutable fields from `patch`.
    pub fn apply(&mut self, patch: TrainingPatch) {
        self.start_time = patch.start_time;
        self.end_time = patch.end_time;
        self.activity_type = patch.activity_type;
        self.distance = patch.distance;
        self.average_speed = patch.average_speed;
    }
}

/// Inbound training shape: the owner is referenced by id only.
///
/// Timestamps are kept as sent and parsed by the training mapper. Any `id` or
/// `user` field sent by the client is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingRequest {
    pub user_id: u64,
    pub start_time: String,
    pub end_time: String,
    pub activity_type: ActivityType,
    pub distance: f64,
    pub average_speed: f64,
}

/// Outbound training shape with the owner embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingDto {
    pub id: Option<u64>,
    pub user_id: Option<u64>,
    pub user: UserDto,
    #[serde(with = "timestamp_format")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "timestamp_format")]
    pub end_time: DateTime<Utc>,
    pub activity_type: ActivityType,
    pub distance: f64,
    pub average_speed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_activity_codes_are_stable() {
        assert_eq!(ActivityType::Running.code(), 0);
        assert_eq!(ActivityType::Cycling.code(), 1);
        assert_eq!(ActivityType::Walking.code(), 2);
        assert_eq!(ActivityType::Swimming.code(), 3);
        assert_eq!(ActivityType::Tennis.code(), 4);
    }

    #[test]
    fn test_activity_code_lookup() {
        for activity in ActivityType::ALL {
            assert_eq!(ActivityType::from_code(activity.code()), Some(activity));
        }
        assert_eq!(ActivityType::from_code(5), None);
    }

    #[test]
    fn test_activity_type_wire_names() {
        assert_eq!(
            serde_json::to_value(ActivityType::Swimming).unwrap(),
            json!("Swimming")
        );

        let display: ActivityType = serde_json::from_value(json!("Tennis")).unwrap();
        let upper: ActivityType = serde_json::from_value(json!("TENNIS")).unwrap();
        assert_eq!(display, ActivityType::Tennis);
        assert_eq!(upper, ActivityType::Tennis);

        assert!(serde_json::from_value::<ActivityType>(json!("Rowing")).is_err());
    }

    #[test]
    fn test_training_request_keeps_raw_timestamps() {
        let request: TrainingRequest = serde_json::from_value(json!({
            "id": 99,
            "userId": 1,
            "startTime": "05/01/2024",
            "endTime": "2024-01-01T09:00:00.000+00:00",
            "activityType": "RUNNING",
            "distance": 10.0,
            "averageSpeed": 10.0
        }))
        .unwrap();

        assert_eq!(request.user_id, 1);
        assert_eq!(request.start_time, "05/01/2024");
        assert_eq!(request.end_time, "2024-01-01T09:00:00.000+00:00");
        assert_eq!(request.activity_type, ActivityType::Running);
    }
}
