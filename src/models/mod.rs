// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.
//!
//! Entities (`User`, `Training`) are what services and storage work with.
//! The `*Dto`/`*Request` types are the JSON shapes exchanged over HTTP.

pub mod training;
pub mod user;

pub use training::{ActivityType, Training, TrainingDto, TrainingPatch, TrainingRequest};
pub use user::{User, UserDto, UserSimpleDto};
