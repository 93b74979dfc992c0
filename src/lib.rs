// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Fitness Tracker: users and their training sessions
//!
//! This crate provides the backend API for recording trainings, looking them
//! up by user, activity type and end time, and managing user profiles.

pub mod config;
pub mod db;
pub mod error;
pub mod mappers;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Storage;
use mappers::TrainingMapper;
use services::{TrainingService, UserService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub users: UserService,
    pub trainings: TrainingService,
    pub training_mapper: TrainingMapper,
}

impl AppState {
    /// Wire services and mappers on top of `storage`.
    pub fn new(config: Config, storage: Storage) -> Self {
        let users = UserService::new(storage.users);
        let trainings = TrainingService::new(storage.trainings);
        let training_mapper = TrainingMapper::new(users.clone());

        Self {
            config,
            users,
            trainings,
            training_mapper,
        }
    }
}
