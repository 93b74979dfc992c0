// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conversions between entities and their wire representations.

pub mod training;
pub mod user;

pub use training::TrainingMapper;
