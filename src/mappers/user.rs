// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User entity <-> DTO mapping.

use crate::models::{User, UserDto, UserSimpleDto};

pub fn to_dto(user: &User) -> UserDto {
    UserDto {
        id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        birthdate: user.birthdate,
        email: user.email.clone(),
    }
}

pub fn to_simple_dto(user: &User) -> UserSimpleDto {
    UserSimpleDto {
        id: user.id,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
    }
}

/// Build a transient user from a DTO. The DTO's id is not carried over.
pub fn to_entity(dto: UserDto) -> User {
    User::new(dto.first_name, dto.last_name, dto.birthdate, dto.email)
}
