// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Middleware modules.

pub mod auth;

pub use auth::{require_auth, AuthUser};
