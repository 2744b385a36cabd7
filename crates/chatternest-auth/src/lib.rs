// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email/password authentication for the ChatterNest chat client.
//!
//! Provides [`AuthService`]: account registration and sign-in over the
//! shared database, plus the sign-in state stream that drives message feed
//! subscription lifecycle (subscribe on sign-in, unsubscribe on sign-out or
//! user switch).

pub mod service;

pub use service::AuthService;
