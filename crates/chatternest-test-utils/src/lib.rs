// SPDX-FileCopyrightText: 2026 ChatterNest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for ChatterNest integration tests.

pub mod harness;
pub mod mock_provider;

pub use harness::TestStore;
pub use mock_provider::{MockProvider, RecordedCall};
