// SPDX-FileCopyrightText: 2026 Taller Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Taller integration tests.
//!
//! Provides mock adapters and fixtures for fast, deterministic tests
//! without external services.
//!
//! # Components
//!
//! - [`MockGateway`] - Notification gateway that captures sends and can be told to fail
//! - [`FailingStore`] - Appointment store whose every operation errors

pub mod failing_store;
pub mod fixtures;
pub mod mock_gateway;

pub use failing_store::FailingStore;
pub use mock_gateway::{MockGateway, SentNotification};
