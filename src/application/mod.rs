//! Application layer orchestrating callback verification.
//!
//! This module defines the `NotificationValidator`, the single entry point the
//! order-management layer calls for both server-to-server postbacks and
//! browser-redirect result pages.

pub mod validator;
