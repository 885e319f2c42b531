//! Vigil Core
//!
//! Core types for the Vigil test-report poller.
//!
//! This crate contains:
//! - Domain types: the poll state machine's state and the report record
//! - DTOs: the JSON bodies exchanged with the report service

pub mod domain;
pub mod dto;

/// Identifier sent as `requestingCi` so the service knows which integration is asking
pub const INTEGRATION_TOOL_KEY: &str = "jenkins";

/// Advisory server-side timeout, in seconds, sent with every poll
pub const DEFAULT_REPORT_TIMEOUT: &str = "120";
