//! Core domain types
//!
//! These types describe one build's report as the poller sees it. They are
//! shared between the poller (which mutates them) and the CLI (which renders them).

pub mod build;
pub mod report;
pub mod state;
