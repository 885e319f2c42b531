//! Data Transfer Objects for the report service
//!
//! Wire shapes of the poll request and response. Field names follow the
//! service's camelCase JSON.

pub mod report;
