//! Vigil Poller
//!
//! Drives a build's test report from "not requested" to a final state.
//!
//! Architecture:
//! - Transition: the pure report state machine
//! - Poller: one network request per accessor call, applied through the state machine
//! - Sink: persistence of the standalone report document
//! - Action: thin adapter for hosts that display the report

pub mod action;
pub mod poller;
pub mod sink;
pub mod transition;

pub use action::ReportAction;
pub use poller::ReportPoller;
pub use sink::{ArtifactSink, FsArtifactSink, NullArtifactSink};
pub use transition::{PollOutcome, transition};
