// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The control-plane protocol: stream names, entry shapes, and command verbs
//! that tie the Booter and Supervisor Coordinator together. Every inter-component
//! message is a flat field map appended to a named stream — there is no direct
//! RPC between the two.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod booter_command;
mod fields;
mod status_event;
mod streams;
mod supervisor_command;

pub use booter_command::BooterCommand;
pub use fields::StreamFields;
pub use status_event::{BooterStatusEvent, GraphStatusEvent, SupervisorStatusEvent};
pub use streams::{node_parameters_stream, node_state_stream, Stream};
pub use supervisor_command::{GraphSource, SupervisorCommand};
