// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Spawns and tears down node child processes on behalf of a Booter.
//! Every child is owned by exactly one supervisor instance; nothing outside
//! this crate holds a pid.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod argv;
mod handle;
mod supervisor;

pub use argv::{build_argv, LaunchSpec};
pub use handle::NodeHandle;
pub use supervisor::{ProcessSupervisor, StopReport};
