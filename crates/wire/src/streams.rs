// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The fixed stream catalogue. All booters read the *same* `booter` stream;
//! each decides locally which nodes it owns. No targeted delivery.

/// A well-known stream name in the control-plane catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// operator → coordinator
    SupervisorIpstream,
    /// coordinator → operator
    SupervisorStatus,
    /// coordinator → observers
    GraphStatus,
    /// coordinator → nodes/observers
    SupergraphStream,
    /// coordinator → all booters
    Booter,
    /// each booter → coordinator
    BooterStatus,
}

crate::name_impl! {
    Stream {
        SupervisorIpstream => "supervisor_ipstream",
        SupervisorStatus => "supervisor_status",
        GraphStatus => "graph_status",
        SupergraphStream => "supergraph_stream",
        Booter => "booter",
        BooterStatus => "booter_status",
    }
}

/// `<nickname>_state`, written by the node itself.
pub fn node_state_stream(nickname: &str) -> String {
    format!("{nickname}_state")
}

/// `<nickname>_parameters`, the per-node parameter delta stream.
pub fn node_parameters_stream(nickname: &str) -> String {
    format!("{nickname}_parameters")
}

/// Generates `Stream::as_str()`/`Display` from a name table, mirroring
/// `brand_core::simple_display!` but returning `&'static str` directly (stream
/// names are used as map keys and connection arguments, not just printed).
#[macro_export]
macro_rules! name_impl {
    ($enum:ty { $( $variant:ident => $str:expr ),+ $(,)? }) => {
        impl $enum {
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $str, )+
                }
            }
        }

        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[cfg(test)]
#[path = "streams_tests.rs"]
mod tests;
