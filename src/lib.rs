#![forbid(unsafe_code)]
#![warn(clippy::missing_docs_in_private_items)]

//! The library half of the `ledremote` application: everything needed to talk to the led strip
//! firmware over its small http api, plus the interactive console that drives it.

/// The typed vocabulary of commands understood by the firmware.
pub mod command;

/// Deserializable runtime configuration.
pub mod config;

/// Console rendering, the interactive loop and the scenario/test runners.
pub mod console;

/// The http facing side of things; the `Device` trait and its `surf` backed implementation.
pub mod device;

/// The static effect catalog.
pub mod effects;

/// Parsing of a single line of operator input.
pub mod input;

/// Maps command line arguments onto a run mode.
pub mod invocation;

/// Abstraction over waiting between commands.
pub mod pacing;

/// Named command sequences.
pub mod scenarios;
