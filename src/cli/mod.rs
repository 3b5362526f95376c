//! Command implementations
//!
//! One function per binary subcommand. The binary in `main.rs` parses
//! arguments and owns the runtime; everything that actually talks to the
//! ledger lives here so it can be driven by tests.

mod commands;

pub use commands::{cmd_control, cmd_deploy, CliError, DeployParams};
