//! Operations behind the CLI commands.
//!
//! Each operation loads the trees it needs, does its work, and returns a
//! value from `patchdrift_core`; rendering is left to the caller.

pub mod compare;
pub mod list;
pub mod resolve;
