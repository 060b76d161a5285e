//! Ubuntu host bootstrap for YAMS.
//!
//! Updates the system, installs Docker from the vendor repository, checks
//! Docker Compose, grants the sudo user Docker access, and hands off to the
//! YAMS installer.
//!
//! ## Modules
//! - `cli` — Command-line handlers
//! - `core` — The bootstrap pipeline and its steps (apt, docker, installer)
//! - `models` — Configuration model
//! - `util` — System utilities (exec, fetch, fs, prompt, term, systemd)

pub mod cli;
pub mod constants;
pub mod core;
pub mod error;
pub mod models;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;
