//! System utilities: process execution, filesystem, prompts, output.

pub mod exec;
pub mod fetch;
pub mod fs;
pub mod journald;
pub mod path;
pub mod privilege;
pub mod prompt;
pub mod systemd;
pub mod term;
