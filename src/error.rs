//! Failures that map to a specific process exit code.
//!
//! Everything else travels as a plain `anyhow::Error` and exits with 1.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("this program must be run as root (try: sudo yams-bootstrap)")]
    NotRoot,

    #[error("Docker Compose is not available ('docker compose version' failed)")]
    ComposeUnavailable,

    #[error("command failed with {}: {command}", describe_code(.code))]
    CommandFailed { command: String, code: Option<i32> },
}

impl BootstrapError {
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapError::NotRoot | BootstrapError::ComposeUnavailable => 1,
            BootstrapError::CommandFailed { code, .. } => match code {
                Some(c) if *c != 0 => *c,
                _ => 1,
            },
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit status {}", c),
        None => "no exit status".to_string(),
    }
}

/// Exit code for any error bubbling out of a command handler.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<BootstrapError>())
        .map(BootstrapError::exit_code)
        .unwrap_or(1)
}
