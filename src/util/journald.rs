//! Optional journald forwarding via systemd-cat.
//!
//! Best-effort: failure to forward must not break the bootstrap.

use serde::Serialize;
use std::io::Write;
use std::process::{Command, Stdio};

pub fn systemd_cat_available() -> bool {
    Command::new("systemd-cat")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Forward a single log line to journald using `systemd-cat`.
pub fn forward_line(tag: &str, line: &str) {
    let mut child = match Command::new("systemd-cat")
        .arg("-t")
        .arg(tag)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(c) => c,
        Err(_) => return,
    };

    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(line.as_bytes());
        let _ = stdin.write_all(b"\n");
    }

    let _ = child.wait();
}

#[derive(Debug, Serialize)]
struct StepEvent<'a> {
    step: &'a str,
    outcome: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<&'a str>,
}

/// Step outcome sink. Disabled unless configured and `systemd-cat` exists.
#[derive(Debug, Clone)]
pub struct Journal {
    tag: String,
    enabled: bool,
}

impl Journal {
    pub fn new(tag: &str, requested: bool) -> Self {
        Self {
            tag: tag.to_string(),
            enabled: requested && systemd_cat_available(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            tag: String::new(),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn step(&self, step: &str, outcome: &str, detail: Option<&str>) {
        if !self.enabled {
            return;
        }
        forward_line(&self.tag, &event_line(step, outcome, detail));
    }
}

fn event_line(step: &str, outcome: &str, detail: Option<&str>) -> String {
    let event = StepEvent {
        step,
        outcome,
        detail,
    };
    serde_json::to_string(&event).unwrap_or_default()
}
