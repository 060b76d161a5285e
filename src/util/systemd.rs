use crate::util::exec::{Invocation, Runner};
use anyhow::{Context, Result};

pub fn start(unit: &str) -> Invocation {
    Invocation::new("systemctl").args(["start", unit])
}

pub fn enable(unit: &str) -> Invocation {
    Invocation::new("systemctl").args(["enable", unit])
}

pub fn is_active(unit: &str) -> Invocation {
    Invocation::new("systemctl").args(["is-active", "--quiet", unit])
}

pub fn is_enabled(unit: &str) -> Invocation {
    Invocation::new("systemctl").args(["is-enabled", "--quiet", unit])
}

/// Start `unit` now and enable it at boot.
pub fn start_and_enable(runner: &dyn Runner, unit: &str) -> Result<()> {
    runner
        .run(&start(unit))
        .with_context(|| format!("start {}", unit))?;
    runner
        .run(&enable(unit))
        .with_context(|| format!("enable {}", unit))
}
