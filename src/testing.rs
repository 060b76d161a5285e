//! Test doubles for the process, network, and prompt seams.

use crate::error::BootstrapError;
use crate::util::exec::{Invocation, Runner};
use crate::util::fetch::Fetch;
use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Records every invocation (rendered with `Display`) and answers from a
/// script. Patterns match by substring of the rendered command.
#[derive(Default)]
pub struct FakeRunner {
    calls: RefCell<Vec<String>>,
    piped: RefCell<Vec<Vec<u8>>>,
    outputs: Vec<(String, String)>,
    failures: Vec<(String, i32)>,
    pipe_output: Vec<u8>,
    on_path: HashSet<String>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, pattern: &str, stdout: &str) -> Self {
        self.outputs.push((pattern.to_string(), stdout.to_string()));
        self
    }

    pub fn with_pipe_output(mut self, stdout: &[u8]) -> Self {
        self.pipe_output = stdout.to_vec();
        self
    }

    pub fn failing(mut self, pattern: &str, code: i32) -> Self {
        self.failures.push((pattern.to_string(), code));
        self
    }

    pub fn on_path(mut self, program: &str) -> Self {
        self.on_path.insert(program.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn piped_inputs(&self) -> Vec<Vec<u8>> {
        self.piped.borrow().clone()
    }

    fn record(&self, inv: &Invocation) -> Result<String> {
        let rendered = inv.to_string();
        self.calls.borrow_mut().push(rendered.clone());
        if let Some((_, code)) = self.failures.iter().find(|(p, _)| rendered.contains(p.as_str())) {
            return Err(BootstrapError::CommandFailed {
                command: rendered,
                code: Some(*code),
            }
            .into());
        }
        Ok(rendered)
    }
}

impl Runner for FakeRunner {
    fn run(&self, inv: &Invocation) -> Result<()> {
        self.record(inv).map(|_| ())
    }

    fn succeeds(&self, inv: &Invocation) -> bool {
        self.record(inv).is_ok()
    }

    fn capture(&self, inv: &Invocation) -> Result<String> {
        let rendered = self.record(inv)?;
        Ok(self
            .outputs
            .iter()
            .find(|(p, _)| rendered.contains(p.as_str()))
            .map(|(_, out)| out.clone())
            .unwrap_or_default())
    }

    fn pipe(&self, inv: &Invocation, input: &[u8]) -> Result<Vec<u8>> {
        self.record(inv)?;
        self.piped.borrow_mut().push(input.to_vec());
        Ok(self.pipe_output.clone())
    }

    fn resolves(&self, program: &str) -> bool {
        self.on_path.contains(program)
    }
}

#[derive(Default)]
pub struct FakeFetcher {
    bodies: HashMap<String, Vec<u8>>,
    fetched: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), body.to_vec());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl Fetch for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.fetched.borrow_mut().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("GET {}: 404 Not Found", url))
    }
}
