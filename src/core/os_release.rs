//! `/etc/os-release` parsing and release comparison.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    pub id: Option<String>,
    pub version_id: Option<String>,
    pub version_codename: Option<String>,
    pub pretty_name: Option<String>,
}

impl OsRelease {
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    pub fn parse(content: &str) -> Self {
        let mut fields: HashMap<&str, String> = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            fields.insert(key.trim(), unquote(value.trim()));
        }
        Self {
            id: fields.remove("ID"),
            version_id: fields.remove("VERSION_ID"),
            version_codename: fields
                .remove("VERSION_CODENAME")
                .or_else(|| fields.remove("UBUNTU_CODENAME")),
            pretty_name: fields.remove("PRETTY_NAME"),
        }
    }

    pub fn matches_release(&self, expected: &str) -> bool {
        self.version_id.as_deref() == Some(expected)
    }

    /// Human label for warnings, e.g. `Ubuntu 24.04 LTS` or `24.04`.
    pub fn describe(&self) -> String {
        self.pretty_name
            .clone()
            .or_else(|| self.version_id.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

fn unquote(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && (bytes[0] == b'"' || bytes[0] == b'\'')
        && bytes[bytes.len() - 1] == bytes[0]
    {
        return value[1..value.len() - 1].replace("\\\"", "\"");
    }
    value.to_string()
}
