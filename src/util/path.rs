//! Lexical path checks, no filesystem access.

use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components lexically.
pub fn normalize(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                components.pop();
            }
            Component::CurDir => {}
            other => components.push(other),
        }
    }
    components.iter().collect()
}

/// Join a relative `sub` onto `base`, returning `None` if the result would
/// leave `base` or if `sub` is absolute or empty.
pub fn join_within(base: &Path, sub: &Path) -> Option<PathBuf> {
    if sub.is_absolute() || sub.as_os_str().is_empty() {
        return None;
    }
    let joined = normalize(&base.join(sub));
    let base = normalize(base);
    if joined == base || !joined.starts_with(&base) {
        return None;
    }
    Some(joined)
}
