//! apt-get and dpkg invocations.
//!
//! All apt-get calls run with `DEBIAN_FRONTEND=noninteractive` so package
//! maintainer scripts never stop on a debconf question.

use crate::util::exec::Invocation;

fn apt_get() -> Invocation {
    Invocation::new("apt-get").env("DEBIAN_FRONTEND", "noninteractive")
}

pub fn update() -> Invocation {
    apt_get().arg("update")
}

pub fn upgrade() -> Invocation {
    apt_get().args(["upgrade", "-y"])
}

pub fn install<S: AsRef<str>>(packages: &[S]) -> Invocation {
    apt_get()
        .args(["install", "-y"])
        .args(packages.iter().map(|p| p.as_ref().to_string()))
}

pub fn print_architecture() -> Invocation {
    Invocation::new("dpkg").arg("--print-architecture")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_and_upgrade() {
        assert_eq!(update().to_string(), "DEBIAN_FRONTEND=noninteractive apt-get update");
        assert_eq!(
            upgrade().to_string(),
            "DEBIAN_FRONTEND=noninteractive apt-get upgrade -y"
        );
    }

    #[test]
    fn test_install_lists_packages_in_order() {
        let inv = install(&["curl", "gnupg"]);
        assert_eq!(inv.program, "apt-get");
        assert_eq!(inv.args, vec!["install", "-y", "curl", "gnupg"]);
    }

    #[test]
    fn test_print_architecture() {
        assert_eq!(print_architecture().to_string(), "dpkg --print-architecture");
    }
}
