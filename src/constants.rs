//! Centralized constants for paths, URLs, package sets, and permissions.

/// Default location of the optional TOML override file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/yams-bootstrap/config.toml";

/// Env var naming an alternative config file.
pub const CONFIG_ENV: &str = "YAMS_BOOTSTRAP_CONFIG";

/// Ubuntu release the bootstrap is written for.
pub const EXPECTED_RELEASE: &str = "22.04";

/// Source of the OS release string.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Packages installed unconditionally before Docker.
pub const DEPENDENCY_PACKAGES: &[&str] = &[
    "apt-transport-https",
    "ca-certificates",
    "curl",
    "gnupg",
    "lsb-release",
];

/// Packages installed from the Docker repository.
pub const DOCKER_PACKAGES: &[&str] = &[
    "docker-ce",
    "docker-ce-cli",
    "containerd.io",
    "docker-buildx-plugin",
    "docker-compose-plugin",
];

/// Docker's armored release signing key.
pub const DOCKER_GPG_URL: &str = "https://download.docker.com/linux/ubuntu/gpg";

/// Docker apt repository base URL.
pub const DOCKER_REPO_URL: &str = "https://download.docker.com/linux/ubuntu";

/// Directory holding dearmored apt signing keys.
pub const KEYRING_DIR: &str = "/etc/apt/keyrings";

/// File name of the dearmored Docker key inside the keyring directory.
pub const DOCKER_KEYRING_NAME: &str = "docker.gpg";

/// Apt source definition for the Docker repository.
pub const DOCKER_SOURCES_LIST: &str = "/etc/apt/sources.list.d/docker.list";

/// Group granting access to the Docker daemon socket.
pub const DOCKER_GROUP: &str = "docker";

/// Systemd unit of the Docker daemon.
pub const DOCKER_SERVICE: &str = "docker";

/// Remote YAMS installer script.
pub const INSTALLER_URL: &str = "https://gitlab.com/rogs/yams/-/raw/master/install.sh";

/// Where the installer script is downloaded to.
pub const INSTALLER_PATH: &str = "/tmp/yams-install.sh";

/// Install directory below the invoking user's home.
pub const INSTALL_SUBDIR: &str = "yams";

/// Install directory when run as true root.
pub const SYSTEM_INSTALL_DIR: &str = "/opt/yams";

/// Run lock preventing concurrent bootstraps.
pub const LOCK_PATH: &str = "/run/yams-bootstrap.lock";

/// Tag used when forwarding to journald.
pub const JOURNALD_TAG: &str = "yams-bootstrap";

/// Permission mode for the keyring directory.
pub const KEYRING_DIR_MODE: u32 = 0o755;

/// Permission mode for the dearmored key and the sources list.
pub const APT_FILE_MODE: u32 = 0o644;

/// Permission mode for the downloaded installer.
pub const INSTALLER_MODE: u32 = 0o755;

/// HTTP timeout for key and installer downloads, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 120;
