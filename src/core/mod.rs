//! Bootstrap logic: the pipeline and the steps it drives.

pub mod apt;
pub mod bootstrap;
pub mod config;
pub mod docker;
pub mod install_dir;
pub mod installer;
pub mod os_release;
pub mod run_lock;
