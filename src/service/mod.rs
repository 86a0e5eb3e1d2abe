//! PostgreSQL service management.
//!
//! Restarts the monitored server either through the system service manager
//! or through `pg_ctl` executed under the uid/gid of the data directory's
//! owner, and locates the `pg_ctl` binary when it is not on `PATH`.
//!
//! These operations shell out and block; they are used by the surrounding
//! setup flow, never by the snapshot encoder.

use std::fmt;
use std::os::unix::fs::MetadataExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

/// Error type for service management operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Spawning a command failed.
    Io(std::io::Error),
    /// The restart command ran but reported failure; carries the exit
    /// status and any captured stderr.
    RestartFailed(String),
    /// The data directory could not be inspected for its owner.
    DataDirOwnership(String),
    /// `pg_ctl` was found neither on PATH nor via `pg_config`.
    PgCtlNotFound,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Io(err) => write!(f, "service command failed: {}", err),
            ServiceError::RestartFailed(detail) => write!(f, "failed to restart: {}", detail),
            ServiceError::DataDirOwnership(detail) => {
                write!(f, "could not determine data directory ownership: {}", detail)
            }
            ServiceError::PgCtlNotFound => write!(f, "could not find pg_ctl"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Io(err)
    }
}

/// Restarts the monitored PostgreSQL server.
///
/// With a data directory, restarts through `pg_ctl` as the directory's
/// owner; without one, falls back to the system service manager.
pub fn restart_postgres(data_dir: Option<&Path>) -> Result<(), ServiceError> {
    match data_dir {
        Some(dir) => restart_via_pg_ctl(dir),
        None => restart_via_service_manager(),
    }
}

/// Restarts via `systemctl restart postgresql`.
pub fn restart_via_service_manager() -> Result<(), ServiceError> {
    info!("restarting postgresql via service manager");
    let output = Command::new("systemctl")
        .args(["restart", "postgresql"])
        .output()?;
    check_restart_output(&output)
}

/// Restarts via `pg_ctl restart`, executed under the uid/gid of the data
/// directory's owner so the server process keeps its file ownership.
pub fn restart_via_pg_ctl(data_dir: &Path) -> Result<(), ServiceError> {
    let metadata = std::fs::metadata(data_dir)
        .map_err(|err| ServiceError::DataDirOwnership(format!("{}: {}", data_dir.display(), err)))?;
    let uid = metadata.uid();
    let gid = metadata.gid();

    let pg_ctl = locate_pg_ctl()?;
    info!(pg_ctl = %pg_ctl.display(), uid, gid, "restarting postgresql via pg_ctl");

    let output = Command::new(&pg_ctl)
        .arg("--pgdata")
        .arg(data_dir)
        .args(["--wait", "--mode", "fast", "restart"])
        .uid(uid)
        .gid(gid)
        .output()?;
    check_restart_output(&output)
}

fn check_restart_output(output: &std::process::Output) -> Result<(), ServiceError> {
    if output.status.success() {
        return Ok(());
    }
    let mut detail = output.status.to_string();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        detail.push_str("; ");
        detail.push_str(stderr.trim());
    }
    Err(ServiceError::RestartFailed(detail))
}

/// Locates the `pg_ctl` binary: `PATH` when runnable there, otherwise the
/// `BINDIR` reported by `pg_config`.
pub fn locate_pg_ctl() -> Result<PathBuf, ServiceError> {
    let on_path = Command::new("pg_ctl")
        .arg("--help")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false);
    if on_path {
        return Ok(PathBuf::from("pg_ctl"));
    }

    let output = Command::new("pg_config")
        .output()
        .map_err(|_| ServiceError::PgCtlNotFound)?;
    if !output.status.success() {
        return Err(ServiceError::PgCtlNotFound);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_bindir(&stdout)
        .map(|bindir| bindir.join("pg_ctl"))
        .ok_or(ServiceError::PgCtlNotFound)
}

/// Extracts the `BINDIR = /path` line from `pg_config` output.
fn parse_bindir(pg_config_output: &str) -> Option<PathBuf> {
    for line in pg_config_output.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        if key.trim() == "BINDIR" {
            return Some(PathBuf::from(value.trim()));
        }
    }
    None
}
