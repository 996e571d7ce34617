use std::path::Path;
use std::process::Command;

use cause::{Cause, cause};
use git2::Repository;
use log::debug;
use tempfile::TempDir;

use super::common::ErrorType::{
    GitCloneCommand, GitCloneCommandExitStatus, HeadRevisionLookup, TempDirCreation,
};
use super::common::{ErrorType, command::run_checked};

const TEMPDIR_PREFIX: &str = "openxt-import-";

/// Clone `url` into a fresh temporary directory under `parent`.
///
/// The returned [`TempDir`] owns the clone; dropping it removes the directory.
pub fn clone_to_tempdir(url: &str, parent: &Path) -> Result<TempDir, Cause<ErrorType>> {
    let tempdir = tempfile::Builder::new()
        .prefix(TEMPDIR_PREFIX)
        .tempdir_in(parent)
        .map_err(|e| cause!(TempDirCreation).src(e))?;
    debug!("working directory: {}", tempdir.path().display());

    println!("  - clone: {url}");

    let mut command = Command::new("git");
    command.arg("clone").arg(url).arg(tempdir.path());
    run_checked(command, GitCloneCommand, GitCloneCommandExitStatus)?;

    Ok(tempdir)
}

/// Full hex id of the commit checked out at `path`.
pub fn head_revision(path: &Path) -> Result<String, Cause<ErrorType>> {
    let repo = Repository::open(path).map_err(|e| cause!(HeadRevisionLookup).src(e))?;

    let head = repo.head().map_err(|e| cause!(HeadRevisionLookup).src(e))?;

    let oid = head
        .target()
        .ok_or_else(|| cause!(HeadRevisionLookup, "HEAD is not a commit"))?;

    Ok(oid.to_string().trim().to_string())
}
