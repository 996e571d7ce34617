use std::path::Path;
use std::process::Command;

use cause::Cause;

use super::common::ErrorType::{
    GitAddCommand, GitAddCommandExitStatus, GitCommitCommand, GitCommitCommandExitStatus,
};
use super::common::{ErrorType, command::run_checked};

/// Exact message recorded for an import: `import <name> version <revision>`.
pub fn commit_message(name: &str, revision: &str) -> String {
    format!("import {name} version {revision}")
}

/// `git add -- <path>` inside `root`.
pub fn stage(root: &Path, path: &str) -> Result<(), Cause<ErrorType>> {
    println!("  - add: {path}");

    let mut command = Command::new("git");
    command.arg("-C").arg(root).args(["add", "--", path]);
    run_checked(command, GitAddCommand, GitAddCommandExitStatus)
}

/// `git commit -m <message>` inside `root`. Fails when nothing is staged.
pub fn commit(root: &Path, message: &str) -> Result<(), Cause<ErrorType>> {
    println!("  - commit: {message}");

    let mut command = Command::new("git");
    command.arg("-C").arg(root).args(["commit", "-m", message]);
    run_checked(command, GitCommitCommand, GitCommitCommandExitStatus)
}
