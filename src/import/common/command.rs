use std::process::{Command, ExitStatus};

use cause::{Cause, cause};
use log::debug;

use super::ErrorType;

/// Run an external tool with inherited stdio so its own output reaches the user.
///
/// `spawn_err` is reported when the tool cannot be started at all, `status_err`
/// when it exits unsuccessfully.
pub fn run_checked(
    mut command: Command,
    spawn_err: ErrorType,
    status_err: ErrorType,
) -> Result<(), Cause<ErrorType>> {
    let line = describe(&command);
    debug!("running: {line}");

    let status = command
        .status()
        .map_err(|e| cause!(spawn_err).src(e).msg(format!("failed to run `{line}`")))?;

    handle_status(status, &line, status_err)
}

fn handle_status(
    status: ExitStatus,
    line: &str,
    status_err: ErrorType,
) -> Result<(), Cause<ErrorType>> {
    if status.success() {
        return Ok(());
    }
    Err(cause!(status_err).msg(format!("`{line}` exited with {status}")))
}

fn describe(command: &Command) -> String {
    let mut line = command.get_program().to_string_lossy().into_owned();
    for arg in command.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}
