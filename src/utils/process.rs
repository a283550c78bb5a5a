// Helpers shared by every stage that launches a child process

use std::process::ExitStatus;
use tokio::process::Command;

/// Map a child's exit status onto the status a shell would report.
///
/// Processes killed by a signal have no code; shells report them as
/// `128 + signal`, and so do we.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Render a command line for logging
pub fn describe(command: &Command) -> String {
    let std_command = command.as_std();
    let mut parts = vec![std_command.get_program().to_string_lossy().to_string()];
    parts.extend(std_command.get_args().map(|arg| arg.to_string_lossy().to_string()));
    parts.join(" ")
}
