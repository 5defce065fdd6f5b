use std::process::ExitStatus;

use tokio::process::Command;

use kinst_model::ExitCode;

pub fn cmd_program(program: &str, args: &[String]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(|s| s.as_str()));
    cmd
}

/// Exit code of a finished child; a signal `n` maps to `128 + n` like a shell would report it.
#[cfg(target_family = "unix")]
pub fn exit_code(status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;

    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => kinst_model::EXIT_LOST,
    }
}

#[cfg(not(target_family = "unix"))]
pub fn exit_code(status: ExitStatus) -> ExitCode {
    status.code().unwrap_or(kinst_model::EXIT_LOST)
}
