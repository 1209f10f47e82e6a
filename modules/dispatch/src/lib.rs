//! Launch the client core against generated configs.

use std::path::Path;
use std::process::{Command, ExitStatus};
use tracing::{info, warn};

/// Ordinals to launch, in order. A nonzero config number runs first and ordinal 1
/// always runs after it, so the default (`1`) launches `1.json` twice.
pub fn launch_plan(config_number: u32) -> Vec<u32> {
    let mut plan = Vec::with_capacity(2);
    if config_number != 0 { plan.push(config_number); }
    plan.push(1);
    plan
}

/// `<binpath> run -c <configs>/<ordinal>.json`, passed to the shell as one string.
pub fn command_line(binpath: &str, configs_dir: &Path, ordinal: u32) -> String {
    format!("{} run -c {}/{}.json", binpath, configs_dir.display(), ordinal)
}

#[derive(Debug)]
pub struct Launch {
    pub ordinal: u32,
    pub command: String,
    /// `None` when the shell itself could not be started.
    pub status: Option<ExitStatus>,
}

/// Run every planned launch, blocking on each. Failures are logged, never returned.
pub fn dispatch(binpath: &str, configs_dir: &Path, config_number: u32) -> Vec<Launch> {
    launch_plan(config_number)
        .into_iter()
        .map(|ordinal| {
            let command = command_line(binpath, configs_dir, ordinal);
            info!(%command, "launching client");
            let status = match shell(&command).status() {
                Ok(s) => Some(s),
                Err(e) => {
                    warn!(%command, error = %e, "failed to start shell");
                    None
                }
            };
            if let Some(s) = status.filter(|s| !s.success()) {
                warn!(%command, status = %s, "client exited unsuccessfully");
            }
            Launch { ordinal, command, status }
        })
        .collect()
}

#[cfg(unix)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
