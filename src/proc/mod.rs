use std::io;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Handle on a started external process.
pub trait Job {
    /// Returns the exit code once the process has finished, `None` while it
    /// is still running. A process killed by a signal reports -1.
    fn poll_exit(&mut self) -> io::Result<Option<i32>>;
}

/// Seam for everything this tool does to the outside system: presence
/// probes and process launches. Tests substitute a recording fake.
pub trait Runner {
    /// Whether the given path exists as a regular file.
    fn probe(&self, path: &Path) -> bool;

    /// Spawn a process and let go of it: no waiting, no status check.
    fn launch(&mut self, program: &str, args: &[&str]) -> io::Result<()>;

    /// Spawn a process with captured stdout and keep a handle for polling.
    fn start(&mut self, program: &str, args: &[&str]) -> io::Result<Box<dyn Job>>;
}

pub struct SystemRunner;

struct SystemJob {
    child: tokio::process::Child,
}

impl Job for SystemJob {
    fn poll_exit(&mut self) -> io::Result<Option<i32>> {
        Ok(self
            .child
            .try_wait()?
            .map(|status| status.code().unwrap_or(-1)))
    }
}

impl Runner for SystemRunner {
    fn probe(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn launch(&mut self, program: &str, args: &[&str]) -> io::Result<()> {
        debug!(program, ?args, "launching");
        // The dropped Child is not killed; the process keeps running on its own.
        Command::new(program).args(args).spawn()?;
        Ok(())
    }

    fn start(&mut self, program: &str, args: &[&str]) -> io::Result<Box<dyn Job>> {
        debug!(program, ?args, "starting");
        let child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .spawn()?;
        Ok(Box::new(SystemJob { child }))
    }
}
