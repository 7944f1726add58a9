use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::settings::AppConfig;
use crate::core::{Action, Mode};
use crate::proc::Runner;
use crate::term::confirm::Confirm;
use crate::term::spinner;

const MODULE: &str = "hid_apple";

const MEDIA_OPTIONS: &str = "options hid_apple iso_layout=0 swap_opt_cmd=1 fnmode=1";
const FUNC_OPTIONS: &str = "options hid_apple iso_layout=0 swap_opt_cmd=1 fnmode=2";

struct RegenTool {
    probe: &'static str,
    program: &'static str,
    args: &'static [&'static str],
}

/// Initramfs rebuild tools in probe order; the first one present wins.
const REGEN_TOOLS: &[RegenTool] = &[
    RegenTool {
        probe: "/bin/dracut",
        program: "dracut",
        args: &["-f", "--regenerate-all"],
    },
    RegenTool {
        probe: "/bin/mkinitcpio",
        program: "mkinitcpio",
        args: &["-P"],
    },
    RegenTool {
        probe: "/bin/update-initramfs",
        program: "update-initramfs",
        args: &["-u", "-k", "all"],
    },
];

#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("mode \"{0}\" cannot be applied")]
    Unapplyable(Mode),
    #[error("failed to write {}: {source}", .path.display())]
    WriteConfig { path: PathBuf, source: io::Error },
    #[error("failed to launch {command}: {source}")]
    Launch { command: String, source: io::Error },
    #[error("failed while waiting for {command}: {source}")]
    Wait { command: String, source: io::Error },
}

/// The mode state machine: reads the current mode from the module options
/// file, decides the target mode for an action, and transitions the system
/// into it (file rewrite, module reload, optional initramfs rebuild).
pub struct ModeSwitcher<R: Runner> {
    conf_path: PathBuf,
    reload_delay: Duration,
    assume_yes: bool,
    runner: R,
}

impl<R: Runner> ModeSwitcher<R> {
    pub fn new(config: &AppConfig, runner: R) -> Self {
        Self {
            conf_path: config.conf_path.clone(),
            reload_delay: Duration::from_millis(config.reload_delay_ms),
            assume_yes: config.assume_yes,
            runner,
        }
    }

    /// Reads the mode back from the options file. A missing or unreadable
    /// file is a reportable state, not an error: the tool may simply never
    /// have run on this machine.
    pub fn get_mode(&self) -> Mode {
        let config = match fs::read_to_string(&self.conf_path) {
            Ok(config) => config,
            Err(_) => return Mode::Unknown,
        };

        if config.contains("fnmode=1") {
            Mode::Media
        } else if config.contains("fnmode=2") {
            Mode::Func
        } else {
            Mode::Disabled
        }
    }

    /// Prints the current mode label to stdout. Returns false without
    /// printing anything when the mode cannot be determined.
    pub fn print_mode(&self) -> bool {
        let mode = self.get_mode();
        if mode == Mode::Unknown {
            return false;
        }

        println!("{}", mode);
        true
    }

    /// Decides which mode an action lands on. Explicit actions name their
    /// mode; everything else flips away from whatever is current.
    pub fn resolve_target(&self, action: Action) -> Mode {
        match action {
            Action::Media => Mode::Media,
            Action::Func => Mode::Func,
            _ => self.get_mode().toggle(),
        }
    }

    /// Overwrites the options file with the full line for `mode`. Whatever
    /// was in the file before is discarded.
    pub fn apply_mode(&self, mode: Mode) -> Result<(), SwitchError> {
        let options = match mode {
            Mode::Media => MEDIA_OPTIONS,
            Mode::Func => FUNC_OPTIONS,
            other => return Err(SwitchError::Unapplyable(other)),
        };

        debug!(path = %self.conf_path.display(), %mode, "writing module options");
        fs::write(&self.conf_path, options).map_err(|source| SwitchError::WriteConfig {
            path: self.conf_path.clone(),
            source,
        })
    }

    /// Cycles the kernel module so the new options take effect. Both
    /// launches are fire-and-forget; only a failure to spawn is fatal.
    pub async fn reload_module(&mut self) -> Result<(), SwitchError> {
        self.launch("rmmod", &[MODULE])?;
        // Let the unload settle before reinserting.
        tokio::time::sleep(self.reload_delay).await;
        self.launch("modprobe", &[MODULE])
    }

    /// Rebuilds the initramfs with whichever regeneration tool this distro
    /// ships, drawing a progress indicator while it runs. Returns whether a
    /// tool actually ran; none being found is reported but not fatal.
    pub async fn persist(&mut self) -> Result<bool, SwitchError> {
        let Some(tool) = REGEN_TOOLS
            .iter()
            .find(|tool| self.runner.probe(Path::new(tool.probe)))
        else {
            println!("Unsupported distro, please update initramfs manually");
            return Ok(false);
        };

        let mut job =
            self.runner
                .start(tool.program, tool.args)
                .map_err(|source| SwitchError::Launch {
                    command: tool.program.to_string(),
                    source,
                })?;

        println!("Updating the initramfs. Please wait for the operation to complete:");
        match spinner::spin_while(job.as_mut()).await {
            Ok(Some(code)) => {
                if code != 0 {
                    warn!(command = tool.program, code, "initramfs rebuild exited nonzero");
                }
                println!("Done");
            }
            // stdout went away; stop drawing and leave the tool to finish on its own
            Ok(None) => {}
            Err(source) => {
                return Err(SwitchError::Wait {
                    command: tool.program.to_string(),
                    source,
                })
            }
        }

        Ok(true)
    }

    /// The mutate path: pick the target mode, rewrite the options file,
    /// cycle the module, then offer to make the change survive a reboot.
    pub async fn switch(
        &mut self,
        action: Action,
        confirm: &mut impl Confirm,
    ) -> Result<(), SwitchError> {
        let target = self.resolve_target(action);
        println!("Info: selecting the {} mode", target);

        self.apply_mode(target)?;
        self.reload_module().await?;

        let question = format!(
            "Rebuild initramfs to make {} mode permanent? (yes/no): ",
            target
        );
        if self.assume_yes || confirm.confirm(&question) {
            if self.persist().await? {
                println!(
                    "You might need to run sbupdate or similar tool to refresh your unified kernel image"
                );
            }
        } else {
            println!("This mode is valid only until the next boot");
        }

        Ok(())
    }

    fn launch(&mut self, program: &str, args: &[&str]) -> Result<(), SwitchError> {
        self.runner
            .launch(program, args)
            .map_err(|source| SwitchError::Launch {
                command: program.to_string(),
                source,
            })
    }
}
