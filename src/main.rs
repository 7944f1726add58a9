mod config;
mod core;
mod proc;
mod term;

use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::core::switcher::ModeSwitcher;
use crate::core::Action;
use crate::proc::SystemRunner;
use crate::term::confirm::StdinConfirm;

#[derive(Parser, Debug)]
#[command(name = "fnswitch", version, about = "Fn-key mode switcher for Apple keyboards")]
struct Args {
    /// What to do; omitting it toggles between the two modes
    #[arg(value_enum)]
    action: Option<Action>,

    /// Override the module options file path
    #[arg(long)]
    conf: Option<PathBuf>,

    /// Rebuild the initramfs without asking
    #[arg(long, short = 'y')]
    yes: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Bad arguments must exit 1 with usage on stderr; clap's default is 2.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return Ok(());
        }
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut config = config::settings::load_config();

    // Apply CLI overrides
    if let Some(conf) = args.conf {
        config.conf_path = conf;
    }
    if args.yes {
        config.assume_yes = true;
    }

    let action = args.action.unwrap_or(Action::Auto);
    let mut switcher = ModeSwitcher::new(&config, SystemRunner);

    match action {
        Action::Query => {
            if !switcher.print_mode() {
                eprintln!("Error: no mode can be found");
                std::process::exit(1);
            }
        }
        _ => {
            check_root();
            let mut confirm = StdinConfirm;
            switcher.switch(action, &mut confirm).await?;
        }
    }

    Ok(())
}

/// Mutating actions touch /etc and the module table; bail out early without root.
fn check_root() {
    if unsafe { libc::geteuid() } != 0 {
        eprintln!("This operation requires root privileges");
        std::process::exit(1);
    }
}
