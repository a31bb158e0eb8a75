use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use setup_py_upgrade::config::{Config, SETUP_CFG, SETUP_PY};
use setup_py_upgrade::upgrade;

/// Move `setup()` keyword arguments from setup.py into setup.cfg
#[derive(Parser, Debug)]
#[command(name = "setup-py-upgrade", version, about, long_about = None)]
struct Cli {
    /// Project directory containing setup.py
    directory: PathBuf,

    /// Name of the build script inside the directory
    #[arg(long, default_value = SETUP_PY)]
    setup_py: String,

    /// Name of the configuration document inside the directory
    #[arg(long, default_value = SETUP_CFG)]
    setup_cfg: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    debug!("Arguments: {cli:?}");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Not routed through `log`; RUST_LOG may filter everything
            #[allow(clippy::print_stderr)]
            {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config {
        directory: cli.directory,
        setup_py: cli.setup_py,
        setup_cfg: cli.setup_cfg,
    };
    let report = upgrade(&config)
        .with_context(|| format!("failed to upgrade {}", config.directory.display()))?;

    #[allow(clippy::print_stdout)]
    {
        println!(
            "{} and {} written!",
            report.setup_py.display(),
            report.setup_cfg.display()
        );
    }
    Ok(())
}

/// `RUST_LOG` wins when set; otherwise `-v` raises the default `warn` level
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
