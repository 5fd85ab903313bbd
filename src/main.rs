use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, error};
use remix_dl::cli::Cli;
use remix_dl::download::github;
use remix_dl::repos::{self, BuildType};
use remix_dl::{orchestration, progress, wizard};

fn main() {
    let cli = Cli::parse();
    let interactive = !cli.no_interaction;

    env_logger::Builder::from_default_env()
        .filter_level(if cli.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .init();

    if let Err(e) = run(cli) {
        error!("{e:#}");
        if interactive {
            let _ = wizard::pause("\nPress Enter to exit...");
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let interactive = !cli.no_interaction;

    if interactive {
        wizard::show_welcome();
    }

    let build_type = match cli.build_type {
        Some(bt) => bt,
        None if interactive => wizard::select_build_type()?,
        None => BuildType::Release,
    };

    if interactive {
        wizard::pause("Press Enter to start the download...")?;
    }

    let runtime = tokio::runtime::Runtime::new().context("creating async runtime")?;
    let report = runtime.block_on(async {
        let (reporter, renderer) = progress::spawn_renderer(repos::total_steps())?;
        let gh = github::Client::new()?;

        let result = orchestration::run(&gh, build_type, &output_root()?, &reporter).await;

        // Closing the channel lets the renderer drain and finish its bars.
        drop(reporter);
        renderer.await.context("progress renderer task")?;
        result
    })?;

    if interactive {
        wizard::show_completion(&report);
        wizard::confirm_open_output(&report.output_dir)?;
        wizard::pause("Press Enter to exit...")?;
    }
    Ok(())
}

/// Directory the output tree is created under: next to the executable,
/// falling back to the working directory.
fn output_root() -> Result<PathBuf> {
    if let Ok(exe) = std::env::current_exe()
        && let Some(parent) = exe.parent()
    {
        return Ok(parent.to_path_buf());
    }
    std::env::current_dir().context("resolving the working directory")
}
