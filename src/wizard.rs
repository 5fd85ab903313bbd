//! Interactive shell: banner, prompts, and the completion summary.

use crate::orchestration::RunReport;
use crate::repos::BuildType;
use anyhow::Result;
use inquire::{Confirm, Select};
use std::io::{BufRead, Write};
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

const BORDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Display the welcome banner.
pub fn show_welcome() {
    let mut stdout = StandardStream::stdout(ColorChoice::Always);

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
    let _ = writeln!(stdout, "\n{BORDER}");
    let _ = stdout.reset();

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
    let _ = writeln!(stdout, "\n                 R T X   R E M I X   D O W N L O A D E R");
    let _ = stdout.reset();

    let _ = writeln!(stdout, "\n          Fetches the latest RTX Remix runtime builds");

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
    let _ = writeln!(stdout, "\n{BORDER}\n");
    let _ = stdout.reset();

    let _ = writeln!(
        stdout,
        "This tool requests the latest builds from the official GitHub repositories,"
    );
    let _ = writeln!(
        stdout,
        "assembles them into a \"remix\" directory next to the executable, and cleans"
    );
    let _ = writeln!(stdout, "up after itself.");
    let _ = writeln!(stdout, "\nFind us on Discord: https://discord.gg/rtxremix\n");
}

/// Block until the user presses Enter.
pub fn pause(prompt: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(())
}

/// Ask which build type to download from the CI artifacts.
pub fn select_build_type() -> Result<BuildType> {
    Select::new(
        "Build type to download",
        vec![
            BuildType::Release,
            BuildType::Debug,
            BuildType::Debugoptimized,
        ],
    )
    .with_help_message("release is right unless you are debugging the runtime")
    .prompt()
    .map_err(|e| anyhow::anyhow!("Prompt cancelled: {e}"))
}

/// Offer to open the output directory in the system file browser.
pub fn confirm_open_output(path: &Path) -> Result<()> {
    let open = Confirm::new("Open the output directory?")
        .with_default(true)
        .prompt()
        .map_err(|e| anyhow::anyhow!("Prompt cancelled: {e}"))?;

    if open {
        opener::open(path).map_err(|e| anyhow::anyhow!("Failed to open {}: {e}", path.display()))?;
    }
    Ok(())
}

/// Display the completion summary for a finished run.
pub fn show_completion(report: &RunReport) {
    let mut stdout = StandardStream::stdout(ColorChoice::Always);

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
    let _ = writeln!(stdout, "\n{BORDER}");
    let _ = stdout.reset();

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = writeln!(stdout, "\n                        ✓ DOWNLOAD COMPLETE\n");
    let _ = stdout.reset();

    let _ = writeln!(stdout, "Output directory:");
    let _ = writeln!(stdout, "  {}", report.output_dir.display());

    if !report.build_names.is_empty() {
        let _ = writeln!(stdout, "\nDownloaded builds:");
        for name in &report.build_names {
            let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
            let _ = writeln!(stdout, "  ✓ {name}");
            let _ = stdout.reset();
        }
    }

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
    let _ = writeln!(stdout, "\n{BORDER}\n");
    let _ = stdout.reset();
}
