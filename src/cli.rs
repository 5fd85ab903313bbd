use clap::Parser;

use crate::repos::BuildType;

/// Command-line flags. Everything is optional; with no flags the tool runs
/// its interactive flow and prompts for the choices it needs.
#[derive(Parser, Debug)]
#[command(version, about = "Downloads and assembles the latest RTX Remix builds")]
pub struct Cli {
    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Build type to fetch from CI artifacts (prompted for when omitted)
    #[arg(long, value_enum)]
    pub build_type: Option<BuildType>,

    /// Skip all prompts and use defaults
    #[arg(long)]
    pub no_interaction: bool,
}
