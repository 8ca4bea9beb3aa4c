//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// bine - Project-scoped binary version manager
#[derive(Parser, Debug)]
#[command(name = "bine")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base cache directory
    #[arg(long, env = "BINE_CACHE_DIR", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// GitHub API token used for release listings
    #[arg(long, env = "BINE_GITHUB_API_TOKEN", global = true, hide_env_values = true)]
    pub github_api_token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            cache_dir: self.cache_dir.clone(),
            github_token: self.github_api_token.clone().filter(|t| !t.is_empty()),
        }
    }
}

/// Flags shared by every command that opens the project
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub cache_dir: Option<PathBuf>,
    pub github_token: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a binary if needed and print its path
    Get(GetArgs),

    /// Install a binary if needed and run it
    Run(RunArgs),

    /// Install every binary in the manifest
    Sync,

    /// List the binaries in the manifest
    List(ListArgs),

    /// Move outdated binaries to their latest versions
    Upgrade(UpgradeArgs),

    /// Print the directory holding installed binaries
    Path,

    /// Print a shell snippet that adds the bin directory to PATH
    Env(EnvArgs),

    /// Read project configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Binary name as declared in the manifest
    pub name: String,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Binary name as declared in the manifest
    pub name: String,

    /// Arguments passed to the binary
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show installed binaries
    #[arg(long)]
    pub installed: bool,

    /// Only show binaries with a newer upstream release
    #[arg(long)]
    pub outdated: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// Report the changes without touching the manifest
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct EnvArgs {
    /// Shell syntax to emit; inferred from $SHELL when omitted
    #[arg(short, long, value_enum)]
    pub shell: Option<Shell>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Bash,
    Zsh,
    Sh,
    Fish,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print a configuration value
    Get(ConfigGetArgs),
}

#[derive(Args, Debug)]
pub struct ConfigGetArgs {
    pub key: ConfigKey,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// Project name from the manifest
    Project,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
