pub mod cli;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "ccp")]
#[command(about = "A local credential manager")]
pub struct Cli {
    /// Show debugging information
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<RootCommand>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum RootCommand {
    /// A profiling system for SSH systems
    #[command(long_about = "A profiling system for SSH systems")]
    Ssh(SshArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SshArgs {
    #[command(subcommand)]
    pub command: Option<SshCommand>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum SshCommand {
    /// A profiling system for the SSH config file
    #[command(long_about = "A profiling system for the SSH config file")]
    Config(ConfigArgs),

    /// Manage SSH keys
    Key(KeyArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigCommand {
    /// Print the path of the profiles file
    Path,

    /// Print the loaded profiles document
    Show,

    /// Print the value of a dotted key, e.g. `work.host`
    Get { key: String },

    /// Print a line for every change to the profiles file until interrupted
    Watch,
}

/// Registered so that `ccp ssh key` exists; it has no subcommands yet.
#[derive(Debug, Clone, Args)]
pub struct KeyArgs {}
