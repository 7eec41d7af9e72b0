use crate::config::Cli;
use clap::CommandFactory;

pub const BIN_NAME: &str = "ccp";

/// Rendered help for the command group at `path` below the root, e.g.
/// `&["ssh", "config"]`. An empty path is the root itself.
pub fn help_text(path: &[&str]) -> String {
    let mut root = Cli::command().bin_name(BIN_NAME);
    // Propagates bin names so nested usage lines read `ccp ssh config`.
    root.build();

    let mut cmd = root;
    for name in path {
        cmd = match cmd.find_subcommand(*name) {
            Some(sub) => sub.clone(),
            None => break,
        };
    }
    cmd.render_help().to_string()
}
