//! Command dispatch. Every command group prints its own help when invoked
//! without a subcommand; that is a successful run, not an error.

use crate::app::AppContext;
use crate::config::cli::help_text;
use crate::config::{Cli, ConfigCommand, RootCommand, SshCommand};
use anyhow::{Context, Result};
use serde_yaml::Value;
use std::io::Write;
use tokio::sync::broadcast::error::RecvError;

pub async fn run(cli: &Cli, ctx: &AppContext, out: &mut (dyn Write + Send)) -> Result<()> {
    let Some(RootCommand::Ssh(ssh)) = &cli.command else {
        return print_help(out, &[]);
    };

    match &ssh.command {
        None => print_help(out, &["ssh"]),
        Some(SshCommand::Key(_)) => print_help(out, &["ssh", "key"]),
        Some(SshCommand::Config(config)) => match &config.command {
            None => print_help(out, &["ssh", "config"]),
            Some(command) => run_config(command, ctx, out).await,
        },
    }
}

fn print_help(out: &mut (dyn Write + Send), path: &[&str]) -> Result<()> {
    write!(out, "{}", help_text(path))?;
    Ok(())
}

async fn run_config(
    command: &ConfigCommand,
    ctx: &AppContext,
    out: &mut (dyn Write + Send),
) -> Result<()> {
    match command {
        ConfigCommand::Path => {
            writeln!(out, "{}", ctx.location().file.display())?;
        }
        ConfigCommand::Show => {
            write!(out, "{}", ctx.store().to_yaml()?)?;
        }
        ConfigCommand::Get { key } => {
            let value = ctx.store().require(key)?;
            writeln!(out, "{}", render_value(&value)?)?;
        }
        ConfigCommand::Watch => watch(ctx, out).await?,
    }
    Ok(())
}

/// Strings print bare; anything else prints as YAML.
fn render_value(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Ok(serde_yaml::to_string(other)
            .context("rendering value as YAML")?
            .trim_end()
            .to_string()),
    }
}

async fn watch(ctx: &AppContext, out: &mut (dyn Write + Send)) -> Result<()> {
    let watcher = ctx
        .watcher()
        .context("file watching is unavailable on this system")?;
    let mut rx = watcher.subscribe();

    writeln!(
        out,
        "Watching {} (Ctrl-C to stop)",
        ctx.location().file.display()
    )?;
    out.flush()?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            received = rx.recv() => match received {
                Ok(change) => {
                    // The debug printer already reports this change.
                    if !ctx.debug() {
                        writeln!(out, "{}", change)?;
                        out.flush()?;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} config change notifications", skipped);
                }
                Err(RecvError::Closed) => break,
            },
        }
    }
    Ok(())
}
