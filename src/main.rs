use ccp::app::{commands, exit_fatal};
use ccp::utils::logger;
use ccp::{AppContext, Cli, ConfigBootstrap};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.debug);
    tracing::debug!("CLI args: {:?}", cli);

    // Runs before dispatch, even when only help will be printed.
    let ctx = match AppContext::init(cli.debug, &ConfigBootstrap::default()) {
        Ok(ctx) => ctx,
        Err(e) => exit_fatal(&e),
    };
    let _printer = ctx.spawn_debug_printer();

    let mut stdout = std::io::stdout();
    if let Err(e) = commands::run(&cli, &ctx, &mut stdout).await {
        tracing::error!("Command failed: {:#}", e);
        eprintln!("ccp: {:#}", e);
        std::process::exit(1);
    }
}
