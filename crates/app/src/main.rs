use cli::{Command, LedgerCommand};
use session::Session;

use crate::error::Result;

mod cli;
mod config;
mod error;
mod session;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, command) = config::load()?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!("hisab={level},engine={level}", level = config.level))
        .init();

    let mut session = Session::open(&config)?;
    match command.unwrap_or(Command::Ledger(LedgerCommand::Show)) {
        Command::Ledger(command) => session.run(command).await?,
        Command::Shell => session.shell().await?,
    }

    Ok(())
}
