//! Command dispatch: bridges CLI args -> engine operations -> output formatting.

pub mod config_cmd;
pub mod lifecycle;
pub mod resources;
pub mod state_cmd;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a command to its handler. Only lifecycle commands connect.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Resources(args) => resources::handle(args, global),
        Command::State(args) => state_cmd::handle(args, global),
        Command::Create(args) => lifecycle::create(args, global).await,
        Command::Read(args) => lifecycle::read(args, global).await,
        Command::Update(args) => lifecycle::update(args, global).await,
        Command::Delete(args) => lifecycle::delete(args, global).await,
        Command::Import(args) => lifecycle::import(args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
