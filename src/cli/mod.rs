mod commands;
mod repl;

pub use commands::{Cli, Commands, ScenarioCommands};
pub use repl::{ReplCommand, DESCRIBE_USAGE, SCENARIO_USAGE};
