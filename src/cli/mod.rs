mod args;
mod commands;
mod config_cmd;
mod session;
mod util;

pub use args::{Cli, Command, ConfigArgs};
