#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod console;
pub mod menu;
pub mod seed;

pub use cli::{Cli, Command};
pub use config::{AppConfig, ConfigError};
pub use console::Console;
pub use menu::{Menu, MenuSettings};
