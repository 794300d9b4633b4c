pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod hosting;
pub mod previews;
pub mod project;
pub mod upload;

pub use cli::{run, Cli, Commands};
pub use error::{Error, Result};
