pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use config::{cli::LocalStorage, file::FileConfig, CliConfig};
pub use core::batch::BatchEngine;
pub use core::fetcher::FipeClient;
pub use utils::error::{FipeError, Result};
