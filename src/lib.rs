pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, StreamArgs};

pub use config::TomlConfig;
pub use crate::core::{driver::run_driver, stream::ThreadSafeAsyncStream};
pub use domain::model::{StreamSettings, StreamSummary};
pub use domain::ports::PrimeSink;
pub use utils::error::{Result, StreamError};
