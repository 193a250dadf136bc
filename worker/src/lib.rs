pub mod cli;
pub mod data;
pub mod error;
pub mod worker;

pub use cli::Cli;
pub use error::{Result, WorkerErr};
pub use worker::Worker;
