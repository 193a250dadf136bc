use std::path::PathBuf;

use clap::Parser;

use crate::error::{Result, WorkerErr};

/// The fixed identities and the MNIST labels each of them keeps.
pub const KEEP_LABELS: &[(&str, &[u8])] = &[
    ("alice", &[0, 1, 2, 3]),
    ("bob", &[4, 5, 6]),
    ("charlie", &[7, 8, 9]),
];

/// Command line surface of the worker server binary.
#[derive(Parser, Debug)]
#[command(about = "Run a federated worker server.")]
pub struct Cli {
    /// Port number of the worker server, e.g. --port 8777.
    #[arg(short, long)]
    pub port: u16,

    /// Host for the connection.
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Name (id) of the worker server, e.g. --id alice.
    #[arg(long)]
    pub id: String,

    /// If set, the worker server is started in verbose mode.
    #[arg(short, long)]
    pub verbose: bool,

    /// Directory containing the MNIST IDX files.
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,
}

/// Looks up the label subset assigned to `id`.
///
/// # Errors
/// Returns `WorkerErr::UnknownIdentity` if `id` is not one of the fixed
/// identities.
pub fn keep_labels(id: &str) -> Result<&'static [u8]> {
    KEEP_LABELS
        .iter()
        .find(|(name, _)| *name == id)
        .map(|(_, labels)| *labels)
        .ok_or_else(|| WorkerErr::UnknownIdentity { id: id.to_string() })
}
