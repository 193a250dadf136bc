use std::io;
use std::sync::Arc;

use clap::Parser;
use log::info;
use tokio::{net::TcpListener, signal};

use worker::{
    Cli, Worker,
    cli::keep_labels,
    data::{mnist, toy},
};

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let keep = keep_labels(&cli.id)?;
    info!("worker {} keeps labels {keep:?}", cli.id);

    let full = mnist::load_train(&cli.data_dir)?;
    let total = full.len();
    let mnist = full.filter_by_labels(keep);
    info!("number of kept samples: {} of {total}", mnist.len());

    let mut worker = Worker::new(cli.id.as_str());
    worker.add_dataset(mnist, "mnist");
    worker.add_dataset(toy::vectors()?, "vectors");
    worker.add_dataset(toy::xor()?, "xor");
    worker.add_dataset(
        toy::gaussian_mixture(100, &mut rand::rng())?,
        "gaussian_mixture",
    );

    info!("datasets: {:?}", worker.dataset_keys());
    info!(
        "mnist samples registered: {}",
        worker.dataset("mnist").map_or(0, |ds| ds.len())
    );

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("listening at {addr}");

    let worker = Arc::new(worker);
    tokio::select! {
        ret = worker.serve(listener) => {
            ret?;
        }
        _ = signal::ctrl_c() => {
            info!("received ctrl-c, shutting down");
        }
    }

    Ok(())
}
