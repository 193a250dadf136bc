use std::borrow::Cow;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use comms::{
    WireReceiver, WireSender,
    msg::{Command, Msg, Payload},
    specs::{BatchSpec, DatasetSpec},
};
use log::{debug, info, warn};
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpListener,
};

use crate::data::TensorDataset;
use crate::error::{Result, WorkerErr};

/// A federated worker: an identity plus the datasets registered under it.
///
/// The registry is filled before serving starts and stays immutable while
/// driver sessions run against it.
pub struct Worker {
    id: String,
    datasets: HashMap<String, TensorDataset>,
}

impl Worker {
    /// Creates an empty worker for `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            datasets: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Registers `dataset` under `key`, replacing any previous entry.
    pub fn add_dataset(&mut self, dataset: TensorDataset, key: &str) {
        debug!(key = key; "registering dataset of {} samples", dataset.len());
        if self.datasets.insert(key.to_string(), dataset).is_some() {
            warn!("replaced the dataset registered under {key:?}");
        }
    }

    pub fn dataset(&self, key: &str) -> Option<&TensorDataset> {
        self.datasets.get(key)
    }

    /// Registered keys in sorted order.
    pub fn dataset_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.datasets.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Catalog sent in reply to `ListDatasets`, keyed in sorted order.
    pub fn catalog(&self) -> Vec<DatasetSpec> {
        self.dataset_keys()
            .into_iter()
            .map(|key| {
                let ds = &self.datasets[key];
                DatasetSpec {
                    key: key.to_string(),
                    len: ds.len(),
                    data_shape: ds.data_shape().to_vec(),
                    target_shape: vec![ds.target_cols()],
                }
            })
            .collect()
    }

    /// Accepts driver connections forever, one session task per driver.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> Result<()> {
        loop {
            let (stream, addr) = listener.accept().await?;
            info!("driver connected from {addr}");

            let worker = Arc::clone(&self);
            tokio::spawn(async move {
                let (rx, tx) = stream.into_split();
                let (rx, tx) = comms::channel(rx, tx);
                match worker.handle_driver(rx, tx).await {
                    Ok(()) => info!("driver at {addr} disconnected"),
                    Err(e) => warn!("driver session at {addr} failed: {e}"),
                }
            });
        }
    }

    /// Serves one driver session until `Disconnect` or the peer hangs up.
    ///
    /// Bad requests (unknown key, out-of-range index, unexpected frames) are
    /// answered with `Msg::Err` and the session continues; only I/O failures
    /// end it with an error.
    pub async fn handle_driver<R, W>(
        &self,
        mut rx: WireReceiver<R>,
        mut tx: WireSender<W>,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let mut rx_buf = vec![0i32; 1028];

        loop {
            let msg = match rx.recv_into::<Msg, _>(&mut rx_buf).await {
                Ok(msg) => msg,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    debug!("driver closed the connection");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };

            match msg {
                Msg::Control(Command::ListDatasets) => {
                    let reply = Msg::Control(Command::Datasets(self.catalog()));
                    tx.send(&reply).await?;
                }
                Msg::Control(Command::DatasetLen { key }) => match self.dataset(&key) {
                    Some(ds) => {
                        let len = ds.len();
                        tx.send(&Msg::Control(Command::Len { key, len })).await?;
                    }
                    None => send_err(&mut tx, &WorkerErr::UnknownDataset { key }).await?,
                },
                Msg::Control(Command::FetchBatch { key, indices }) => {
                    self.fetch_batch(&mut tx, key, &indices).await?;
                }
                Msg::Control(Command::Disconnect) => {
                    debug!("disconnect received from driver");
                    return Ok(());
                }
                Msg::Control(other) => {
                    warn!("unexpected command from driver: {other:?}");
                    let reply = Msg::Err(Cow::Borrowed("command not expected from a driver"));
                    tx.send(&reply).await?;
                }
                Msg::Data(_) => {
                    warn!("unexpected data frame from driver");
                    let reply = Msg::Err(Cow::Borrowed("data frames are not accepted here"));
                    tx.send(&reply).await?;
                }
                Msg::Err(detail) => warn!("driver reported an error: {detail}"),
            }
        }
    }

    async fn fetch_batch<W>(
        &self,
        tx: &mut WireSender<W>,
        key: String,
        indices: &[usize],
    ) -> Result<()>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let Some(dataset) = self.dataset(&key) else {
            return send_err(tx, &WorkerErr::UnknownDataset { key }).await;
        };

        let batch = match dataset.rows(indices) {
            Ok(batch) => batch,
            Err(e) => return send_err(tx, &e).await,
        };

        debug!(key = key.as_str(); "sending a batch of {} rows", batch.rows);

        let spec = BatchSpec {
            key,
            rows: batch.rows,
            data_cols: batch.data_cols,
            target_cols: batch.target_cols,
        };
        tx.send(&Msg::Control(Command::Batch(spec))).await?;
        tx.send(&Msg::Data(Payload::Samples(&batch.data))).await?;
        tx.send(&Msg::Data(Payload::Targets(&batch.targets))).await?;

        Ok(())
    }
}

/// Answers a failed request in place of the normal reply.
async fn send_err<W>(tx: &mut WireSender<W>, err: &WorkerErr) -> Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    warn!("request failed: {err}");
    let msg = Msg::Err(Cow::Owned(err.to_string()));
    tx.send(&msg).await?;
    Ok(())
}
