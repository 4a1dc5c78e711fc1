use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::store::{StatsError, StatsStore};
use super::types::StoredStats;

enum StatsCommand {
    RecordSuccess {
        response_time_ms: f64,
        source_lang: String,
        target_lang: String,
    },
    RecordFailure,
    Read(oneshot::Sender<Result<StoredStats, StatsError>>),
}

/// Cheap, cloneable access to the stats store.
///
/// Every command goes through one channel to a single writer task, so
/// read-modify-write cycles on the file never interleave and a read sees
/// every record sent before it.
#[derive(Clone)]
pub struct StatsHandle {
    sender: mpsc::UnboundedSender<StatsCommand>,
}

impl StatsHandle {
    /// Start the writer task. It initializes the file, then runs until
    /// every handle has been dropped and the queue is drained.
    pub fn spawn(store: StatsStore) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, receiver));
        (Self { sender }, task)
    }

    /// Queue a successful translation; returns immediately.
    pub fn record_success(&self, response_time_ms: f64, source_lang: &str, target_lang: &str) {
        self.send(StatsCommand::RecordSuccess {
            response_time_ms,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
        });
    }

    /// Queue a failed translation; returns immediately.
    pub fn record_failure(&self) {
        self.send(StatsCommand::RecordFailure);
    }

    pub async fn current(&self) -> Result<StoredStats, StatsError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(StatsCommand::Read(reply))
            .map_err(|_| StatsError::WriterClosed)?;
        response.await.map_err(|_| StatsError::WriterClosed)?
    }

    fn send(&self, command: StatsCommand) {
        if self.sender.send(command).is_err() {
            error!("Stats writer stopped; dropping stats update");
        }
    }
}

async fn run(store: StatsStore, mut receiver: mpsc::UnboundedReceiver<StatsCommand>) {
    if let Err(e) = store.ensure_initialized().await {
        error!("Failed to initialize stats file {}: {}", store.path().display(), e);
    }

    while let Some(command) = receiver.recv().await {
        match command {
            StatsCommand::RecordSuccess {
                response_time_ms,
                source_lang,
                target_lang,
            } => {
                if let Err(e) = store
                    .record_success(response_time_ms, &source_lang, &target_lang)
                    .await
                {
                    error!("Failed to record successful translation: {}", e);
                }
            }
            StatsCommand::RecordFailure => {
                if let Err(e) = store.record_failure().await {
                    error!("Failed to record failed translation: {}", e);
                }
            }
            StatsCommand::Read(reply) => {
                // The requester may have gone away; nothing to do then.
                let _ = reply.send(store.read().await);
            }
        }
    }

    debug!("Stats writer drained, exiting");
}
