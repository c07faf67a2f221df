//! Unbounded mpsc queue between the send path and the dispatch worker.
//!
//! Producers and the consumer share nothing beyond this channel. Enqueueing
//! never blocks; a send failure (worker gone) is logged and swallowed so the
//! originating message send still succeeds.

use tokio::sync::mpsc;
use tracing::error;

use crate::job::AiJob;

/// Creates the job channel: one [`JobSender`] (cloneable, one per producer)
/// and the [`JobReceiver`] the worker owns.
pub fn job_channel() -> (JobSender, JobReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (JobSender { tx }, JobReceiver { rx })
}

/// Producer handle. Cloning is cheap; all clones feed the same worker.
#[derive(Clone)]
pub struct JobSender {
    tx: mpsc::UnboundedSender<AiJob>,
}

impl JobSender {
    /// Publishes one job. Never blocks and never fails the caller: if the
    /// worker has shut down the job is dropped with an error log.
    pub fn enqueue(&self, job: AiJob) {
        let conversation_id = job.conversation_id().to_string();
        if self.tx.send(job).is_err() {
            error!(
                conversation_id = %conversation_id,
                "AI dispatch worker is gone; dropping job"
            );
        }
    }
}

/// Consumer handle; owned by exactly one worker.
pub struct JobReceiver {
    rx: mpsc::UnboundedReceiver<AiJob>,
}

impl JobReceiver {
    /// Next job, or `None` once every sender is dropped.
    pub async fn recv(&mut self) -> Option<AiJob> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn enqueue_then_recv_in_order() {
        let (sender, mut receiver) = job_channel();
        sender.enqueue(AiJob::Image {
            conversation_id: "conv-1".to_string(),
            prompt: "@dall-e a red fox".to_string(),
        });
        sender.enqueue(AiJob::Chat {
            conversation_id: "conv-2".to_string(),
            context: vec![],
        });
        drop(sender);

        let first = receiver.recv().await.expect("first job");
        assert_eq!(first.conversation_id(), "conv-1");
        let second = receiver.recv().await.expect("second job");
        assert_eq!(second.conversation_id(), "conv-2");
        assert!(receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn enqueue_after_receiver_dropped_does_not_panic() {
        let (sender, receiver) = job_channel();
        drop(receiver);
        sender.enqueue(AiJob::Chat {
            conversation_id: "conv-1".to_string(),
            context: vec![],
        });
    }
}
