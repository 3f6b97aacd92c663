//! Mock event source for tests and demos without a chain connection.

use super::{EventSource, FeedError, RawFeedEvent};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued batches, one per poll. An empty queue yields an empty batch.
#[derive(Debug, Default)]
pub struct MockEventSource {
    batches: Mutex<VecDeque<Result<Vec<RawFeedEvent>, FeedError>>>,
}

impl MockEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch(self, events: Vec<RawFeedEvent>) -> Self {
        self.push(Ok(events));
        self
    }

    /// Queue a poll that fails, e.g. to exercise transport errors.
    pub fn with_failure(self, message: &str) -> Self {
        self.push(Err(FeedError::Source(message.to_string())));
        self
    }

    pub fn push_batch(&self, events: Vec<RawFeedEvent>) {
        self.push(Ok(events));
    }

    fn push(&self, batch: Result<Vec<RawFeedEvent>, FeedError>) {
        self.batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(batch);
    }
}

#[async_trait]
impl EventSource for MockEventSource {
    async fn poll_events(&self) -> Result<Vec<RawFeedEvent>, FeedError> {
        let mut batches = self
            .batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        batches.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(seq: u64) -> RawFeedEvent {
        RawFeedEvent::PriceUpdate {
            asset: "ETH".to_string(),
            price: "300000000000".to_string(),
            sequence: seq,
        }
    }

    #[tokio::test]
    async fn test_batches_replay_in_order() {
        let source = MockEventSource::new()
            .with_batch(vec![price(1), price(2)])
            .with_failure("socket closed")
            .with_batch(vec![price(3)]);

        assert_eq!(source.poll_events().await.unwrap().len(), 2);
        assert_eq!(
            source.poll_events().await.unwrap_err(),
            FeedError::Source("socket closed".to_string())
        );
        assert_eq!(source.poll_events().await.unwrap(), vec![price(3)]);
        assert!(source.poll_events().await.unwrap().is_empty());
    }

    #[test]
    fn test_push_batch_through_shared_reference() {
        let source = MockEventSource::new();
        source.push_batch(vec![price(7)]);

        let batch = tokio_test::block_on(source.poll_events());
        tokio_test::assert_ok!(&batch);
        assert_eq!(batch.unwrap(), vec![price(7)]);
    }

    #[test]
    fn test_queue_survives_poisoned_lock() {
        let source = std::sync::Arc::new(MockEventSource::new());
        let poisoner = source.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.batches.lock().unwrap();
            panic!("poison the queue");
        })
        .join();
        assert!(source.batches.is_poisoned());

        source.push_batch(vec![price(8)]);
        let batch = tokio_test::block_on(source.poll_events()).unwrap();
        assert_eq!(batch, vec![price(8)]);
    }
}
