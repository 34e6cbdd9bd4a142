use tokio::sync::broadcast;

use crate::event::CoreEvent;

#[derive(Clone)]
pub struct Bus {
    sender: broadcast::Sender<CoreEvent>,
}

impl Bus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. A send error only means no subscriber is attached,
    /// which is fine for a headless conversation.
    pub fn publish(&self, event: CoreEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::StatusUpdatedPayload;
    use tokio::time::{timeout, Duration};

    fn test_event() -> CoreEvent {
        CoreEvent::StatusUpdated(StatusUpdatedPayload {
            message: "Thinking...".to_string(),
        })
    }

    #[tokio::test]
    async fn publish_and_receive_event() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();

        bus.publish(test_event());

        let received = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("timeout")
            .expect("recv");
        assert!(
            matches!(received, CoreEvent::StatusUpdated(ref e) if e.message == "Thinking...")
        );
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_event() {
        let bus = Bus::new(8);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(test_event());

        assert!(matches!(rx1.recv().await.unwrap(), CoreEvent::StatusUpdated(_)));
        assert!(matches!(rx2.recv().await.unwrap(), CoreEvent::StatusUpdated(_)));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let bus = Bus::new(8);
        bus.publish(test_event());
    }
}
