use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::dto::notice::Notice;

/// Broadcast hub fanning round notices out to every rendering subscriber.
pub struct NoticeHub {
    sender: broadcast::Sender<Notice>,
}

impl NoticeHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent notices.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }

    /// Subscribe as a [`futures::Stream`]; lagged receivers yield an error item and continue.
    pub fn stream(&self) -> BroadcastStream<Notice> {
        BroadcastStream::new(self.sender.subscribe())
    }

    /// Send a notice to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, notice: Notice) {
        let _ = self.sender.send(notice);
    }
}
