use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{Announcement, Announcer};

/// Announcer that queues room output for the transport to send.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<Announcement>,
}

impl Outbox {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Announcement>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Announcer for Outbox {
    fn announce(&self, announcement: Announcement) {
        debug!("Announcing: {}", announcement.render());
        if self.tx.send(announcement).is_err() {
            warn!("Outbox closed, dropping announcement");
        }
    }
}
