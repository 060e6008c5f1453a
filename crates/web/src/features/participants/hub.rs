use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use storage::dto::participant::ParticipantResponse;
use tokio::sync::broadcast;

/// One immutable roster snapshot, shared across every subscriber.
pub type Snapshot = Arc<Vec<ParticipantResponse>>;

const CHANNEL_CAPACITY: usize = 32;

/// Fan-out point for roster snapshots, one broadcast channel per tournament.
///
/// Writers publish the full snapshot after every mutation; slow readers that
/// lag just skip to the newest one, since each message already carries the
/// whole state.
#[derive(Clone, Default)]
pub struct SnapshotHub {
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<Snapshot>>>>,
}

impl SnapshotHub {
    pub fn subscribe(&self, tournament_id: &str) -> broadcast::Receiver<Snapshot> {
        let mut channels = self.lock();
        channels
            .entry(tournament_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publishes a snapshot to current subscribers. Channels with nobody
    /// listening are dropped instead of written to.
    pub fn publish(&self, tournament_id: &str, snapshot: Snapshot) {
        let mut channels = self.lock();
        if let Some(sender) = channels.get(tournament_id) {
            if sender.receiver_count() == 0 {
                channels.remove(tournament_id);
            } else {
                let _ = sender.send(snapshot);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, broadcast::Sender<Snapshot>>> {
        self.channels
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_snapshots() {
        let hub = SnapshotHub::default();
        let mut receiver = hub.subscribe("t1");

        hub.publish("t1", Arc::new(Vec::new()));

        let snapshot = receiver.recv().await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn write_between_subscribe_and_first_poll_is_not_lost() {
        use storage::models::{Participant, PricingConfig};

        let hub = SnapshotHub::default();

        // Stream handlers subscribe before reading the initial roster; a
        // check-in that lands in that window must still reach the receiver.
        let mut receiver = hub.subscribe("t1");

        let mut participant = Participant::new("101");
        participant.checked_in = true;
        let snapshot = Arc::new(vec![ParticipantResponse::from_model(
            participant,
            &PricingConfig::default(),
        )]);
        hub.publish("t1", snapshot);

        let delivered = receiver.recv().await.unwrap();
        assert_eq!(delivered.len(), 1);
        assert!(delivered[0].checked_in);
    }

    #[test]
    fn tournaments_are_isolated() {
        let hub = SnapshotHub::default();
        let mut other = hub.subscribe("t2");

        hub.publish("t1", Arc::new(Vec::new()));

        assert!(matches!(
            other.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn publish_without_subscribers_drops_the_channel() {
        let hub = SnapshotHub::default();
        {
            let _receiver = hub.subscribe("t1");
        }

        hub.publish("t1", Arc::new(Vec::new()));

        assert!(hub.lock().get("t1").is_none());
    }
}
