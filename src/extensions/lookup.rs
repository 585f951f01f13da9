use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use crossbeam::channel::Receiver;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::core::error::Result;
use crate::extensions::extension::Extension;

/// Watch side of the external extension repository. Implementations must
/// send one snapshot right after opening (for initialization) and another
/// whenever the stored set changes; every snapshot is the full set.
pub trait ExtensionWatcher: Send + Sync {
    fn watch_all(&self) -> Receiver<Vec<Extension>>;
}

/// Store side of the external extension repository.
pub trait ExtensionStorer: Send + Sync {
    fn put(&self, extension: &Extension) -> Result<()>;
}

/// Read-through overlay of user extensions above the base vocabulary.
///
/// A dedicated watcher thread consumes repository snapshots and replaces
/// the map wholesale, so readers always observe a complete set. Lookups are
/// short critical sections. If the watch stream dies the last good snapshot
/// stays in place.
pub struct ExtensionLookup {
    db: Mutex<HashMap<String, Extension>>,
}

impl ExtensionLookup {
    pub fn new(repo: &dyn ExtensionWatcher) -> Arc<Self> {
        let lookup = Arc::new(ExtensionLookup {
            db: Mutex::new(HashMap::new()),
        });

        let updates = repo.watch_all();
        let watcher = Arc::clone(&lookup);
        thread::spawn(move || {
            for snapshot in updates.iter() {
                watcher.apply_snapshot(snapshot);
            }

            warn!("extension watch stream closed, keeping the last snapshot");
        });

        lookup
    }

    pub(crate) fn apply_snapshot(&self, snapshot: Vec<Extension>) {
        let replacement: HashMap<String, Extension> = snapshot
            .into_iter()
            .map(|extension| (extension.concept.clone(), extension))
            .collect();

        debug!(extensions = replacement.len(), "applied extension snapshot");
        *self.db.lock() = replacement;
    }

    pub fn lookup(&self, concept: &str) -> Option<Extension> {
        self.db.lock().get(concept).cloned()
    }

    pub fn len(&self) -> usize {
        self.db.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.lock().is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{extension, preloaded};
    use super::*;
    use crossbeam::channel::{unbounded, Sender};
    use std::time::{Duration, Instant};

    struct ChannelRepo {
        sender: Sender<Vec<Extension>>,
        receiver: Receiver<Vec<Extension>>,
    }

    impl ChannelRepo {
        fn new() -> Self {
            let (sender, receiver) = unbounded();
            ChannelRepo { sender, receiver }
        }
    }

    impl ExtensionWatcher for ChannelRepo {
        fn watch_all(&self) -> Receiver<Vec<Extension>> {
            self.receiver.clone()
        }
    }

    fn wait_until(check: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while !check() {
            assert!(Instant::now() < deadline, "watcher did not catch up in time");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn snapshots_replace_the_whole_map() {
        let lookup = preloaded(vec![
            extension("flux_capacitor", vec![0.1], 1000),
            extension("warp_drive", vec![0.2], 1000),
        ]);
        assert_eq!(lookup.len(), 2);

        // the next snapshot is the full set; dropped concepts disappear
        lookup.apply_snapshot(vec![extension("warp_drive", vec![0.2], 1000)]);
        assert_eq!(lookup.len(), 1);
        assert!(lookup.lookup("flux_capacitor").is_none());
        assert!(lookup.lookup("warp_drive").is_some());
    }

    #[test]
    fn the_watcher_thread_applies_streamed_snapshots() {
        let repo = ChannelRepo::new();
        let lookup = ExtensionLookup::new(&repo);

        repo.sender
            .send(vec![extension("flux_capacitor", vec![0.1], 1000)])
            .unwrap();
        wait_until(|| lookup.len() == 1);
        assert!(lookup.lookup("flux_capacitor").is_some());
    }

    #[test]
    fn closed_stream_keeps_the_last_snapshot() {
        let repo = ChannelRepo::new();
        let lookup = ExtensionLookup::new(&repo);

        repo.sender
            .send(vec![extension("flux_capacitor", vec![0.1], 1000)])
            .unwrap();
        wait_until(|| lookup.len() == 1);

        drop(repo);
        thread::sleep(Duration::from_millis(20));
        assert!(lookup.lookup("flux_capacitor").is_some());
    }

    #[test]
    fn unknown_concepts_miss() {
        let lookup = preloaded(vec![]);
        assert!(lookup.lookup("flux_capacitor").is_none());
    }
}
