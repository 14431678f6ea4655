use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tokio::sync::watch;

/// One running population. Lives exactly as long as its leader's guard.
#[derive(Debug)]
struct InFlight {
    done: watch::Sender<bool>,
}

/// Per-key registry of populations currently in flight.
///
/// Check-and-register happens under the DashMap shard lock of the key, so two
/// callers can never both become leader, and unrelated keys only share a
/// lock when they hash to the same shard.
#[derive(Clone, Default)]
pub(crate) struct Registry {
    inflight: Arc<DashMap<String, Arc<InFlight>>>,
}

/// Outcome of [`Registry::join`]
pub(crate) enum Slot {
    /// No population was running; the caller must run one.
    Leader(PopulateGuard),
    /// A population is already running; wait for it.
    Follower(Waiter),
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Attach to the population running for `key`, or register a new one.
    ///
    /// Never suspends. The shard lock is released before this returns.
    pub(crate) fn join(&self, key: &str) -> Slot {
        match self.inflight.entry(key.to_string()) {
            Entry::Occupied(o) => Slot::Follower(Waiter {
                done: o.get().done.subscribe(),
            }),
            Entry::Vacant(v) => {
                let (done, _) = watch::channel(false);
                let marker = Arc::new(InFlight { done });
                v.insert(marker.clone());
                Slot::Leader(PopulateGuard {
                    key: key.to_string(),
                    marker,
                    inflight: self.inflight.clone(),
                })
            }
        }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.inflight.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.inflight.len()
    }
}

/// Held by the leader for the duration of one population.
///
/// Dropping it, on success, error, panic or cancellation alike, first removes
/// the marker from the registry and then fires the signal. A caller arriving
/// after removal becomes a new leader instead of waiting on a spent signal.
pub(crate) struct PopulateGuard {
    key: String,
    marker: Arc<InFlight>,
    inflight: Arc<DashMap<String, Arc<InFlight>>>,
}

impl PopulateGuard {
    /// Number of followers currently attached
    pub(crate) fn followers(&self) -> usize {
        self.marker.done.receiver_count()
    }
}

impl Drop for PopulateGuard {
    fn drop(&mut self) {
        self.inflight
            .remove_if(&self.key, |_, marker| Arc::ptr_eq(marker, &self.marker));
        self.marker.done.send_replace(true);
    }
}

/// Follower side of an in-flight population
pub(crate) struct Waiter {
    done: watch::Receiver<bool>,
}

impl Waiter {
    /// Resolve once the leader's guard has been dropped.
    pub(crate) async fn wait(mut self) {
        // The sender is only dropped after it has sent, so an error here means
        // the population is over as well.
        let _ = self.done.wait_for(|done| *done).await;
    }
}
