//! Sensor feed abstraction.
//!
//! A `SampleSource` has a single capability: deliver samples to a sink until
//! the returned `Subscription` is dropped or unsubscribed. Real sensors, trace
//! replays and tests all sit behind the same trait.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::sample::AccelerationSample;

pub type SampleSink = Box<dyn FnMut(&AccelerationSample) + Send>;

pub trait SampleSource {
    fn subscribe(&self, sink: SampleSink) -> Subscription;
}

/// Unsubscribe handle. Delivery stops on `unsubscribe()` or drop.
#[must_use = "dropping a Subscription immediately stops delivery"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
/// Every guarded mutation in this crate is a complete transition, so the
/// data behind a poisoned lock is still consistent.
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct FeedInner {
    next_id: u64,
    sinks: Vec<(u64, SampleSink)>,
}

/// In-process source: every pushed sample goes to every live subscriber.
///
/// Sinks run while the feed is locked; a sink must not subscribe to or
/// unsubscribe from the same feed.
#[derive(Clone, Default)]
pub struct ManualFeed {
    inner: Arc<Mutex<FeedInner>>,
}

impl ManualFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a sample. Returns how many subscribers received it.
    pub fn push(&self, sample: AccelerationSample) -> usize {
        let mut inner = lock(&self.inner);
        for (_, sink) in inner.sinks.iter_mut() {
            sink(&sample);
        }
        inner.sinks.len()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.inner).sinks.len()
    }
}

impl SampleSource for ManualFeed {
    fn subscribe(&self, sink: SampleSink) -> Subscription {
        let id = {
            let mut inner = lock(&self.inner);
            let id = inner.next_id;
            inner.next_id += 1;
            inner.sinks.push((id, sink));
            id
        };
        let feed: Weak<Mutex<FeedInner>> = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(feed) = feed.upgrade() {
                lock(&feed).sinks.retain(|(sid, _)| *sid != id);
            }
        })
    }
}
