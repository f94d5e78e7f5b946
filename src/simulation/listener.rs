use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

use super::error::{ListenerError, SimError};
use super::state_log::LogEntry;

/// Receives every completed step on its own dispatcher thread.
pub trait StepListener: Send + 'static {
    fn on_step(&mut self, entry: &LogEntry) -> Result<(), ListenerError>;
}

impl<F> StepListener for F
where
    F: FnMut(&LogEntry) -> Result<(), ListenerError> + Send + 'static,
{
    fn on_step(&mut self, entry: &LogEntry) -> Result<(), ListenerError> {
        self(entry)
    }
}

struct Subscriber {
    id: usize,
    sender: Sender<Arc<LogEntry>>,
}

#[derive(Default)]
struct Subscribers {
    list: Vec<Subscriber>,
    next_id: usize,
    closed: bool,
}

/// One-writer fan-out of step notifications.
///
/// Each subscriber has a bounded channel. A full channel drops that
/// subscriber's notification; a disconnected one is removed.
pub struct Broadcaster {
    subscribers: Mutex<Subscribers>,
    capacity: usize,
    dropped: AtomicU64,
}

impl Broadcaster {
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Mutex::new(Subscribers::default()),
            capacity: capacity.max(1),
            dropped: AtomicU64::new(0),
        }
    }

    /// Adds a subscriber. After [`Broadcaster::close`] the returned receiver
    /// is already disconnected.
    pub fn subscribe(&self) -> Receiver<Arc<LogEntry>> {
        let (sender, receiver) = crossbeam_channel::bounded(self.capacity);
        let mut subscribers = self.subscribers.lock();
        if !subscribers.closed {
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.list.push(Subscriber { id, sender });
        }
        receiver
    }

    pub fn publish(&self, entry: &Arc<LogEntry>) {
        let mut subscribers = self.subscribers.lock();
        subscribers.list.retain(|subscriber| {
            match subscriber.sender.try_send(entry.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    self.dropped.fetch_add(1, Ordering::Relaxed);
                    debug!(
                        "Subscriber {} is full, dropped step {}",
                        subscriber.id, entry.step
                    );
                    true
                }
                Err(TrySendError::Disconnected(_)) => {
                    debug!("Subscriber {} disconnected", subscriber.id);
                    false
                }
            }
        });
    }

    /// Disconnects every subscriber; dispatchers drain what is queued and exit.
    pub fn close(&self) {
        let mut subscribers = self.subscribers.lock();
        subscribers.closed = true;
        subscribers.list.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().list.len()
    }

    /// Notifications dropped across all subscribers.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Dispatcher thread of one [`StepListener`].
#[derive(Debug)]
pub struct ListenerHandle {
    thread: Option<JoinHandle<()>>,
    errors: Arc<AtomicU64>,
}

impl ListenerHandle {
    pub(crate) fn spawn<L: StepListener>(
        receiver: Receiver<Arc<LogEntry>>,
        mut listener: L,
    ) -> Result<Self, SimError> {
        let errors = Arc::new(AtomicU64::new(0));
        let thread_errors = errors.clone();

        let thread = thread::Builder::new()
            .name("sixdof-listener".to_string())
            .spawn(move || {
                for entry in receiver.iter() {
                    if let Err(err) = listener.on_step(&entry) {
                        thread_errors.fetch_add(1, Ordering::Relaxed);
                        warn!("Step {}: {}", entry.step, err);
                    }
                }
            })?;

        Ok(Self {
            thread: Some(thread),
            errors,
        })
    }

    /// Number of steps the listener reported an error for.
    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Waits for the dispatcher to drain. It finishes once the loop stops.
    /// Returns `false` if the listener panicked.
    pub fn join(mut self) -> bool {
        match self.thread.take() {
            Some(thread) => thread.join().is_ok(),
            None => true,
        }
    }
}
