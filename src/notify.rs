//! Toast notifications.
//!
//! A `Notifier` is created when the application starts and disposed when
//! it shuts down. Subscribers receive every toast published after they
//! subscribe over their own mpsc channel. Ids increase per notifier.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use log::trace;

/// How long a toast stays on screen by default.
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(4);

/// Identifier assigned to each published toast.
pub type ToastId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    pub created: Instant,
}

/// Publishes toasts to any number of subscribers.
#[derive(Debug, Default)]
pub struct Notifier {
    next_id: ToastId,
    listeners: Vec<Sender<Toast>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber.
    pub fn subscribe(&mut self) -> Receiver<Toast> {
        let (tx, rx) = mpsc::channel();
        self.listeners.push(tx);
        rx
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Publish a toast to every live subscriber.
    ///
    /// Subscribers whose receiver was dropped are removed.
    pub fn notify(&mut self, kind: ToastKind, message: impl Into<String>) -> ToastId {
        self.next_id += 1;
        let toast = Toast {
            id: self.next_id,
            kind,
            message: message.into(),
            created: Instant::now(),
        };
        trace!("toast {} {:?}: {}", toast.id, toast.kind, toast.message);
        self.listeners.retain(|tx| tx.send(toast.clone()).is_ok());
        toast.id
    }

    pub fn info(&mut self, message: impl Into<String>) -> ToastId {
        self.notify(ToastKind::Info, message)
    }

    pub fn success(&mut self, message: impl Into<String>) -> ToastId {
        self.notify(ToastKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> ToastId {
        self.notify(ToastKind::Error, message)
    }

    /// Shut the channel down; every subscriber sees a disconnect.
    pub fn dispose(self) {
        trace!("disposing notifier with {} subscribers", self.listeners.len());
    }
}

/// Subscriber side: keeps recently received toasts until they expire.
#[derive(Debug)]
pub struct ToastBoard {
    receiver: Receiver<Toast>,
    active: VecDeque<Toast>,
    ttl: Duration,
}

impl ToastBoard {
    pub fn new(receiver: Receiver<Toast>, ttl: Duration) -> Self {
        Self {
            receiver,
            active: VecDeque::new(),
            ttl,
        }
    }

    /// Pull newly published toasts and drop expired ones.
    pub fn poll(&mut self, now: Instant) {
        self.active.extend(self.receiver.try_iter());
        while let Some(front) = self.active.front() {
            if now.saturating_duration_since(front.created) >= self.ttl {
                self.active.pop_front();
            } else {
                break;
            }
        }
    }

    /// Most recent visible toast.
    pub fn latest(&self) -> Option<&Toast> {
        self.active.back()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
