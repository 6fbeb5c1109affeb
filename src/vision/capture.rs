//! Background frame capture.
//!
//! A producer thread keeps pulling frames from a [`FrameSource`] and drops each
//! one into a [`FrameMailbox`], overwriting whatever was there. The game loop
//! peeks at the mailbox once per frame without waiting, so it always sees the
//! freshest frame and stale ones are simply lost.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, TryLockError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

use super::landmark::Landmark;
use crate::error::CaptureError;

/// Anything that produces frames, e.g. a camera
pub trait FrameSource: Send + 'static {
    type Frame: Send + 'static;

    /// Next frame, or `None` if the device has nothing right now
    fn read_frame(&mut self) -> Option<Self::Frame>;
}

/// Turns a frame into hand landmarks. An empty list means no hand was found.
pub trait HandDetector {
    type Frame;

    fn detect(&mut self, frame: &Self::Frame) -> Vec<Landmark>;
}

/// Detector for sources that already deliver landmarks
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughDetector;

impl HandDetector for PassthroughDetector {
    type Frame = Vec<Landmark>;

    fn detect(&mut self, frame: &Self::Frame) -> Vec<Landmark> {
        frame.clone()
    }
}

/// Single-slot cell holding the most recent frame
pub struct FrameMailbox<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> FrameMailbox<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the stored frame
    pub fn publish(&self, frame: T) {
        let mut slot = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(frame);
    }

    /// Remove and return the stored frame without waiting.
    ///
    /// Returns `None` when empty or while the producer holds the lock.
    pub fn take(&self) -> Option<T> {
        self.try_with(|slot| slot.take())
    }

    fn try_with<R>(&self, f: impl FnOnce(&mut Option<T>) -> Option<R>) -> Option<R> {
        match self.slot.try_lock() {
            Ok(mut slot) => f(&mut slot),
            Err(TryLockError::Poisoned(poisoned)) => f(&mut poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }
}

impl<T: Clone> FrameMailbox<T> {
    /// Copy of the stored frame without waiting. The frame stays in place.
    pub fn latest(&self) -> Option<T> {
        self.try_with(|slot| slot.clone())
    }
}

impl<T> Clone for FrameMailbox<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for FrameMailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the producer thread. Stopping is idempotent and also happens on drop.
pub struct CaptureWorker<T> {
    mailbox: FrameMailbox<T>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> CaptureWorker<T> {
    /// Start polling `source` every `poll_interval`.
    ///
    /// The thread checks the stop flag once per poll, so it exits within one
    /// interval plus one read after [`stop`](Self::stop).
    pub fn spawn<S>(source: S, poll_interval: Duration) -> Result<Self, CaptureError>
    where
        S: FrameSource<Frame = T>,
    {
        let mailbox = FrameMailbox::new();
        let stop = Arc::new(AtomicBool::new(false));

        let handle = {
            let mailbox = mailbox.clone();
            let stop = Arc::clone(&stop);
            thread::Builder::new()
                .name("frame-capture".to_string())
                .spawn(move || capture_loop(source, mailbox, stop, poll_interval))
                .map_err(CaptureError::Spawn)?
        };

        debug!(?poll_interval, "capture worker started");

        Ok(Self {
            mailbox,
            stop,
            handle: Some(handle),
        })
    }

    pub fn mailbox(&self) -> &FrameMailbox<T> {
        &self.mailbox
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Signal the thread and wait for it; the source is dropped before this
    /// returns.
    pub fn stop(&mut self) {
        self.shutdown();
    }
}

impl<T> CaptureWorker<T> {
    /// Returns false if the thread had panicked
    fn shutdown(&mut self) -> bool {
        self.stop.store(true, Ordering::SeqCst);

        let Some(handle) = self.handle.take() else {
            return true;
        };

        if handle.join().is_err() {
            warn!("capture thread panicked");
            false
        } else {
            debug!("capture worker stopped");
            true
        }
    }
}

impl<T: Clone + Send + 'static> CaptureWorker<T> {
    /// Freshest frame, if any has arrived
    pub fn latest(&self) -> Option<T> {
        self.mailbox.latest()
    }
}

impl<T> Drop for CaptureWorker<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn capture_loop<S: FrameSource>(
    mut source: S,
    mailbox: FrameMailbox<S::Frame>,
    stop: Arc<AtomicBool>,
    poll_interval: Duration,
) {
    while !stop.load(Ordering::SeqCst) {
        if let Some(frame) = source.read_frame() {
            mailbox.publish(frame);
        }
        thread::sleep(poll_interval);
    }

    // Release the device before the worker reports stopped
    drop(source);
}
