use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::time::{sleep, timeout};

use crate::coord::config::CoordConfig;
use crate::coord::error::CoordError;

/// Timing discipline applied to every channel send.
#[derive(Debug, Clone, Copy)]
pub struct CommTiming {
    /// How long a sender may wait for space before the message is dropped.
    pub send_wait: Duration,
    /// Fixed delay imposed after a successful send, throttling producers.
    pub settle: Duration,
}

impl CommTiming {
    pub fn from_config(config: &CoordConfig) -> Self {
        CommTiming {
            send_wait: config.send_wait(),
            settle: config.send_settle(),
        }
    }
}

/// Producer half of a bounded comm channel.
///
/// `send` blocks up to the configured wait budget for space. On timeout the
/// message is dropped and [`CoordError::Comm`] returned; callers are
/// expected to log and continue rather than retry, so a stalled consumer
/// cannot starve the producing task. Successful sends are followed by a
/// fixed settle delay as a simple backpressure mechanism.
#[derive(Debug)]
pub struct CommSender<T> {
    tx: mpsc::Sender<T>,
    timing: CommTiming,
}

impl<T> Clone for CommSender<T> {
    fn clone(&self) -> Self {
        CommSender {
            tx: self.tx.clone(),
            timing: self.timing,
        }
    }
}

impl<T: Send> CommSender<T> {
    /// Send one message, waiting at most the configured budget for space.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Comm`] if the wait budget elapses or the
    /// receiving half has been dropped. In both cases the message is lost.
    pub async fn send(&self, message: T) -> Result<(), CoordError> {
        match timeout(self.timing.send_wait, self.tx.send(message)).await {
            Ok(Ok(())) => {
                sleep(self.timing.settle).await;
                Ok(())
            }
            Ok(Err(_)) => Err(CoordError::Comm("channel closed".to_string())),
            Err(_) => Err(CoordError::Comm(
                "send wait budget elapsed, message dropped".to_string(),
            )),
        }
    }
}

/// Consumer half of a bounded comm channel.
///
/// Receives block until a message is available and preserve strict FIFO
/// order within the channel. The receiver is shareable behind an [`Arc`];
/// the inner mutex serializes competing consumers of the same role.
#[derive(Debug)]
pub struct CommReceiver<T> {
    rx: Mutex<mpsc::Receiver<T>>,
}

impl<T> CommReceiver<T> {
    /// Block until the next message arrives.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Comm`] once the channel is closed and drained.
    pub async fn recv(&self) -> Result<T, CoordError> {
        self.rx
            .lock()
            .await
            .recv()
            .await
            .ok_or_else(|| CoordError::Comm("channel closed".to_string()))
    }

    /// Bounded variant of [`CommReceiver::recv`], used where a task cannot
    /// afford to park forever.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Comm`] on timeout or a closed channel.
    pub async fn recv_timeout(&self, wait: Duration) -> Result<T, CoordError> {
        match timeout(wait, self.recv()).await {
            Ok(result) => result,
            Err(_) => Err(CoordError::Comm("receive wait elapsed".to_string())),
        }
    }
}

/// Create one directed bounded channel.
pub fn channel<T>(depth: usize, timing: CommTiming) -> (CommSender<T>, CommReceiver<T>) {
    let (tx, rx) = mpsc::channel(depth);
    (
        CommSender { tx, timing },
        CommReceiver { rx: Mutex::new(rx) },
    )
}

/// One side of a duplex channel: sends toward the peer, receives from it.
#[derive(Debug)]
pub struct CommEndpoint<T> {
    pub tx: CommSender<T>,
    pub rx: Arc<CommReceiver<T>>,
}

impl<T> Clone for CommEndpoint<T> {
    fn clone(&self) -> Self {
        CommEndpoint {
            tx: self.tx.clone(),
            rx: Arc::clone(&self.rx),
        }
    }
}

impl<T: Send> CommEndpoint<T> {
    pub async fn send(&self, message: T) -> Result<(), CoordError> {
        self.tx.send(message).await
    }

    pub async fn recv(&self) -> Result<T, CoordError> {
        self.rx.recv().await
    }
}

/// Build a duplex channel out of two directed queues, one per direction.
///
/// FIFO order holds within each direction; no ordering is guaranteed across
/// the two directions or across distinct channels.
pub fn duplex<T>(depth: usize, timing: CommTiming) -> (CommEndpoint<T>, CommEndpoint<T>) {
    let (a_tx, b_rx) = channel(depth, timing);
    let (b_tx, a_rx) = channel(depth, timing);
    (
        CommEndpoint {
            tx: a_tx,
            rx: Arc::new(a_rx),
        },
        CommEndpoint {
            tx: b_tx,
            rx: Arc::new(b_rx),
        },
    )
}
