use std::sync::OnceLock;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::coord::comm::CommSender;
use crate::coord::error::CoordError;
use crate::coord::message::QueueMessage;
use crate::coord::state::{MasterState, SlaveState};

/// State machine of the master supervisor loop.
///
/// Owns the process-wide master state, created as [`MasterState::Idle`] and
/// alive for the lifetime of the process. All mutation goes through
/// [`MasterMachine::set_new_state`] under a bounded-wait gate; reads through
/// [`MasterMachine::current_state`] are lock-free (see that method for the
/// visibility contract).
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use tandem_coord::coord::master::MasterMachine;
/// use tandem_coord::coord::state::{MasterState, SlaveState};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), tandem_coord::coord::error::CoordError> {
/// let master = MasterMachine::new(Duration::from_millis(10));
/// master.state_dispatcher(SlaveState::Active).await?;
/// assert_eq!(master.current_state(), MasterState::Processing);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MasterMachine {
    state: AtomicU8,
    pub(crate) gate: Semaphore,
    lock_wait: Duration,
    command_tx: OnceLock<CommSender<QueueMessage>>,
    entry_invocations: AtomicU64,
}

impl MasterMachine {
    pub fn new(lock_wait: Duration) -> Self {
        MasterMachine {
            state: AtomicU8::new(MasterState::Idle as u8),
            gate: Semaphore::new(1),
            lock_wait,
            command_tx: OnceLock::new(),
            entry_invocations: AtomicU64::new(0),
        }
    }

    /// Bind the sender toward the slave side of the state channel.
    ///
    /// Binding happens once during bootstrap; a second call is ignored.
    pub fn bind_command_sender(&self, tx: CommSender<QueueMessage>) {
        if self.command_tx.set(tx).is_err() {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                component = "MasterStateMachine",
                "command sender already bound, ignoring rebind"
            );
        }
    }

    /// Last committed master state.
    ///
    /// The read takes no lock: the value is a single atomic and cannot tear,
    /// but a transition committing concurrently may not be visible until it
    /// completes. Callers needing a stable value must go through the gate.
    pub fn current_state(&self) -> MasterState {
        MasterState::from_ordinal(self.state.load(Ordering::SeqCst))
    }

    /// Number of times a state entry handler has run. Dispatching a report
    /// that maps onto the current state does not increment this.
    pub fn entry_invocations(&self) -> u64 {
        self.entry_invocations.load(Ordering::SeqCst)
    }

    /// Commit a new master state under the bounded-wait gate.
    ///
    /// Setting the current state again is an idempotent no-op. The gate is
    /// released on every exit path.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::Sync`] if the gate cannot be acquired within
    /// the configured wait; no mutation occurs and the failure is not
    /// retried internally.
    pub async fn set_new_state(&self, target: MasterState) -> Result<(), CoordError> {
        let permit = match timeout(self.lock_wait, self.gate.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => {
                return Err(CoordError::Sync("master state gate closed".to_string()));
            }
            Err(_) => {
                return Err(CoordError::Sync(
                    "master state gate wait elapsed".to_string(),
                ));
            }
        };

        let current = MasterState::from_ordinal(self.state.load(Ordering::SeqCst));
        if current != target {
            self.state.store(target as u8, Ordering::SeqCst);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                component = "MasterStateMachine",
                from = ?current,
                to = ?target,
                "new master state committed"
            );
        }

        drop(permit);
        Ok(())
    }

    /// Map a slave status report onto a master state and run that state's
    /// entry handler.
    ///
    /// If the mapped state equals the current one the dispatch is a no-op
    /// success: the entry handler is not re-entered.
    ///
    /// # Errors
    ///
    /// Propagates [`CoordError::Sync`] from the state commit and
    /// [`CoordError::Comm`] if the error handler needs the state channel
    /// before bootstrap bound it.
    pub async fn state_dispatcher(&self, report: SlaveState) -> Result<(), CoordError> {
        let target = MasterState::for_report(report);
        if target == self.current_state() {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                component = "MasterStateMachine",
                state = ?target,
                "already in mapped state, dispatch is a no-op"
            );
            return Ok(());
        }

        self.entry_invocations.fetch_add(1, Ordering::SeqCst);
        match target {
            MasterState::Idle => self.enter_idle().await,
            MasterState::Processing => self.enter_processing().await,
            MasterState::Error => self.enter_error().await,
        }
    }

    async fn enter_idle(&self) -> Result<(), CoordError> {
        self.set_new_state(MasterState::Idle).await
    }

    async fn enter_processing(&self) -> Result<(), CoordError> {
        self.set_new_state(MasterState::Processing).await
    }

    /// Error entry handler: commit the state, then ask the slave to unwind.
    async fn enter_error(&self) -> Result<(), CoordError> {
        self.set_new_state(MasterState::Error).await?;

        let Some(tx) = self.command_tx.get() else {
            return Err(CoordError::Comm(
                "state channel not initialized".to_string(),
            ));
        };
        if let Err(_err) = tx.send(QueueMessage::reset_slave(MasterState::Error)).await {
            // The command is dropped; the next fault report will retrigger it.
            #[cfg(feature = "tracing")]
            tracing::warn!(
                component = "MasterStateMachine",
                error = %_err,
                "reset command dropped"
            );
        }
        Ok(())
    }
}
